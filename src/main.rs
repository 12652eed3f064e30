//! webrecon - passive web reconnaissance scanner CLI

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use url::Url;

use webrecon::config;
use webrecon::models::{AppConfig, ScanResult};
use webrecon::ratelimit::RateLimiter;
use webrecon::report;
use webrecon::scanner::discovery::DEFAULT_WORDLIST;
use webrecon::scanner::ScanEngine;
use webrecon::server::{self, AppState};

/// webrecon - passive web reconnaissance and exposure scanner
#[derive(Parser)]
#[command(name = "webrecon", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web endpoint
    Serve {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Scan a single target from the terminal
    Scan {
        /// Target URL to scan
        #[arg(short, long)]
        target: String,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Custom wordlist path
        #[arg(short, long)]
        wordlist: Option<String>,

        /// Pause before each discovery probe, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Custom headers (format: "Key: Value")
        #[arg(short = 'H', long)]
        header: Option<Vec<String>>,

        /// Output format (html or json)
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Output file path (default: webrecon_{hostname}.html)
        #[arg(short, long)]
        output: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the built-in discovery wordlist
    Wordlist,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "webrecon=debug" } else { "webrecon=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();
}

fn load_app_config(path: Option<&Path>) -> webrecon::error::Result<AppConfig> {
    match path {
        Some(path) => config::load_config(path),
        None => {
            let default_path = Path::new("config/default.toml");
            if default_path.exists() {
                config::load_config(default_path)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

fn output_name_from_target(target: &str, ext: &str) -> String {
    if let Ok(url) = Url::parse(target) {
        let host = url.host_str().unwrap_or("unknown");
        let sanitized: String = host
            .chars()
            .map(|c| if c == '.' || c == ':' { '_' } else { c })
            .collect();
        format!("webrecon_{sanitized}.{ext}")
    } else {
        format!("webrecon_report.{ext}")
    }
}

fn print_summary(result: &ScanResult) {
    println!("\n{}", "  Scan Summary".bold());
    println!("  {}", "─".repeat(35));

    let mut builder = Builder::default();
    builder.push_record(["Category", "Count"]);
    builder.push_record(["Technologies".to_string(), result.recon.technologies.len().to_string()]);
    builder.push_record(["XSS inputs".to_string(), result.vulnerabilities.xss.len().to_string()]);
    builder.push_record([
        "SQLi parameters".to_string(),
        result.vulnerabilities.sql_injection.len().to_string(),
    ]);
    builder.push_record([
        "Open redirects".to_string(),
        result.vulnerabilities.open_redirects.len().to_string(),
    ]);
    builder.push_record([
        "Exposed files".to_string(),
        result.vulnerabilities.information_disclosure.len().to_string(),
    ]);
    builder.push_record(["Paths found".to_string(), result.directories.discovered.len().to_string()]);
    builder.push_record(["Probe errors".to_string(), result.directories.errors.len().to_string()]);
    builder.push_record(["Requests".to_string(), result.total_requests.to_string()]);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    if !result.directories.discovered.is_empty() {
        println!("\n  {}", "Discovered paths".bold());
        for hit in &result.directories.discovered {
            let status = match hit.status_code {
                200 => hit.status_code.to_string().green(),
                403 => hit.status_code.to_string().red(),
                _ => hit.status_code.to_string().yellow(),
            };
            println!("    {status} {}", hit.url);
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config: config_path,
            bind,
            port,
            verbose,
        } => {
            init_tracing(verbose);

            let mut app_config = load_app_config(config_path.as_deref())?;
            config::merge_cli_args(&mut app_config, bind, port, None, None, None);

            let limiter = Arc::new(RateLimiter::from_config(&app_config.limiter)?);
            let engine = ScanEngine::new(&app_config, limiter)?;
            let state = Arc::new(AppState { engine });

            let addr = format!("{}:{}", app_config.server.bind, app_config.server.port);
            let listener = TcpListener::bind(&addr).await?;
            server::serve(listener, state).await?;
        }

        Commands::Scan {
            target,
            config: config_path,
            wordlist,
            delay_ms,
            header,
            format,
            output,
            verbose,
        } => {
            init_tracing(verbose);

            let mut app_config = load_app_config(config_path.as_deref())?;
            config::merge_cli_args(&mut app_config, None, None, wordlist, delay_ms, header);

            println!("  {} {}", "Target:".bold(), target.green());
            println!(
                "  {} {} ({} ms apart)\n",
                "Probe delay:".bold(),
                "paced".cyan(),
                app_config.scan.probe_delay_ms
            );

            let limiter = Arc::new(RateLimiter::from_config(&app_config.limiter)?);
            let engine = ScanEngine::new(&app_config, limiter)?;
            let result = match engine.run_with_deadline(&target).await {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("  {} {}", "Error:".red().bold(), e);
                    std::process::exit(1);
                }
            };

            print_summary(&result);

            let output_file = output.unwrap_or_else(|| {
                let ext = if format == "json" { "json" } else { "html" };
                output_name_from_target(&result.target, ext)
            });
            let output_path = Path::new(&output_file);
            match format.as_str() {
                "json" => report::json::export(&result, output_path)?,
                _ => report::html::generate(&result, output_path)?,
            }

            println!("\n  {} {}", "Report saved to:".bold(), output_file.green());
        }

        Commands::Wordlist => {
            for word in DEFAULT_WORDLIST {
                println!("{word}");
            }
        }
    }

    Ok(())
}
