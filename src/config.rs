//! Configuration management for webrecon

use crate::error::{Result, WebreconError};
use crate::models::AppConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// File-based configuration structure matching default.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    limiter: Option<LimiterSection>,
    server: Option<ServerSection>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    user_agent: Option<String>,
    fetch_timeout_secs: Option<u64>,
    probe_timeout_secs: Option<u64>,
    probe_delay_ms: Option<u64>,
    follow_redirects: Option<bool>,
    wordlist_path: Option<String>,
    dns_lookups: Option<bool>,
    dns_timeout_secs: Option<u64>,
    scan_deadline_secs: Option<u64>,
    proxy: Option<String>,
    headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct LimiterSection {
    max_requests: Option<usize>,
    window_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    bind: Option<String>,
    port: Option<u16>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(WebreconError::IoError)?;
    parse_config(&content)
}

/// Parses TOML configuration text and merges it over the defaults
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file_config: FileConfig = toml::from_str(content)?;

    let mut config = AppConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(ua) = scan.user_agent {
            config.scan.user_agent = ua;
        }
        if let Some(timeout) = scan.fetch_timeout_secs {
            config.scan.fetch_timeout_secs = timeout;
        }
        if let Some(timeout) = scan.probe_timeout_secs {
            config.scan.probe_timeout_secs = timeout;
        }
        if let Some(delay) = scan.probe_delay_ms {
            config.scan.probe_delay_ms = delay;
        }
        if let Some(follow) = scan.follow_redirects {
            config.scan.follow_redirects = follow;
        }
        if let Some(path) = scan.wordlist_path {
            config.scan.wordlist_path = Some(path);
        }
        if let Some(dns) = scan.dns_lookups {
            config.scan.dns_lookups = dns;
        }
        if let Some(timeout) = scan.dns_timeout_secs {
            config.scan.dns_timeout_secs = timeout;
        }
        if let Some(deadline) = scan.scan_deadline_secs {
            // 0 disables the deadline
            config.scan.scan_deadline_secs = (deadline > 0).then_some(deadline);
        }
        if let Some(proxy) = scan.proxy {
            config.scan.proxy = Some(proxy);
        }
        if let Some(headers) = scan.headers {
            config.scan.headers.extend(headers);
        }
    }

    if let Some(limiter) = file_config.limiter {
        if let Some(max) = limiter.max_requests {
            config.limiter.max_requests = max;
        }
        if let Some(window) = limiter.window_secs {
            config.limiter.window_secs = window;
        }
    }

    if let Some(server) = file_config.server {
        if let Some(bind) = server.bind {
            config.server.bind = bind;
        }
        if let Some(port) = server.port {
            config.server.port = port;
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Rejects budgets and timeouts that would make the scanner unusable
pub fn validate(config: &AppConfig) -> Result<()> {
    if config.limiter.max_requests == 0 {
        return Err(WebreconError::ConfigError(
            "limiter.max_requests must be positive".to_string(),
        ));
    }
    if config.limiter.window_secs == 0 {
        return Err(WebreconError::ConfigError(
            "limiter.window_secs must be positive".to_string(),
        ));
    }
    if config.scan.probe_timeout_secs == 0 {
        return Err(WebreconError::ConfigError(
            "scan.probe_timeout_secs must be positive".to_string(),
        ));
    }
    if config.scan.fetch_timeout_secs == 0 {
        return Err(WebreconError::ConfigError(
            "scan.fetch_timeout_secs must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Merges CLI arguments into an existing AppConfig
pub fn merge_cli_args(
    config: &mut AppConfig,
    bind: Option<String>,
    port: Option<u16>,
    wordlist: Option<String>,
    probe_delay_ms: Option<u64>,
    headers: Option<Vec<String>>,
) {
    if let Some(b) = bind {
        config.server.bind = b;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(w) = wordlist {
        config.scan.wordlist_path = Some(w);
    }
    if let Some(d) = probe_delay_ms {
        config.scan.probe_delay_ms = d;
    }
    if let Some(h) = headers {
        for header in h {
            if let Some((key, value)) = header.split_once(':') {
                config
                    .scan
                    .headers
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_keeps_defaults() {
        let config = parse_config("").expect("empty config");
        assert_eq!(config.limiter.max_requests, 10);
        assert_eq!(config.limiter.window_secs, 60);
        assert_eq!(config.scan.probe_timeout_secs, 5);
        assert_eq!(config.scan.fetch_timeout_secs, 10);
        assert_eq!(config.scan.probe_delay_ms, 1000);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse_config(
            r#"
            [scan]
            probe_delay_ms = 250
            dns_lookups = false
            scan_deadline_secs = 0

            [scan.headers]
            "X-Scan-Id" = "abc"

            [limiter]
            max_requests = 3
            window_secs = 30

            [server]
            bind = "127.0.0.1"
            port = 8080
            "#,
        )
        .expect("valid config");

        assert_eq!(config.scan.probe_delay_ms, 250);
        assert!(!config.scan.dns_lookups);
        assert_eq!(config.scan.scan_deadline_secs, None);
        assert_eq!(
            config.scan.headers.get("X-Scan-Id").map(String::as_str),
            Some("abc")
        );
        assert_eq!(config.limiter.max_requests, 3);
        assert_eq!(config.limiter.window_secs, 30);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let err = parse_config("[limiter]\nmax_requests = 0\n").unwrap_err();
        assert!(matches!(err, WebreconError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = parse_config("[scan\nfoo").unwrap_err();
        assert!(matches!(err, WebreconError::TomlError(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[limiter]\nmax_requests = 2").expect("write");
        let config = load_config(file.path()).expect("load");
        assert_eq!(config.limiter.max_requests, 2);
    }

    #[test]
    fn test_merge_cli_args() {
        let mut config = AppConfig::default();
        merge_cli_args(
            &mut config,
            Some("127.0.0.1".to_string()),
            Some(9000),
            Some("words.txt".to_string()),
            Some(0),
            Some(vec!["Authorization: Bearer x".to_string(), "bogus".to_string()]),
        );
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.scan.wordlist_path.as_deref(), Some("words.txt"));
        assert_eq!(config.scan.probe_delay_ms, 0);
        assert_eq!(config.scan.headers.len(), 1);
        assert_eq!(
            config.scan.headers.get("Authorization").map(String::as_str),
            Some("Bearer x")
        );
    }
}
