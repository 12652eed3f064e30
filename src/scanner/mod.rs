//! Scan engine: admission, validation and the three scan phases

pub mod discovery;
pub mod recon;
pub mod vulns;

use crate::error::{Result, ScanPhase, WebreconError};
use crate::http::HttpClient;
use crate::models::{AppConfig, ScanResult};
use crate::ratelimit::RateLimiter;
use crate::utils::{sanitize_input, validate_url};
use chrono::Local;
use discovery::DiscoverySweep;
use recon::{HttpRecon, Recon};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use url::Url;
use vulns::{PassiveVulnScanner, VulnerabilityScanner};

/// Runs recon, vulnerability heuristics and discovery for one target at a time.
///
/// The engine is cheap to share behind an `Arc`; the only state shared
/// between scans is the admission limiter.
pub struct ScanEngine {
    client: HttpClient,
    limiter: Arc<RateLimiter>,
    recon: Arc<dyn Recon>,
    vulns: Arc<dyn VulnerabilityScanner>,
    wordlist: Vec<String>,
    probe_delay: Duration,
    deadline: Option<Duration>,
}

impl ScanEngine {
    /// Creates an engine with the default collaborators
    pub fn new(config: &AppConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let client = HttpClient::from_config(&config.scan)?;
        let wordlist = match config.scan.wordlist_path {
            Some(ref path) => discovery::load_wordlist(Path::new(path)),
            None => discovery::default_wordlist(),
        };

        Ok(Self {
            client,
            limiter,
            recon: Arc::new(HttpRecon::new(
                config.scan.dns_lookups,
                Duration::from_secs(config.scan.dns_timeout_secs),
            )),
            vulns: Arc::new(PassiveVulnScanner),
            wordlist,
            probe_delay: Duration::from_millis(config.scan.probe_delay_ms),
            deadline: config.scan.scan_deadline_secs.map(Duration::from_secs),
        })
    }

    /// Replaces the recon collaborator
    pub fn with_recon(mut self, recon: Arc<dyn Recon>) -> Self {
        self.recon = recon;
        self
    }

    /// Replaces the vulnerability heuristics collaborator
    pub fn with_vulnerability_scanner(mut self, vulns: Arc<dyn VulnerabilityScanner>) -> Self {
        self.vulns = vulns;
        self
    }

    /// Replaces the discovery wordlist
    pub fn with_wordlist(mut self, wordlist: Vec<String>) -> Self {
        self.wordlist = wordlist;
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Runs a scan under the configured deadline, if any
    pub async fn run_with_deadline(&self, target: &str) -> Result<ScanResult> {
        let cancel = CancellationToken::new();
        let Some(deadline) = self.deadline else {
            return self.run(target, &cancel).await;
        };

        // Dropping this future (client gone) drops the deadline with it
        match tokio::time::timeout(deadline, self.run(target, &cancel)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Scan of {} exceeded its {:?} deadline", sanitize_input(target), deadline);
                Err(WebreconError::Cancelled)
            }
        }
    }

    /// Runs one scan: admission, validation, then recon, vulnerabilities and discovery.
    ///
    /// A failing phase aborts the scan; no partial result is returned.
    pub async fn run(&self, target: &str, cancel: &CancellationToken) -> Result<ScanResult> {
        if !self.limiter.allow_request() {
            warn!("Scan request rejected by rate limiter");
            return Err(WebreconError::AdmissionRejected);
        }

        if !validate_url(target) {
            warn!("Rejected invalid target '{}'", sanitize_input(target));
            return Err(WebreconError::InvalidTarget(sanitize_input(target)));
        }
        let url = Url::parse(target)?;

        let started_at = Local::now();
        let client = self.client.scoped();
        info!("Starting scan of {url}");

        let recon = self
            .phase(ScanPhase::Recon, cancel, self.recon.perform(&client, &url))
            .await?;

        let vulnerabilities = self
            .phase(
                ScanPhase::Vulnerabilities,
                cancel,
                self.vulns.scan(&client, &url),
            )
            .await?;

        let sweep = DiscoverySweep::new(&client, self.probe_delay);
        let directories = self
            .phase(
                ScanPhase::Discovery,
                cancel,
                sweep.run(url.as_str(), &self.wordlist, cancel),
            )
            .await?;

        let result = ScanResult {
            target: url.to_string(),
            scan_id: uuid::Uuid::new_v4().to_string(),
            started_at,
            finished_at: Local::now(),
            recon,
            vulnerabilities,
            directories,
            total_requests: client.request_count(),
        };

        info!(
            "Scan of {} complete: {} technologies, {} flagged items, {} paths found, {} requests",
            result.target,
            result.recon.technologies.len(),
            result.vulnerabilities.total(),
            result.directories.discovered.len(),
            result.total_requests
        );

        Ok(result)
    }

    /// Awaits one phase, tagging its failure and honoring cancellation
    async fn phase<T, F>(&self, phase: ScanPhase, cancel: &CancellationToken, fut: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        info!("Executing phase: {phase}");
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WebreconError::Cancelled),
            outcome = fut => outcome,
        };

        match outcome {
            Ok(value) => Ok(value),
            Err(WebreconError::Cancelled) => Err(WebreconError::Cancelled),
            Err(e) => {
                error!("Phase '{phase}' failed: {e}");
                Err(WebreconError::phase(phase, e))
            }
        }
    }
}
