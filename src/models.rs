//! Core data models for webrecon

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A candidate path that answered with an interesting status code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    /// Candidate URL that was probed
    pub url: String,
    /// Final HTTP status after redirects
    pub status_code: u16,
    /// Content-Type header, when the server sent one
    pub content_type: Option<String>,
}

/// A candidate path whose probe failed at the transport layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeError {
    /// Candidate URL (or the raw word if it could not be resolved)
    pub url: String,
    /// Description of the failure
    pub error: String,
}

/// Classification of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Status code counts as discovered
    Hit(ProbeResult),
    /// The server answered but the status is not interesting
    Miss { url: String, status: u16 },
    /// Transport failure (timeout, DNS, refused, TLS)
    Failed(ProbeError),
}

/// Output of one discovery sweep, in wordlist order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepReport {
    pub discovered: Vec<ProbeResult>,
    pub errors: Vec<ProbeError>,
}

/// DNS information gathered during recon
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsInfo {
    pub ip: Option<String>,
    pub hostname: Option<String>,
    /// Record type (A, MX, NS) to record values
    pub records: BTreeMap<String, Vec<String>>,
    pub error: Option<String>,
}

/// Output of the recon phase
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconReport {
    /// Response headers of the target page
    pub headers: BTreeMap<String, String>,
    /// Detected frameworks and generators
    pub technologies: Vec<String>,
    pub dns_info: DnsInfo,
    /// Server software hints (`server`, `x-powered-by`)
    pub server_info: BTreeMap<String, String>,
}

/// Text input inside a form that may reflect user input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct XssCandidate {
    pub form_action: String,
    pub input_name: String,
    pub risk: String,
}

/// Query parameter that may reach a database query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterCandidate {
    pub parameter: String,
    pub risk: String,
}

/// Query parameter that looks like a redirect destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedirectCandidate {
    pub parameter: String,
    pub value: String,
    pub risk: String,
}

/// Sensitive file that answered with HTTP 200
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExposedFile {
    pub file: String,
    pub url: String,
    pub risk: String,
}

/// Output of the vulnerability heuristics phase
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VulnReport {
    pub xss: Vec<XssCandidate>,
    pub sql_injection: Vec<ParameterCandidate>,
    pub open_redirects: Vec<RedirectCandidate>,
    pub information_disclosure: Vec<ExposedFile>,
}

impl VulnReport {
    /// Total number of flagged items across all categories
    pub fn total(&self) -> usize {
        self.xss.len()
            + self.sql_injection.len()
            + self.open_redirects.len()
            + self.information_disclosure.len()
    }
}

/// Result of a complete scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Target URL
    pub target: String,
    /// Unique scan identifier
    pub scan_id: String,
    /// Scan start time (local timezone)
    pub started_at: DateTime<Local>,
    /// Scan end time (local timezone)
    pub finished_at: DateTime<Local>,
    pub recon: ReconReport,
    pub vulnerabilities: VulnReport,
    pub directories: SweepReport,
    /// Total HTTP requests sent to the target
    pub total_requests: u64,
}

/// Configuration for scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// User-Agent header value
    pub user_agent: String,
    /// Timeout for full-page fetches in seconds
    pub fetch_timeout_secs: u64,
    /// Timeout for existence probes in seconds
    pub probe_timeout_secs: u64,
    /// Pause before every discovery probe in milliseconds
    pub probe_delay_ms: u64,
    /// Whether to follow HTTP redirects
    pub follow_redirects: bool,
    /// Path to custom wordlist
    pub wordlist_path: Option<String>,
    /// Run DNS lookups during recon
    pub dns_lookups: bool,
    /// Per-query DNS timeout in seconds
    pub dns_timeout_secs: u64,
    /// Overall deadline for one scan in seconds
    pub scan_deadline_secs: Option<u64>,
    /// HTTP/HTTPS proxy URL
    pub proxy: Option<String>,
    /// Custom HTTP headers
    pub headers: HashMap<String, String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("webrecon/{}", env!("CARGO_PKG_VERSION")),
            fetch_timeout_secs: 10,
            probe_timeout_secs: 5,
            probe_delay_ms: 1000,
            follow_redirects: true,
            wordlist_path: None,
            dns_lookups: true,
            dns_timeout_secs: 3,
            scan_deadline_secs: Some(300),
            proxy: None,
            headers: HashMap::new(),
        }
    }
}

/// Budget for the process-wide admission limiter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimiterConfig {
    /// Scans admitted per window
    pub max_requests: usize,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }
}

/// Listener settings for the web endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub limiter: LimiterConfig,
    pub server: ServerConfig,
}
