//! Error types for webrecon

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scan phase a failure originated from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Recon,
    Vulnerabilities,
    Discovery,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPhase::Recon => write!(f, "recon"),
            ScanPhase::Vulnerabilities => write!(f, "vulnerabilities"),
            ScanPhase::Discovery => write!(f, "discovery"),
        }
    }
}

/// Main error type for webrecon operations
#[derive(Debug, Error)]
pub enum WebreconError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Rate limit exceeded")]
    AdmissionRejected,

    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("{phase} phase failed: {source}")]
    PhaseFailed {
        phase: ScanPhase,
        #[source]
        source: Box<WebreconError>,
    },

    #[error("Directory sweep aborted: {0}")]
    SweepFailed(String),

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Server error: {0}")]
    ServerError(String),
}

impl WebreconError {
    /// Wraps an error as the failure of a whole scan phase
    pub fn phase(phase: ScanPhase, source: WebreconError) -> Self {
        WebreconError::PhaseFailed {
            phase,
            source: Box::new(source),
        }
    }

    /// HTTP status the web layer answers with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            WebreconError::AdmissionRejected => 429,
            WebreconError::InvalidTarget(_) => 400,
            WebreconError::Cancelled => 504,
            _ => 500,
        }
    }

    /// Short message safe to show to the requester.
    ///
    /// Internal detail (transport errors, parser output) stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            WebreconError::AdmissionRejected => {
                "Rate limit exceeded. Please wait before requesting another scan.".to_string()
            }
            WebreconError::InvalidTarget(_) => "Invalid URL provided".to_string(),
            WebreconError::PhaseFailed { phase, .. } => {
                format!("Scan failed during the {phase} phase")
            }
            WebreconError::Cancelled => "Scan deadline exceeded".to_string(),
            _ => "Scan failed".to_string(),
        }
    }
}

/// Result type alias for webrecon operations
pub type Result<T> = std::result::Result<T, WebreconError>;
