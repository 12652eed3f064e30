//! HTTP client wrapper for page fetches and existence probes

use crate::error::{Result, WebreconError};
use crate::models::{ProbeError, ProbeOutcome, ProbeResult, ScanConfig};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Status codes that mean a probed path exists
pub const HIT_STATUSES: &[u16] = &[200, 301, 302, 403];

/// Anything that can check whether a candidate URL exists
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HTTP client wrapper with per-kind timeouts and request counting
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_count: Arc<AtomicU64>,
    fetch_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpClient {
    /// Creates a new HttpClient from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| WebreconError::ConfigError(format!("Invalid header '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| WebreconError::ConfigError(format!("Invalid header '{key}': {e}")))?;
            default_headers.insert(name, value);
        }

        // Certificate validation stays on: the scanner never hides TLS problems.
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(default_headers)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .danger_accept_invalid_certs(false);

        if let Some(ref proxy_url) = config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| WebreconError::ConfigError(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            request_count: Arc::new(AtomicU64::new(0)),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        })
    }

    /// Returns a client sharing this connection pool with its own request counter
    pub fn scoped(&self) -> Self {
        Self {
            client: self.client.clone(),
            request_count: Arc::new(AtomicU64::new(0)),
            fetch_timeout: self.fetch_timeout,
            probe_timeout: self.probe_timeout,
        }
    }

    /// Sends a full-content GET bounded by the fetch timeout
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response)
    }

    /// Sends a HEAD request bounded by the probe timeout
    pub async fn head(&self, url: &str) -> Result<Response> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let response = self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await?;
        debug!("HEAD {} -> {}", url, response.status());
        Ok(response)
    }

    /// Returns the total number of requests made
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Prober for HttpClient {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.head(url).await {
            Ok(response) => {
                let status = response.status().as_u16();
                if HIT_STATUSES.contains(&status) {
                    let content_type = response
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);
                    ProbeOutcome::Hit(ProbeResult {
                        url: url.to_string(),
                        status_code: status,
                        content_type,
                    })
                } else {
                    ProbeOutcome::Miss {
                        url: url.to_string(),
                        status,
                    }
                }
            }
            Err(e) => {
                warn!("Probe failed for {url}: {e}");
                ProbeOutcome::Failed(ProbeError {
                    url: url.to_string(),
                    error: describe_transport_error(&e),
                })
            }
        }
    }
}

/// Produces a one-line description of a probe failure
fn describe_transport_error(error: &WebreconError) -> String {
    match error {
        WebreconError::HttpError(e) if e.is_timeout() => format!("timeout: {e}"),
        WebreconError::HttpError(e) if e.is_connect() => format!("connection failed: {e}"),
        WebreconError::HttpError(e) if e.is_redirect() => format!("redirect loop: {e}"),
        other => other.to_string(),
    }
}
