//! Passive reconnaissance: headers, technology hints and DNS

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{DnsInfo, ReconReport};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;
use url::{Host, Url};

/// Script sources that identify a frontend framework
const COMMON_FRAMEWORKS: &[&str] = &["react", "angular", "vue", "jquery", "bootstrap"];

/// Headers copied into `server_info`
const SERVER_HEADERS: &[&str] = &["server", "x-powered-by"];

/// Recon collaborator used by the scan engine
#[async_trait]
pub trait Recon: Send + Sync {
    async fn perform(&self, client: &HttpClient, target: &Url) -> Result<ReconReport>;
}

/// Default recon: one GET plus optional DNS lookups
pub struct HttpRecon {
    dns_lookups: bool,
    dns_timeout: Duration,
}

impl HttpRecon {
    pub fn new(dns_lookups: bool, dns_timeout: Duration) -> Self {
        Self {
            dns_lookups,
            dns_timeout,
        }
    }
}

#[async_trait]
impl Recon for HttpRecon {
    async fn perform(&self, client: &HttpClient, target: &Url) -> Result<ReconReport> {
        let response = client.get(target.as_str()).await?;

        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            headers.insert(
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }

        let server_info = SERVER_HEADERS
            .iter()
            .filter_map(|h| headers.get(*h).map(|v| (h.to_string(), v.clone())))
            .collect();

        let body = response.text().await?;
        let technologies = detect_technologies(&body);
        info!("Detected {} technologies on {}", technologies.len(), target);

        let dns_info = if self.dns_lookups {
            collect_dns_info(target, self.dns_timeout).await
        } else {
            DnsInfo::default()
        };

        Ok(ReconReport {
            headers,
            technologies,
            dns_info,
            server_info,
        })
    }
}

/// Finds generator meta tags and well-known frameworks in script sources
pub fn detect_technologies(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut technologies: Vec<String> = Vec::new();

    if let Ok(selector) = Selector::parse(r#"meta[name="generator"]"#) {
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            let content = content.trim();
            if !content.is_empty() {
                technologies.push(content.to_string());
            }
        }
    }

    if let Ok(selector) = Selector::parse("script[src]") {
        for script in document.select(&selector) {
            let src = script.value().attr("src").unwrap_or_default().to_lowercase();
            for framework in COMMON_FRAMEWORKS {
                if src.contains(framework) && !technologies.iter().any(|t| t == framework) {
                    technologies.push(framework.to_string());
                }
            }
        }
    }

    technologies
}

/// Resolves the target host and gathers A, MX and NS records.
///
/// Lookup failures are reported inside the result; they never fail recon.
async fn collect_dns_info(target: &Url, timeout: Duration) -> DnsInfo {
    let mut info = DnsInfo::default();

    let (host, literal_ip) = match target.host() {
        Some(Host::Domain(domain)) => (domain.to_string(), None),
        Some(Host::Ipv4(ip)) => (ip.to_string(), Some(IpAddr::V4(ip))),
        Some(Host::Ipv6(ip)) => (ip.to_string(), Some(IpAddr::V6(ip))),
        None => {
            info.error = Some("DNS resolution failed".to_string());
            return info;
        }
    };

    let ip = match literal_ip {
        Some(ip) => ip,
        None => {
            let port = target.port_or_known_default().unwrap_or(80);
            match tokio::time::timeout(timeout, tokio::net::lookup_host((host.as_str(), port)))
                .await
            {
                Ok(Ok(mut addrs)) => match addrs.next() {
                    Some(addr) => addr.ip(),
                    None => {
                        info.error = Some("DNS resolution failed".to_string());
                        return info;
                    }
                },
                _ => {
                    debug!("Forward lookup failed for {host}");
                    info.error = Some("DNS resolution failed".to_string());
                    return info;
                }
            }
        }
    };
    info.ip = Some(ip.to_string());

    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);

    info.hostname = Some(match resolver.reverse_lookup(ip).await {
        Ok(names) => names
            .iter()
            .next()
            .map(|name| name.to_string().trim_end_matches('.').to_string())
            .unwrap_or_else(|| "unavailable".to_string()),
        Err(e) => {
            debug!("Reverse lookup failed for {ip}: {e}");
            "unavailable".to_string()
        }
    });

    if literal_ip.is_some() {
        return info;
    }

    let a_records = match resolver.ipv4_lookup(host.as_str()).await {
        Ok(lookup) => lookup.iter().map(|r| r.to_string()).collect(),
        Err(_) => Vec::new(),
    };
    info.records.insert("A".to_string(), a_records);

    let mx_records = match resolver.mx_lookup(host.as_str()).await {
        Ok(lookup) => lookup.iter().map(|r| r.to_string()).collect(),
        Err(_) => Vec::new(),
    };
    info.records.insert("MX".to_string(), mx_records);

    let ns_records = match resolver.ns_lookup(host.as_str()).await {
        Ok(lookup) => lookup.iter().map(|r| r.to_string()).collect(),
        Err(_) => Vec::new(),
    };
    info.records.insert("NS".to_string(), ns_records);

    info
}
