//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use webrecon::models::{AppConfig, ScanConfig};
use webrecon::ratelimit::RateLimiter;
use webrecon::scanner::ScanEngine;

/// Scan settings tuned for a local wiremock target
pub fn test_scan_config() -> ScanConfig {
    ScanConfig {
        user_agent: "webrecon-test/0.1.0".to_string(),
        fetch_timeout_secs: 2,
        probe_timeout_secs: 1,
        probe_delay_ms: 0,
        dns_lookups: false,
        scan_deadline_secs: None,
        ..ScanConfig::default()
    }
}

pub fn test_app_config() -> AppConfig {
    AppConfig {
        scan: test_scan_config(),
        ..AppConfig::default()
    }
}

/// Engine with a small wordlist and the given admission budget
pub fn test_engine(max_requests: usize, wordlist: &[&str]) -> ScanEngine {
    let limiter = Arc::new(RateLimiter::new(max_requests, Duration::from_secs(60)));
    ScanEngine::new(&test_app_config(), limiter)
        .expect("engine")
        .with_wordlist(wordlist.iter().map(|w| w.to_string()).collect())
}

/// A local port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    port
}
