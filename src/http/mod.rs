//! HTTP client module for webrecon

pub mod client;
pub use client::{HttpClient, Prober, HIT_STATUSES};
