//! webrecon - passive web reconnaissance and exposure scanner
//!
//! Collects HTTP and DNS metadata for a target, flags risky HTML
//! constructs and URL parameters, and sweeps a wordlist of common paths.
//! Every scan passes a process-wide sliding-window admission check and
//! every discovery probe is paced.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod ratelimit;
pub mod report;
pub mod scanner;
pub mod server;
pub mod utils;
