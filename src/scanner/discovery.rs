//! Directory and file discovery sweep

use crate::error::{Result, WebreconError};
use crate::http::Prober;
use crate::models::{ProbeError, ProbeOutcome, SweepReport};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

/// Built-in catalog of administrative, content, backup, staging and API paths
pub const DEFAULT_WORDLIST: &[&str] = &[
    // Admin areas
    "admin",
    "wp-admin",
    "administrator",
    "login",
    // Content
    "wp-content",
    "upload",
    "uploads",
    // Backups and configuration
    "backup",
    "backups",
    "config",
    // Development
    "dashboard",
    "cms",
    "test",
    "dev",
    "desenvolvimento",
    // Environments and APIs
    "staging",
    "prod",
    "api",
    "v1",
    "v2",
    // Common files
    "phpinfo",
    "php",
    "index",
    "images",
    "img",
];

/// Returns the built-in wordlist as owned strings
pub fn default_wordlist() -> Vec<String> {
    DEFAULT_WORDLIST.iter().map(|w| w.to_string()).collect()
}

/// Loads a wordlist file, one entry per line, falling back to the built-in catalog
pub fn load_wordlist(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let words: Vec<String> = content
                .lines()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .collect();
            if words.is_empty() {
                info!(
                    "Wordlist {} has no entries, using built-in defaults",
                    path.display()
                );
                default_wordlist()
            } else {
                words
            }
        }
        Err(e) => {
            info!(
                "Could not load wordlist from {}: {e}, using built-in defaults",
                path.display()
            );
            default_wordlist()
        }
    }
}

/// Probes every wordlist entry against a base URL, one at a time.
///
/// Each probe is preceded by a fixed pause. A failed probe is recorded in
/// the report and the sweep moves on to the next word.
pub struct DiscoverySweep<'a> {
    prober: &'a dyn Prober,
    probe_delay: Duration,
}

impl<'a> DiscoverySweep<'a> {
    pub fn new(prober: &'a dyn Prober, probe_delay: Duration) -> Self {
        Self {
            prober,
            probe_delay,
        }
    }

    /// Runs the sweep; only a bad base URL or cancellation aborts it
    pub async fn run(
        &self,
        base_url: &str,
        wordlist: &[String],
        cancel: &CancellationToken,
    ) -> Result<SweepReport> {
        let base = Url::parse(base_url)
            .map_err(|e| WebreconError::SweepFailed(format!("bad base URL '{base_url}': {e}")))?;

        info!(
            "Running directory discovery on {} with {} paths",
            base,
            wordlist.len()
        );

        let mut report = SweepReport::default();

        for word in wordlist {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WebreconError::Cancelled),
                _ = sleep(self.probe_delay) => {}
            }

            let candidate = match base.join(word) {
                Ok(url) => url,
                Err(e) => {
                    report.errors.push(ProbeError {
                        url: word.clone(),
                        error: format!("cannot resolve candidate: {e}"),
                    });
                    continue;
                }
            };

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WebreconError::Cancelled),
                outcome = self.prober.probe(candidate.as_str()) => outcome,
            };

            match outcome {
                ProbeOutcome::Hit(result) => {
                    debug!("Found: {} ({})", result.url, result.status_code);
                    report.discovered.push(result);
                }
                ProbeOutcome::Miss { url, status } => {
                    debug!("Skipping {url}: HTTP {status}");
                }
                ProbeOutcome::Failed(error) => report.errors.push(error),
            }
        }

        info!(
            "Directory discovery finished: {} found, {} errors",
            report.discovered.len(),
            report.errors.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProbeResult;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::io::Write;

    /// Answers from a fixed script and remembers the order of calls
    struct ScriptedProber {
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProber {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, url: &str) -> ProbeOutcome {
            self.calls.lock().push(url.to_string());
            if url.ends_with("/admin") || url.ends_with("/api") {
                ProbeOutcome::Hit(ProbeResult {
                    url: url.to_string(),
                    status_code: 200,
                    content_type: Some("text/html".to_string()),
                })
            } else if url.ends_with("/backup") || url.ends_with("/dev") {
                ProbeOutcome::Failed(ProbeError {
                    url: url.to_string(),
                    error: "connection refused".to_string(),
                })
            } else {
                ProbeOutcome::Miss {
                    url: url.to_string(),
                    status: 404,
                }
            }
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_sweep() {
        let prober = ScriptedProber::new();
        let sweep = DiscoverySweep::new(&prober, Duration::ZERO);
        let wordlist = words(&["backup", "admin", "dev", "missing", "api"]);

        let report = sweep
            .run("http://example.test/", &wordlist, &CancellationToken::new())
            .await
            .expect("sweep");

        assert_eq!(prober.calls.lock().len(), 5);
        let found: Vec<&str> = report.discovered.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(found, ["http://example.test/admin", "http://example.test/api"]);
        let failed: Vec<&str> = report.errors.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(failed, ["http://example.test/backup", "http://example.test/dev"]);
        assert!(report.discovered.len() + report.errors.len() <= wordlist.len());
    }

    #[tokio::test]
    async fn test_candidates_use_relative_resolution() {
        let prober = ScriptedProber::new();
        let sweep = DiscoverySweep::new(&prober, Duration::ZERO);

        sweep
            .run(
                "http://example.test/app/index.php",
                &words(&["admin", "/root-level"]),
                &CancellationToken::new(),
            )
            .await
            .expect("sweep");

        assert_eq!(
            *prober.calls.lock(),
            ["http://example.test/app/admin", "http://example.test/root-level"]
        );
    }

    #[tokio::test]
    async fn test_bad_base_url_fails_sweep() {
        let prober = ScriptedProber::new();
        let sweep = DiscoverySweep::new(&prober, Duration::ZERO);

        let err = sweep
            .run("not a url", &words(&["admin"]), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, WebreconError::SweepFailed(_)));
        assert!(prober.calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_delay_before_each_probe() {
        let prober = ScriptedProber::new();
        let sweep = DiscoverySweep::new(&prober, Duration::from_secs(1));
        let wordlist = words(&["a", "b", "c", "d"]);

        let started = tokio::time::Instant::now();
        sweep
            .run("http://example.test/", &wordlist, &CancellationToken::new())
            .await
            .expect("sweep");

        assert!(started.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_sweep() {
        let prober = ScriptedProber::new();
        let sweep = DiscoverySweep::new(&prober, Duration::from_secs(10));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(15)).await;
            trigger.cancel();
        });

        let err = sweep
            .run(
                "http://example.test/",
                &words(&["a", "b", "c", "d"]),
                &cancel,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WebreconError::Cancelled));
        assert_eq!(prober.calls.lock().len(), 1);
    }

    #[test]
    fn test_default_wordlist() {
        assert_eq!(DEFAULT_WORDLIST.len(), 25);
        assert!(DEFAULT_WORDLIST.contains(&"admin"));
        assert!(DEFAULT_WORDLIST.contains(&"backup"));
        assert!(DEFAULT_WORDLIST.contains(&"staging"));
        assert!(DEFAULT_WORDLIST.contains(&"api"));
    }

    #[test]
    fn test_load_wordlist_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "# comment\nadmin\n\n  secret  \n").expect("write");

        assert_eq!(load_wordlist(file.path()), ["admin", "secret"]);
    }

    #[test]
    fn test_load_wordlist_falls_back() {
        let words = load_wordlist(Path::new("/nonexistent/wordlist.txt"));
        assert_eq!(words.len(), DEFAULT_WORDLIST.len());
    }
}
