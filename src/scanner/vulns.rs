//! Passive vulnerability heuristics: form inputs, URL parameters, exposed files

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{
    ExposedFile, ParameterCandidate, RedirectCandidate, VulnReport, XssCandidate,
};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

/// Input types that accept free text
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "url", "tel", "email"];

/// Query parameter names commonly used as redirect destinations
const REDIRECT_PARAMS: &[&str] = &[
    "redirect",
    "redirect_uri",
    "redirect_url",
    "url",
    "next",
    "return",
    "returnurl",
    "return_to",
    "goto",
    "dest",
    "destination",
    "continue",
];

/// Files whose exposure leaks structure, source or secrets
pub const SENSITIVE_FILES: &[&str] = &["robots.txt", ".git/HEAD", "wp-config.php", ".env", "phpinfo.php"];

/// Vulnerability heuristics collaborator used by the scan engine
#[async_trait]
pub trait VulnerabilityScanner: Send + Sync {
    async fn scan(&self, client: &HttpClient, target: &Url) -> Result<VulnReport>;
}

/// Default heuristics: inspects the target page and probes a few known files
pub struct PassiveVulnScanner;

#[async_trait]
impl VulnerabilityScanner for PassiveVulnScanner {
    async fn scan(&self, client: &HttpClient, target: &Url) -> Result<VulnReport> {
        let response = client.get(target.as_str()).await?;
        let body = response.text().await?;

        let mut report = VulnReport {
            xss: find_text_inputs(&body),
            sql_injection: find_query_parameters(target),
            open_redirects: find_redirect_parameters(target),
            information_disclosure: Vec::new(),
        };

        info!("Checking {} sensitive file paths", SENSITIVE_FILES.len());
        for file in SENSITIVE_FILES {
            let Ok(url) = target.join(file) else {
                continue;
            };
            match client.head(url.as_str()).await {
                Ok(response) if response.status().as_u16() == 200 => {
                    report.information_disclosure.push(ExposedFile {
                        file: file.to_string(),
                        url: url.to_string(),
                        risk: "Potentially sensitive file exposed".to_string(),
                    });
                }
                Ok(response) => debug!("{url} -> {}", response.status()),
                Err(e) => debug!("Skipping {url}: {e}"),
            }
        }

        Ok(report)
    }
}

/// Flags free-text inputs inside forms as reflection candidates
pub fn find_text_inputs(html: &str) -> Vec<XssCandidate> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    let (Ok(form_sel), Ok(input_sel)) = (Selector::parse("form"), Selector::parse("input"))
    else {
        return candidates;
    };

    for form in document.select(&form_sel) {
        let action = form.value().attr("action").unwrap_or_default();
        for input in form.select(&input_sel) {
            let Some(input_type) = input.value().attr("type") else {
                continue;
            };
            if TEXT_INPUT_TYPES.contains(&input_type.to_lowercase().as_str()) {
                candidates.push(XssCandidate {
                    form_action: action.to_string(),
                    input_name: input.value().attr("name").unwrap_or_default().to_string(),
                    risk: "Possible XSS point - validate and sanitize input".to_string(),
                });
            }
        }
    }

    candidates
}

/// Lists each distinct query parameter of the target that carries a value
pub fn find_query_parameters(target: &Url) -> Vec<ParameterCandidate> {
    let mut seen = Vec::new();
    for (name, value) in target.query_pairs() {
        if !value.is_empty() && !seen.contains(&name) {
            seen.push(name);
        }
    }

    seen.into_iter()
        .map(|name| ParameterCandidate {
            parameter: name.into_owned(),
            risk: "Possible SQL injection point - validate and sanitize input".to_string(),
        })
        .collect()
}

/// Lists query parameters whose names suggest a redirect destination
pub fn find_redirect_parameters(target: &Url) -> Vec<RedirectCandidate> {
    target
        .query_pairs()
        .filter(|(name, value)| {
            !value.is_empty() && REDIRECT_PARAMS.contains(&name.to_lowercase().as_str())
        })
        .map(|(name, value)| RedirectCandidate {
            parameter: name.into_owned(),
            value: value.into_owned(),
            risk: "Possible open redirect - restrict destinations to an allow-list".to_string(),
        })
        .collect()
}
