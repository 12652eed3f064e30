//! Input validation helpers

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Returns true for absolute http(s) URLs with a non-empty host
pub fn validate_url(raw: &str) -> bool {
    if raw.is_empty() {
        return false;
    }

    match Url::parse(raw) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Strips every character that is not alphanumeric or legal URL punctuation
pub fn sanitize_input(input: &str) -> String {
    static DISALLOWED: OnceLock<Option<Regex>> = OnceLock::new();
    let re = DISALLOWED.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\-._~:/?#\[\]@!$&'()*+,;=]").ok());

    match re {
        Some(re) => re.replace_all(input, "").into_owned(),
        None => input
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=".contains(*c))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com"));
        assert!(validate_url("http://example.com/path?q=1"));
        assert!(validate_url("http://127.0.0.1:8080"));
        assert!(!validate_url("not a url"));
        assert!(!validate_url(""));
        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("javascript:alert(1)"));
        assert!(!validate_url("file:///etc/passwd"));
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(
            sanitize_input("https://example.com/a?b=c&d=e#f"),
            "https://example.com/a?b=c&d=e#f"
        );
        assert_eq!(sanitize_input("<script>alert(1)</script>"), "scriptalert(1)/script");
        assert_eq!(sanitize_input("line\nbreak and spaces"), "linebreakandspaces");
        assert_eq!(sanitize_input("{\"x\"|`}"), "x");
    }
}
