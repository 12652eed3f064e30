//! HTML report generation using Tera templates

use crate::error::Result;
use crate::models::ScanResult;
use std::path::Path;
use tera::{Context, Tera};
use tracing::info;

/// Renders the scan results page
pub fn render(result: &ScanResult) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("scan_results.html", results_template())?;

    let mut context = Context::new();
    context.insert("target", &result.target);
    context.insert("scan_id", &result.scan_id);
    context.insert("started_at", &result.started_at.to_rfc3339());
    context.insert("finished_at", &result.finished_at.to_rfc3339());
    context.insert("total_requests", &result.total_requests);
    context.insert("recon", &result.recon);
    context.insert("vulns", &result.vulnerabilities);
    context.insert("vuln_count", &result.vulnerabilities.total());
    context.insert("directories", &result.directories);
    context.insert("version", env!("CARGO_PKG_VERSION"));

    Ok(tera.render("scan_results.html", &context)?)
}

/// Generates an HTML report file from scan results
pub fn generate(result: &ScanResult, output_path: &Path) -> Result<()> {
    let rendered = render(result)?;
    std::fs::write(output_path, rendered)?;
    info!("HTML report saved to {}", output_path.display());
    Ok(())
}

fn results_template() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>webrecon - Scan Results</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f1f5f9; color: #1e293b; line-height: 1.6; }
        .container { max-width: 1100px; margin: 0 auto; padding: 20px; }
        .header { background: linear-gradient(135deg, #0f172a 0%, #1e293b 50%, #334155 100%); color: white; padding: 30px; border-radius: 12px; margin-bottom: 25px; }
        .header h1 { font-size: 1.8em; margin-bottom: 5px; }
        .header .meta { opacity: 0.7; font-size: 0.9em; word-break: break-all; }
        .info-bar { background: white; padding: 15px 25px; border-radius: 10px; margin-bottom: 20px; display: flex; justify-content: space-between; flex-wrap: wrap; gap: 10px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); font-size: 0.9em; color: #64748b; }
        .section-title { font-size: 1.3em; font-weight: 700; margin: 25px 0 12px; padding-bottom: 8px; border-bottom: 2px solid #e2e8f0; }
        .panel { background: white; padding: 20px 25px; border-radius: 10px; margin-bottom: 15px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        table { width: 100%; border-collapse: collapse; font-size: 0.9em; }
        th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #f1f5f9; vertical-align: top; word-break: break-all; }
        th { color: #475569; }
        .tag { display: inline-block; padding: 2px 10px; margin: 2px; border-radius: 20px; background: #e0f2fe; color: #0369a1; font-size: 0.85em; }
        .status { font-weight: 700; }
        .status-200 { color: #16a34a; } .status-301, .status-302 { color: #ca8a04; } .status-403 { color: #dc2626; }
        .empty { color: #94a3b8; font-style: italic; }
        .footer { text-align: center; padding: 30px; color: #94a3b8; font-size: 0.85em; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Scan Results</h1>
            <div class="meta">Target: {{ target }} | Scan ID: {{ scan_id }}</div>
        </div>
        <div class="info-bar">
            <span><strong>Started:</strong> {{ started_at }}</span>
            <span><strong>Finished:</strong> {{ finished_at }}</span>
            <span><strong>Requests:</strong> {{ total_requests }}</span>
        </div>

        <div class="section-title">Reconnaissance</div>
        <div class="panel">
            <p><strong>Technologies:</strong>
            {% for tech in recon.technologies %}<span class="tag">{{ tech }}</span>{% endfor %}
            {% if not recon.technologies %}<span class="empty">none detected</span>{% endif %}</p>
            {% for key, value in recon.server_info %}<p><strong>{{ key }}:</strong> {{ value }}</p>{% endfor %}
        </div>
        <div class="panel">
            <strong>DNS</strong>
            <table>
                {% if recon.dns_info.ip %}<tr><th>IP</th><td>{{ recon.dns_info.ip }}</td></tr>{% endif %}
                {% if recon.dns_info.hostname %}<tr><th>Hostname</th><td>{{ recon.dns_info.hostname }}</td></tr>{% endif %}
                {% for kind, values in recon.dns_info.records %}<tr><th>{{ kind }}</th><td>{{ values | join(sep=", ") }}</td></tr>{% endfor %}
                {% if recon.dns_info.error %}<tr><th>Error</th><td>{{ recon.dns_info.error }}</td></tr>{% endif %}
            </table>
        </div>
        <div class="panel">
            <strong>Headers</strong>
            <table>
                {% for name, value in recon.headers %}<tr><th>{{ name }}</th><td>{{ value }}</td></tr>{% endfor %}
            </table>
        </div>

        <div class="section-title">Vulnerability Surface ({{ vuln_count }})</div>
        <div class="panel">
            <strong>Possible XSS inputs</strong>
            <table>
                {% for item in vulns.xss %}<tr><td>{{ item.form_action }}</td><td>{{ item.input_name }}</td><td>{{ item.risk }}</td></tr>{% endfor %}
                {% if not vulns.xss %}<tr><td class="empty">none</td></tr>{% endif %}
            </table>
        </div>
        <div class="panel">
            <strong>Possible SQL injection parameters</strong>
            <table>
                {% for item in vulns.sql_injection %}<tr><td>{{ item.parameter }}</td><td>{{ item.risk }}</td></tr>{% endfor %}
                {% if not vulns.sql_injection %}<tr><td class="empty">none</td></tr>{% endif %}
            </table>
        </div>
        <div class="panel">
            <strong>Possible open redirects</strong>
            <table>
                {% for item in vulns.open_redirects %}<tr><td>{{ item.parameter }}</td><td>{{ item.value }}</td><td>{{ item.risk }}</td></tr>{% endfor %}
                {% if not vulns.open_redirects %}<tr><td class="empty">none</td></tr>{% endif %}
            </table>
        </div>
        <div class="panel">
            <strong>Exposed files</strong>
            <table>
                {% for item in vulns.information_disclosure %}<tr><td>{{ item.url }}</td><td>{{ item.risk }}</td></tr>{% endfor %}
                {% if not vulns.information_disclosure %}<tr><td class="empty">none</td></tr>{% endif %}
            </table>
        </div>

        <div class="section-title">Discovered Paths ({{ directories.discovered | length }})</div>
        <div class="panel">
            <table>
                <tr><th>URL</th><th>Status</th><th>Content-Type</th></tr>
                {% for item in directories.discovered %}
                <tr><td>{{ item.url }}</td><td class="status status-{{ item.status_code }}">{{ item.status_code }}</td><td>{% if item.content_type %}{{ item.content_type }}{% else %}unknown{% endif %}</td></tr>
                {% endfor %}
                {% if not directories.discovered %}<tr><td class="empty" colspan="3">no paths discovered</td></tr>{% endif %}
            </table>
        </div>
        {% if directories.errors %}
        <div class="panel">
            <strong>Probe errors ({{ directories.errors | length }})</strong>
            <table>
                {% for item in directories.errors %}<tr><td>{{ item.url }}</td><td>{{ item.error }}</td></tr>{% endfor %}
            </table>
        </div>
        {% endif %}

        <div class="footer">Generated by webrecon v{{ version }} | {{ started_at }}</div>
    </div>
</body>
</html>"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProbeError, ProbeResult, ReconReport, SweepReport, VulnReport};
    use chrono::Local;

    fn sample() -> ScanResult {
        ScanResult {
            target: "https://example.com/".to_string(),
            scan_id: "scan-1".to_string(),
            started_at: Local::now(),
            finished_at: Local::now(),
            recon: ReconReport {
                technologies: vec!["<b>jquery</b>".to_string()],
                ..ReconReport::default()
            },
            vulnerabilities: VulnReport::default(),
            directories: SweepReport {
                discovered: vec![ProbeResult {
                    url: "https://example.com/admin".to_string(),
                    status_code: 403,
                    content_type: None,
                }],
                errors: vec![ProbeError {
                    url: "https://example.com/backup".to_string(),
                    error: "timeout".to_string(),
                }],
            },
            total_requests: 7,
        }
    }

    #[test]
    fn test_render_contains_sections() {
        let html = render(&sample()).expect("render");
        assert!(html.contains("https://example.com/admin"));
        assert!(html.contains("status-403"));
        assert!(html.contains("unknown"));
        assert!(html.contains("https://example.com/backup"));
        assert!(html.contains("Probe errors (1)"));
    }

    #[test]
    fn test_render_escapes_target_content() {
        let html = render(&sample()).expect("render");
        assert!(!html.contains("<b>jquery</b>"));
        assert!(html.contains("&lt;b&gt;jquery&lt;&#x2F;b&gt;"));
    }
}
