//! Web endpoint: one form, one scan route

use crate::error::{Result, WebreconError};
use crate::report;
use crate::scanner::ScanEngine;
use crate::utils::sanitize_input;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Largest form body accepted on `/scan`
const MAX_FORM_BYTES: usize = 16 * 1024;

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";

/// State shared by every connection
pub struct AppState {
    pub engine: ScanEngine,
}

/// Accepts connections until the listener fails
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Listening on http://{addr}");

    loop {
        let (stream, remote_addr) = listener.accept().await?;
        let state = Arc::clone(&state);
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let state = Arc::clone(&state);
                async move { handle_request(req, remote_addr, state).await }
            });

            // Dropping the connection drops any scan in flight for it
            if let Err(e) = hyper::server::conn::http1::Builder::new()
                .serve_connection(io, service)
                .await
            {
                debug!("Connection error from {remote_addr}: {e}");
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    remote_addr: SocketAddr,
    state: Arc<AppState>,
) -> std::result::Result<Response<String>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!("{method} {path} from {remote_addr}");

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/") => respond(StatusCode::OK, HTML, INDEX_PAGE.to_string()),
        (&Method::GET, "/scan") => {
            let target = req
                .uri()
                .query()
                .and_then(|q| form_field(q.as_bytes(), "target_url"))
                .unwrap_or_default();
            let wants_json = wants_json(&req);
            run_scan(&state, &target, wants_json).await
        }
        (&Method::POST, "/scan") => {
            let wants_json = wants_json(&req);
            match Limited::new(req.into_body(), MAX_FORM_BYTES).collect().await {
                Ok(body) => {
                    let target = form_field(&body.to_bytes(), "target_url").unwrap_or_default();
                    run_scan(&state, &target, wants_json).await
                }
                Err(e) => {
                    warn!("Unreadable form body from {remote_addr}: {e}");
                    error_response(StatusCode::BAD_REQUEST, "Invalid form body")
                }
            }
        }
        _ => error_response(StatusCode::NOT_FOUND, "Not found"),
    };

    Ok(response)
}

/// Runs one scan and turns the outcome into a response
async fn run_scan(state: &AppState, target: &str, wants_json: bool) -> Response<String> {
    match state.engine.run_with_deadline(target).await {
        Ok(result) => {
            let rendered = if wants_json {
                serde_json::to_string(&result).map_err(WebreconError::from)
            } else {
                report::html::render(&result)
            };
            match rendered {
                Ok(body) => respond(StatusCode::OK, if wants_json { JSON } else { HTML }, body),
                Err(e) => {
                    error!("Could not render results for {}: {e}", sanitize_input(target));
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Scan failed")
                }
            }
        }
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                error!("Scan of {} failed: {e}", sanitize_input(target));
            }

            let mut response = error_response(status, &e.user_message());
            if matches!(e, WebreconError::AdmissionRejected) {
                let retry = state.engine.limiter().time_window().as_secs().to_string();
                if let Ok(value) = HeaderValue::from_str(&retry) {
                    response.headers_mut().insert(RETRY_AFTER, value);
                }
            }
            response
        }
    }
}

fn wants_json(req: &Request<Incoming>) -> bool {
    req.headers()
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(JSON))
}

/// Extracts one field from an urlencoded form or query string
fn form_field(encoded: &[u8], name: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn error_response(status: StatusCode, message: &str) -> Response<String> {
    let body = serde_json::json!({ "error": message }).to_string();
    respond(status, JSON, body)
}

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>webrecon</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f1f5f9; color: #1e293b; }
        .box { max-width: 640px; margin: 80px auto; background: white; padding: 30px; border-radius: 12px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        input[type=url] { width: 100%; padding: 10px; margin: 15px 0; border: 1px solid #cbd5e1; border-radius: 6px; box-sizing: border-box; }
        button { padding: 10px 20px; background: #0f172a; color: white; border: 0; border-radius: 6px; cursor: pointer; }
        button:disabled { opacity: 0.6; }
        .note { color: #64748b; font-size: 0.85em; margin-top: 15px; }
    </style>
</head>
<body>
    <div class="box">
        <h1>webrecon</h1>
        <p>Passive reconnaissance and exposure scan of a web target.</p>
        <form id="scanForm" method="post" action="/scan">
            <input type="url" name="target_url" placeholder="https://example.com" required>
            <button type="submit">Scan</button>
        </form>
        <p class="note">Only scan targets you are authorized to test. Requests are paced and rate limited.</p>
    </div>
    <script>
        document.getElementById('scanForm').addEventListener('submit', function () {
            var button = this.querySelector('button[type="submit"]');
            button.disabled = true;
            button.textContent = 'Scanning...';
        });
    </script>
</body>
</html>"#;
