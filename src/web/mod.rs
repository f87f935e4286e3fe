//! Embedded web dashboard for taxidash.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The HTML dashboard, rebuilt from the backend on every page load
//! - JSON endpoints exposing the same data
//!
//! Launched via `taxidash web` (default: `http://127.0.0.1:8050`).

mod api;

use anyhow::{Context, Result};
use tiny_http::{Header, Response, Server, StatusCode};

use crate::api::AnalyticsSource;
use crate::config::schema::DisplayConfig;
use crate::dashboard::DashboardController;

/// Everything a request handler needs.
pub struct WebState<A> {
    pub controller: DashboardController<A>,
    pub display: DisplayConfig,
}

/// A finished response, before it is handed to `tiny_http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

impl Reply {
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: JSON,
            body,
        }
    }

    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: HTML,
            body,
        }
    }

    fn not_found() -> Self {
        Self::json(404, r#"{"error": "not found"}"#.to_string())
    }

    fn internal_error(err: &anyhow::Error) -> Self {
        Self::json(500, serde_json::json!({ "error": format!("{err:#}") }).to_string())
    }

    fn into_response(self) -> Result<Response<std::io::Cursor<Vec<u8>>>> {
        let header = Header::from_bytes("Content-Type", self.content_type)
            .map_err(|_| anyhow::anyhow!("invalid content type header"))?;
        Ok(Response::from_data(self.body.into_bytes())
            .with_header(header)
            .with_status_code(StatusCode(self.status)))
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard on `addr`.
///
/// Blocks the current thread and handles requests one at a time. Handler
/// errors become 500 responses; the server keeps running.
pub fn serve<A: AnalyticsSource>(addr: &str, state: &WebState<A>, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("taxidash dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for request in server.incoming_requests() {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let reply = dispatch(state, &method, &url);
        let status = reply.status;
        match reply.into_response() {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                eprintln!("failed to build response for {url}: {e}");
            }
        }

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route a request to its handler.
pub fn dispatch<A: AnalyticsSource>(state: &WebState<A>, method: &str, url: &str) -> Reply {
    let path = url.split('?').next().unwrap_or(url);

    let result = match (method, path) {
        ("GET", "/") | ("GET", "/index.html") => api::get_index(state, url),
        ("GET", "/api/dashboard") => api::get_dashboard(state, url),
        ("GET", "/api/trips") => api::get_trips(state, url),
        _ => return Reply::not_found(),
    };

    result.unwrap_or_else(|e| Reply::internal_error(&e))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_is_json() {
        let reply = Reply::internal_error(&anyhow::anyhow!("boom"));
        assert_eq!(reply.status, 500);
        assert_eq!(reply.content_type, JSON);
        let value: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(value["error"], "boom");
    }

    #[test]
    fn not_found_body() {
        let reply = Reply::not_found();
        assert_eq!(reply.status, 404);
        let value: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(value["error"], "not found");
    }
}
