/// Configuration schema and defaults for taxidash.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[display]`, `[diagnostics]`, and `[web]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::api::types::DEFAULT_PAGE_SIZE;

/// Default analytics API root.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Default listen address for `taxidash web`.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:8050";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level taxidash configuration.
///
/// Maps directly to `~/.taxidash/config.toml` and `.taxidash.toml`. All
/// sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxidashConfig {
    pub backend: BackendConfig,
    pub display: DisplayConfig,
    pub diagnostics: DiagnosticsConfig,
    pub web: WebConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where and how to reach the analytics API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API root; endpoint paths are appended to it.
    pub base_url: String,
    /// `limit` sent with every trip query.
    pub page_size: u32,
    /// Per-request timeout in milliseconds. `0` waits indefinitely.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

/// Which dashboard regions exist. A missing region skips its fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub summary: bool,
    pub trips: bool,
    pub hourly_chart: bool,
    pub passenger_chart: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            summary: true,
            trips: true,
            hourly_chart: true,
            passenger_chart: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [diagnostics]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Append flow failures to the JSONL diagnostics log.
    pub enabled: bool,
    /// Override for `~/.taxidash/diagnostics.jsonl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub addr: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl TaxidashConfig {
    /// The annotated config file written by `taxidash config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# taxidash configuration
#
# Precedence (lowest to highest): built-in defaults, this file,
# .taxidash.toml in the working directory, TAXIDASH_* environment variables.

[backend]
# Analytics API root (env: TAXIDASH_BACKEND_URL)
base_url = "{DEFAULT_BASE_URL}"
# Trips requested per page (env: TAXIDASH_PAGE_SIZE)
page_size = {DEFAULT_PAGE_SIZE}
# Request timeout in milliseconds, 0 = none (env: TAXIDASH_TIMEOUT_MS)
timeout_ms = 0

[display]
# Regions to render. A disabled region is never fetched.
summary = true
trips = true
hourly_chart = true
passenger_chart = true

[diagnostics]
# Log flow failures to ~/.taxidash/diagnostics.jsonl (env: TAXIDASH_DIAGNOSTICS)
enabled = true
# path = "/var/log/taxidash/diagnostics.jsonl"

[web]
# Listen address for `taxidash web` (env: TAXIDASH_WEB_ADDR)
addr = "{DEFAULT_WEB_ADDR}"
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
