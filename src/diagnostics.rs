//! Flow diagnostics log: one JSON line per failed or discarded flow.
//!
//! Every fetch failure, empty-data fallback, and stale response is appended
//! to `~/.taxidash/diagnostics.jsonl` so an operator can see what went wrong
//! after the dashboard has already shown its fallback text.
//!
//! Logging is best-effort: write failures are ignored.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::DiagnosticsConfig;

/// A single diagnostics entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEvent {
    pub timestamp: String,
    /// Flow name: `summary`, `trips`, `hourly`, `passengers`.
    pub flow: String,
    /// `transport`, `status`, `malformed`, `no-data`, or `stale`.
    pub kind: String,
    pub message: String,
}

/// Append-only JSONL sink. `None` path means logging is off.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    path: Option<PathBuf>,
}

impl DiagnosticLog {
    /// A log that drops every event.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// A log writing to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: config.path.clone().or_else(default_log_path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record an event for `flow`.
    pub fn record(&self, flow: &str, kind: &str, message: &str) {
        let event = FlowEvent {
            timestamp: Utc::now().to_rfc3339(),
            flow: flow.to_string(),
            kind: kind.to_string(),
            message: message.to_string(),
        };
        let _ = self.append(&event);
    }

    /// Read every entry, skipping malformed lines.
    pub fn read_all(&self) -> Vec<FlowEvent> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<FlowEvent>(&line).ok())
            .collect()
    }

    fn append(&self, event: &FlowEvent) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

/// `~/.taxidash/diagnostics.jsonl`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".taxidash").join("diagnostics.jsonl"))
}
