//! CLI command implementations for taxidash.
//!
//! Provides subcommand handlers for:
//! - `taxidash dashboard`: all four regions, as text or JSON
//! - `taxidash trips`: the trip table with optional speed filters
//! - `taxidash report`: write the HTML dashboard to a file
//! - `taxidash web`: serve the HTML dashboard
//! - `taxidash health`: config, backend reachability, diagnostics log
//! - `taxidash config show|init|set|reset`: configuration management

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::{BackendClient, FetchError, TripQuery};
use crate::config;
use crate::config::schema::TaxidashConfig;
use crate::dashboard::{DashboardController, FlowReport, FlowStatus};
use crate::render::{MemorySurface, Region, html, terminal};
use crate::web::{self, WebState};

/// Default file written by `taxidash report`.
pub const DEFAULT_REPORT_PATH: &str = "taxidash-report.html";

/// Output format for the data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Speed filters shared by `dashboard`, `trips`, and `report`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedFilter {
    pub min_speed: Option<f64>,
    pub max_speed: Option<f64>,
}

impl SpeedFilter {
    fn query(self, controller: &DashboardController<BackendClient>) -> TripQuery {
        controller.trip_query(self.min_speed, self.max_speed)
    }
}

// ---------------------------------------------------------------------------
// taxidash dashboard
// ---------------------------------------------------------------------------

/// Run all four flows and print the result.
pub fn run_dashboard(format: OutputFormat, filter: SpeedFilter) -> Result<()> {
    let cfg = config::load();
    let controller = DashboardController::from_config(&cfg);
    let query = filter.query(&controller);

    let surface = Mutex::new(MemorySurface::from_display_config(&cfg.display));
    let reports = controller.load_all(&query, &surface);
    let surface = surface.into_inner().unwrap_or_else(|e| e.into_inner());

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "surface": surface,
                "reports": reports,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&value).context("failed to serialize dashboard")?
            );
        }
        OutputFormat::Table => print!("{}", terminal::render_text(&surface)),
    }

    print_failures(&reports);
    Ok(())
}

// ---------------------------------------------------------------------------
// taxidash trips
// ---------------------------------------------------------------------------

/// Fetch one page of trips and print the table.
pub fn run_trips(format: OutputFormat, filter: SpeedFilter, limit: Option<u32>) -> Result<()> {
    let cfg = config::load();
    let controller = DashboardController::from_config(&cfg);
    let mut query = filter.query(&controller);
    if let Some(limit) = limit.filter(|n| *n > 0) {
        query.limit = limit;
    }

    let surface = Mutex::new(MemorySurface::new([Region::TripTable]));
    let report = controller.load_trips(&query, &surface);
    let surface = surface.into_inner().unwrap_or_else(|e| e.into_inner());

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "query": query.query_pairs().into_iter().collect::<std::collections::BTreeMap<_, _>>(),
                "report": report,
                "table": surface.get(Region::TripTable),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&value).context("failed to serialize trips")?
            );
        }
        OutputFormat::Table => print!("{}", terminal::render_text(&surface)),
    }

    print_failures(std::slice::from_ref(&report));
    Ok(())
}

// ---------------------------------------------------------------------------
// taxidash report
// ---------------------------------------------------------------------------

/// Render the HTML dashboard to `output` (default `taxidash-report.html`).
pub fn run_report(output: Option<PathBuf>, filter: SpeedFilter) -> Result<()> {
    let cfg = config::load();
    let controller = DashboardController::from_config(&cfg);
    let query = filter.query(&controller);

    let surface = Mutex::new(MemorySurface::from_display_config(&cfg.display));
    let reports = controller.load_all(&query, &surface);
    let surface = surface.into_inner().unwrap_or_else(|e| e.into_inner());

    let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));
    write_report(&path, &html::render_page(&surface, &query))?;

    println!(
        "{} Dashboard written to {}",
        "✓".green().bold(),
        path.display()
    );
    print_failures(&reports);
    Ok(())
}

fn write_report(path: &Path, page: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, page).with_context(|| format!("failed to write {}", path.display()))
}

// ---------------------------------------------------------------------------
// taxidash web
// ---------------------------------------------------------------------------

/// Serve the dashboard until interrupted.
pub fn run_web(addr: Option<String>, open: bool) -> Result<()> {
    let cfg = config::load();
    let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
    let state = WebState {
        controller: DashboardController::from_config(&cfg),
        display: cfg.display.clone(),
    };
    web::serve(&addr, &state, open)
}

// ---------------------------------------------------------------------------
// taxidash health
// ---------------------------------------------------------------------------

/// Check config files, backend reachability, and the diagnostics log.
pub fn run_health() -> Result<()> {
    println!("{}", "taxidash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.taxidash/config.toml found"
        } else {
            "not found (run `taxidash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".taxidash.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = BackendClient::from_config(&cfg.backend);
    match client.api_info() {
        Ok(info) => {
            print_health_item(
                "Backend",
                true,
                &format!("reachable at {}", client.base_url()),
            );
            if !info.message.is_empty() {
                print_health_item("Backend message", true, &info.message);
            }
            print_health_item(
                "Endpoints",
                true,
                &format!("{} advertised", info.endpoints.len()),
            );
        }
        Err(e @ FetchError::Transport { .. }) => print_health_item(
            "Backend",
            false,
            &format!("not reachable ({e}). Is the backend running?"),
        ),
        Err(e) => print_health_item("Backend", false, &format!("reachable, but {e}")),
    }

    print_health_item("Regions", true, &describe_regions(&cfg));

    let diagnostics = crate::diagnostics::DiagnosticLog::from_config(&cfg.diagnostics);
    match diagnostics.path() {
        Some(path) if path.exists() => print_health_item(
            "Diagnostics log",
            true,
            &format!("{} entries", diagnostics.read_all().len()),
        ),
        Some(_) => print_health_item("Diagnostics log", true, "no log file yet"),
        None => print_health_item("Diagnostics log", false, "disabled"),
    }

    Ok(())
}

fn describe_regions(cfg: &TaxidashConfig) -> String {
    let enabled = Region::enabled_in(&cfg.display);
    if enabled.is_empty() {
        return "none enabled".to_string();
    }
    enabled
        .iter()
        .map(|r| format!("{r:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// taxidash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective taxidash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.taxidash/config.toml", global_exists);
    print_source(".taxidash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "TAXIDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.taxidash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point at your backend.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Echo failed flows to stderr. The regions already show them; this makes
/// them visible when stdout is piped.
fn print_failures(reports: &[FlowReport]) {
    for line in failure_lines(reports) {
        eprintln!("{}", line.yellow());
    }
}

fn failure_lines(reports: &[FlowReport]) -> Vec<String> {
    reports
        .iter()
        .filter_map(|r| match &r.status {
            FlowStatus::Failed(detail) => Some(format!("warning: {} flow failed: {detail}", r.flow)),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
