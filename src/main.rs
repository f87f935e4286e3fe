use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use taxidash::cli::{self, OutputFormat, SpeedFilter};

#[derive(Debug, Parser)]
#[command(name = "taxidash")]
#[command(about = "NYC taxi trip analytics dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

/// Trip speed filters, in km/h.
#[derive(Debug, Args)]
struct SpeedArgs {
    /// Only show trips at or above this speed
    #[arg(long)]
    min_speed: Option<f64>,
    /// Only show trips at or below this speed (0 = no limit)
    #[arg(long)]
    max_speed: Option<f64>,
}

impl From<SpeedArgs> for SpeedFilter {
    fn from(args: SpeedArgs) -> Self {
        Self {
            min_speed: args.min_speed,
            max_speed: args.max_speed,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load every dashboard region and print it
    Dashboard {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        #[command(flatten)]
        speed: SpeedArgs,
    },
    /// Show one page of trip records
    Trips {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Trips to request (defaults to backend.page_size)
        #[arg(long)]
        limit: Option<u32>,
        #[command(flatten)]
        speed: SpeedArgs,
    },
    /// Write the dashboard as a self-contained HTML file
    Report {
        /// Output file (default: taxidash-report.html)
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        speed: SpeedArgs,
    },
    /// Serve the HTML dashboard over HTTP
    Web {
        /// Listen address (defaults to web.addr)
        #[arg(long)]
        addr: Option<String>,
        /// Don't open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Check config, backend reachability, and the diagnostics log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default ~/.taxidash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `backend.base_url`
    Set { key: String, value: String },
    /// Restore the default configuration file
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Dashboard { format, speed } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_dashboard(fmt, speed.into())
        }
        Commands::Trips {
            format,
            limit,
            speed,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_trips(fmt, speed.into(), limit)
        }
        Commands::Report { output, speed } => cli::run_report(output, speed.into()),
        Commands::Web { addr, no_open } => cli::run_web(addr, !no_open),
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
