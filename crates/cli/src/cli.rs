//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Analytics Dispatch - bootstrap analytics backends and dispatch events to them
#[derive(Parser, Debug)]
#[command(
    name = "analytics-dispatch",
    author,
    version,
    about = "Analytics integration dispatcher",
    long_about = "Fetches project settings, activates the analytics backends that are both \n\
                  linked into this binary and enabled for the project, and dispatches \n\
                  tracking events to them. Events submitted before activation are buffered \n\
                  and replayed in order."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "ANALYTICS_DISPATCH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "ANALYTICS_DISPATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (disabled when omitted)
    #[arg(long, global = true, env = "ANALYTICS_DISPATCH_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the dispatcher and submit events from a file
    Run(RunArgs),

    /// Validate the collector config and the project settings document
    Validate(ValidateArgs),

    /// List the backends linked into this binary
    Probe(ProbeArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "collector.toml",
        env = "ANALYTICS_DISPATCH_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the settings document path from configuration
    #[arg(long, env = "ANALYTICS_DISPATCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// JSON Lines file of events to submit
    #[arg(short, long)]
    pub events: Option<PathBuf>,

    /// Forward the full lifecycle sequence for this component once live
    #[arg(long, value_name = "COMPONENT")]
    pub lifecycle: Option<String>,

    /// Seconds to wait for activation before shutting down (0 = no limit)
    #[arg(long, default_value = "30", env = "ANALYTICS_DISPATCH_WAIT_LIVE")]
    pub wait_live: u64,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "collector.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `probe` command
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
