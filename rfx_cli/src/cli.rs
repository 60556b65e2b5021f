//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "rfx", version, about = "RFXtrx accessory bridge")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/rfx_bridge.toml")]
    pub config: PathBuf,

    /// Print results and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the config and list the accessories it defines
    Check,
    /// Show the command and run time for moving a cover
    Plan {
        /// Cover name (or device id)
        #[arg(long)]
        device: String,
        /// Starting position, 0 (closed) to 100 (open)
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        /// Target position, 0 (closed) to 100 (open)
        #[arg(long)]
        to: f64,
    },
    /// Drive a cover through target positions in virtual time
    Simulate {
        /// Cover name (or device id)
        #[arg(long)]
        device: String,
        /// Comma-separated target positions, applied in order
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        targets: Vec<f64>,
        /// Virtual time between targets; without it every move runs to completion
        #[arg(long, value_name = "MS")]
        step_ms: Option<u64>,
    },
    /// Run the bridge, reading commands from stdin
    Run,
}
