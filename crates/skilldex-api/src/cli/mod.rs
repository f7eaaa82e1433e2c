//! CLI command definitions and dispatch for the `skdx` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Who knows what, in your workspace.
#[derive(Parser)]
#[command(name = "skdx", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Bridge tracing spans to OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Slack webhook server.
    Serve {
        /// Port to listen on (overrides config.toml).
        #[arg(long)]
        port: Option<u16>,

        /// Host address to bind (overrides config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Show directory counts and configuration.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
