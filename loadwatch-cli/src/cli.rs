//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "loadwatch",
    about = "Operator console for a rate-limited URL shortener",
    version
)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Follow the live metrics feed, printing one line per update
    Metrics,

    /// Run a stress test against the service, streaming its output.
    /// Ctrl-C stops the test.
    Stress {
        /// API key sent in the configured auth header
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print the effective configuration after file and env resolution
    Config,
}
