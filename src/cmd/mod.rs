//! CLI command handlers

use clap::Subcommand;

pub mod collect;
pub mod diagnostics;
pub mod root;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the log collector enrichment pipeline (the Log Collector's own
    /// process, normally the entrypoint of its own container image).
    Collect,
    /// Run diagnostics and display system information
    Diagnostics,
}
