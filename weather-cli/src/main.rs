//! Binary crate for the `weather-notifier` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive roster configuration
//! - Wiring the notifier to console output

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.init_tracing();
    cmd.run()
}
