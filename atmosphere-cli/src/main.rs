//! Binary crate for the `atmosphere` command-line dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and tab navigation
//! - Human-friendly rendering of weather records

use clap::Parser;

mod cli;
mod locate;
mod logging;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging()?;

    let cmd = cli::Cli::parse();
    cmd.run().await
}
