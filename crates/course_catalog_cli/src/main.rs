//! Command-line transport for the course catalog.
//!
//! Loads `.env`, resolves configuration, runs one request through the core
//! dispatcher and prints the `{status, body}` response as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

mod cli;

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    let response = cli::run(cli).context("course catalog command failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
