//! e3-dag
//!
//! Command-line interface for e3 DAG description files.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use e3_cli::{Cli, Config, commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Logs go to stderr so command output can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter(cli.verbose).into()),
        )
        .init();

    tracing::debug!(command = ?cli.command, "running");
    let output = commands::run(&cli, &config)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
