//! Margin CLI - P&L diagnostics and initiative ranking
//!
//! Usage:
//!   margin pnl --gl gl.csv                          Reconstructed P&L
//!   margin diagnose --gl gl.csv --vendor v.csv      Diagnostics report
//!   margin size -i initiatives.json --gl gl.csv     Size initiatives
//!   margin run -i initiatives.json --gl gl.csv      Full pipeline as JSON

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Pnl { gl, json } => commands::cmd_pnl(&gl, json),
        Commands::Diagnose { data, json } => commands::cmd_diagnose(&data, json),
        Commands::Size {
            initiatives,
            data,
            json,
        } => commands::cmd_size(&initiatives, &data, json),
        Commands::Rank {
            initiatives,
            config,
            json,
        } => commands::cmd_rank(&initiatives, config.as_deref(), json),
        Commands::Run {
            initiatives,
            data,
            config,
            output,
        } => commands::cmd_run(&initiatives, &data, config.as_deref(), output.as_deref()),
        Commands::Summary { data } => commands::cmd_summary(&data),
        Commands::Config { path, config } => commands::cmd_config(path, config.as_deref()),
    }
}
