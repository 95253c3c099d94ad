//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Margin - Diagnose margins and rank improvement initiatives
#[derive(Parser)]
#[command(name = "margin")]
#[command(about = "Deterministic P&L diagnostics and initiative ranking", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input CSV files shared by the analysis commands
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Monthly GL P&L CSV (month, revenue, cogs, opex_*)
    #[arg(long)]
    pub gl: PathBuf,

    /// Payroll summary CSV (month, function, headcount, fully_loaded_cost)
    #[arg(long)]
    pub payroll: Option<PathBuf>,

    /// Vendor spend CSV (month, vendor, category, amount)
    #[arg(long)]
    pub vendor: Option<PathBuf>,

    /// Revenue by segment CSV (month, segment, revenue)
    #[arg(long)]
    pub segments: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the reconstructed P&L and margin bridge
    Pnl {
        /// Monthly GL P&L CSV
        #[arg(long)]
        gl: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run diagnostics (cost behavior, outliers, trends, completeness)
    Diagnose {
        #[command(flatten)]
        data: DataArgs,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Size initiatives from a JSON file against the data
    Size {
        /// JSON array of initiatives (title, category, owner, description)
        #[arg(short, long)]
        initiatives: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rank already-sized initiatives
    Rank {
        /// JSON array of sized initiatives (output of `margin size --json`)
        #[arg(short, long)]
        initiatives: PathBuf,

        /// Ranking config file (defaults to data dir override, then built-in)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline and emit the analysis as JSON
    Run {
        /// JSON array of initiatives
        #[arg(short, long)]
        initiatives: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Ranking config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the text summaries handed to the initiative generator
    Summary {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Show the effective ranking configuration
    Config {
        /// Only print the override file path
        #[arg(long)]
        path: bool,

        /// Ranking config file to read instead of the default locations
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
