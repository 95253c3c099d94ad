//! Full pipeline command

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use margin_core::{run_analysis, RankingConfig, RunStatus};

use super::{load_inputs, read_initiatives};
use crate::cli::DataArgs;

pub fn cmd_run(
    initiatives: &Path,
    data: &DataArgs,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let initiatives = read_initiatives(initiatives)?;
    let inputs = load_inputs(data)?;
    let config = RankingConfig::load(config).context("Failed to load ranking config")?;

    let run = run_analysis(&inputs.financials, &inputs.facts, initiatives, &config)
        .context("Analysis failed")?;
    let json = serde_json::to_string_pretty(&run).context("Failed to serialize analysis run")?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };

    let mut file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    file.write_all(json.as_bytes())?;

    println!("✅ Analysis {} written to: {}", run.run_id, output.display());
    println!("   Status: {}", run.status);
    println!("   Months: {}", run.pnl.len());
    println!("   Initiatives: {}", run.initiatives.len());
    if let Some(top) = run.initiatives.first() {
        println!("   Top initiative: {} (score {:.2})", top.title(), top.weighted_score);
    }
    if run.status == RunStatus::NoData {
        println!();
        println!("   ⚠️  No GL months were loaded; every initiative needs data.");
    }
    Ok(())
}
