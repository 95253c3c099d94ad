//! Initiative command implementations (size, rank)

use std::path::Path;

use anyhow::{Context, Result};
use margin_core::{
    diagnose, rank_initiatives, reconstruct, size_initiatives, summary::format_currency,
    RankedInitiative, RankingConfig, SizedInitiative,
};

use super::{load_inputs, read_initiatives, read_sized_initiatives, truncate};
use crate::cli::DataArgs;

pub fn cmd_size(initiatives: &Path, data: &DataArgs, json: bool) -> Result<()> {
    let initiatives = read_initiatives(initiatives)?;
    let inputs = load_inputs(data)?;

    let (pnl, _) = reconstruct(&inputs.financials);
    let report = diagnose(&pnl, &inputs.facts);
    let sized = size_initiatives(initiatives, &report, &pnl, &inputs.facts);

    if json {
        let out = serde_json::to_string_pretty(&sized)
            .context("Failed to serialize sized initiatives")?;
        println!("{}", out);
        return Ok(());
    }

    print_sized(&sized);
    Ok(())
}

pub fn cmd_rank(initiatives: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let sized = read_sized_initiatives(initiatives)?;
    let config = RankingConfig::load(config).context("Failed to load ranking config")?;
    let ranked = rank_initiatives(sized, &config);

    if json {
        let out = serde_json::to_string_pretty(&ranked)
            .context("Failed to serialize ranked initiatives")?;
        println!("{}", out);
        return Ok(());
    }

    print_ranked(&ranked);
    Ok(())
}

fn print_sized(sized: &[SizedInitiative]) {
    if sized.is_empty() {
        println!("No initiatives to size.");
        return;
    }

    println!();
    println!("📏 Sized Initiatives");
    println!("   ─────────────────────────────────────────────────────────────────────────");

    for item in sized {
        let sizing = &item.sizing;
        let icon = if sizing.needs_data { "❓" } else { "💡" };
        println!(
            "   {} {:32} │ {:>10} – {:<10} │ {:>3} wks │ {:4} │ conf {:.2}",
            icon,
            truncate(&item.initiative.title, 32),
            format_currency(sizing.impact_low),
            format_currency(sizing.impact_high),
            sizing.time_to_value_weeks,
            sizing.risk_level.as_str(),
            sizing.confidence
        );
        for assumption in &sizing.assumptions {
            println!("        · {}", assumption);
        }
    }
    println!();
}

fn print_ranked(ranked: &[RankedInitiative]) {
    if ranked.is_empty() {
        println!("No initiatives to rank.");
        return;
    }

    println!();
    println!("🏆 Ranked Initiatives");
    println!("   ─────────────────────────────────────────────────────────────────────────");

    for item in ranked {
        let sizing = &item.sized.sizing;
        println!(
            "   #{:<3} {:32} │ score {:>12.2} │ mid {:>10} │ {:4} │ {:>3} wks",
            item.rank,
            truncate(item.title(), 32),
            item.weighted_score,
            format_currency(sizing.impact_mid()),
            sizing.risk_level.as_str(),
            sizing.time_to_value_weeks
        );
    }
    println!();
}
