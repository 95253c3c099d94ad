//! Ranking configuration command

use std::path::Path;

use anyhow::{Context, Result};
use margin_core::config::{default_config_path, resolved_config_path, RankingConfig};

pub fn cmd_config(path_only: bool, config: Option<&Path>) -> Result<()> {
    if path_only {
        match default_config_path() {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("Could not determine config directory."),
        }
        return Ok(());
    }

    let ranking = RankingConfig::load(config).context("Failed to load ranking config")?;
    let source = resolved_config_path(config)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());

    println!();
    println!("⚙️  Ranking Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source: {}", source);
    println!();
    println!("   Risk multiplier (Low):   {:.2}", ranking.risk_multiplier_low);
    println!("   Risk multiplier (Med):   {:.2}", ranking.risk_multiplier_med);
    println!("   Risk multiplier (High):  {:.2}", ranking.risk_multiplier_high);
    println!("   Time multiplier base:    {:.2}", ranking.time_multiplier_base);
    println!("   Time multiplier / week:  {:.3}", ranking.time_multiplier_per_week);
    println!();
    println!("   score = impact_mid × confidence / (risk × (base + weeks × per_week))");

    if config.is_none() {
        if let Some(path) = default_config_path() {
            if !path.exists() {
                println!();
                println!("   To override, create: {}", path.display());
            }
        }
    }
    println!();
    Ok(())
}
