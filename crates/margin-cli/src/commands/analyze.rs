//! Analysis command implementations (pnl, diagnose, summary)

use std::path::Path;

use anyhow::{Context, Result};
use margin_core::{
    diagnose,
    diagnostics::{DiagnosticsReport, TrendMetric},
    reconstruct,
    summary::{diagnostics_summary, format_currency, pnl_summary},
};

use super::{load_gl_file, load_inputs};
use crate::cli::DataArgs;

pub fn cmd_pnl(gl: &Path, json: bool) -> Result<()> {
    let financials = load_gl_file(gl)?;
    let (pnl, bridge) = reconstruct(&financials);

    if json {
        let value = serde_json::json!({
            "pnl": pnl,
            "margin_bridge": bridge,
        });
        let out = serde_json::to_string_pretty(&value).context("Failed to serialize P&L")?;
        println!("{}", out);
        return Ok(());
    }

    if pnl.is_empty() {
        println!("No GL months loaded from {}", gl.display());
        return Ok(());
    }

    println!();
    println!("📈 P&L ({} months)", pnl.len());
    println!("   ─────────────────────────────────────────────────────────────────────────────");
    println!(
        "   {:8} │ {:>12} │ {:>12} │ {:>6} │ {:>12} │ {:>12} │ {:>7}",
        "Month", "Revenue", "Gross Margin", "GM %", "Total OpEx", "EBITDA", "EBITDA %"
    );
    for r in &pnl {
        println!(
            "   {:8} │ {:>12} │ {:>12} │ {:>5.1}% │ {:>12} │ {:>12} │ {:>6.1}%",
            r.month,
            format_currency(r.revenue),
            format_currency(r.gross_margin),
            r.gross_margin_pct,
            format_currency(r.total_opex),
            format_currency(r.ebitda),
            r.ebitda_margin_pct
        );
    }

    if !bridge.is_empty() {
        println!();
        println!("🌉 Margin Bridge");
        println!("   ─────────────────────────────────────────────────────────────────────────────");
        println!(
            "   {:8} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │ {:>12}",
            "Month", "EBITDA Δ", "Revenue", "COGS", "OpEx", "Other"
        );
        for b in &bridge {
            println!(
                "   {:8} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │ {:>12}",
                b.month,
                format_currency(b.ebitda_change),
                format_currency(b.revenue_impact),
                format_currency(b.cogs_impact),
                format_currency(b.opex_impact),
                format_currency(b.other_impact)
            );
        }
    }

    println!();
    Ok(())
}

pub fn cmd_diagnose(data: &DataArgs, json: bool) -> Result<()> {
    let inputs = load_inputs(data)?;
    let (pnl, _) = reconstruct(&inputs.financials);
    let report = diagnose(&pnl, &inputs.facts);

    if json {
        let out =
            serde_json::to_string_pretty(&report).context("Failed to serialize diagnostics")?;
        println!("{}", out);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &DiagnosticsReport) {
    println!();
    println!("🧮 Cost Behavior");
    println!("   ─────────────────────────────────────────────────────────────");
    for (category, split) in &report.fixed_vs_variable {
        println!(
            "   {:16} {:>4.0}% fixed  {:>4.0}% variable  (confidence {:.2})",
            category.as_str(),
            split.fixed_pct * 100.0,
            split.variable_pct * 100.0,
            split.confidence
        );
    }

    let outliers = &report.outliers;
    println!();
    println!("🚨 Outliers");
    println!("   ─────────────────────────────────────────────────────────────");
    if outliers.is_empty() {
        println!("   None detected");
    }
    for spike in &outliers.vendor_spikes {
        println!(
            "   Vendor spend spike   {}  {:>12}  (z = {:.2})",
            spike.month,
            format_currency(spike.amount),
            spike.z_score
        );
    }
    for spike in &outliers.opex_spikes {
        println!(
            "   Opex spike           {}  {:>12}  (z = {:.2})",
            spike.month,
            format_currency(spike.total_opex),
            spike.z_score
        );
    }
    for decline in &outliers.revenue_declines {
        println!(
            "   Revenue decline      {}  {:>12} → {}  (-{:.1}%)",
            decline.month,
            format_currency(decline.prev_revenue),
            format_currency(decline.current_revenue),
            decline.decline_pct
        );
    }

    println!();
    println!("📉 Trends");
    println!("   ─────────────────────────────────────────────────────────────");
    if report.trends.is_empty() {
        println!("   Not enough months for trend analysis");
    }
    for metric in TrendMetric::all() {
        if let Some(trend) = report.trend(*metric) {
            println!(
                "   {:18} {:10}  slope {:>12.2}  R² {:.2}",
                metric.as_str(),
                trend.direction.as_str(),
                trend.slope,
                trend.r_squared
            );
        }
    }

    let completeness = &report.completeness;
    println!();
    println!("🧩 Data Completeness");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Score: {:.2}", completeness.completeness_score);
    println!("   Months: {}", completeness.total_months);
    println!(
        "   Records: GL {} · payroll {} · vendor {} · segments {}",
        completeness.gl_records,
        completeness.payroll_records,
        completeness.vendor_records,
        completeness.revenue_segment_records
    );
    for gap in &completeness.data_gaps {
        println!("   ⚠️  {}", gap);
    }
    println!();
}

pub fn cmd_summary(data: &DataArgs) -> Result<()> {
    let inputs = load_inputs(data)?;
    let (pnl, _) = reconstruct(&inputs.financials);
    let report = diagnose(&pnl, &inputs.facts);

    println!("P&L Summary:");
    println!("{}", pnl_summary(&pnl));
    println!("Diagnostics Summary:");
    println!("{}", diagnostics_summary(&report));
    Ok(())
}
