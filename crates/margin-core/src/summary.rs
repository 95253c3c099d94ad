//! Plain-text context for the initiative generator
//!
//! The generator lives outside this crate; it receives these summaries as
//! prompt context and returns unsized initiatives.

use std::fmt::Write;

use crate::diagnostics::{DiagnosticsReport, TrendMetric};
use crate::pnl::CanonicalPnLRecord;

/// Fixed/variable split, outlier counts and headline trend directions
pub fn diagnostics_summary(report: &DiagnosticsReport) -> String {
    let mut lines = Vec::new();

    if !report.fixed_vs_variable.is_empty() {
        lines.push("Fixed vs Variable Cost Analysis:".to_string());
        for (category, split) in &report.fixed_vs_variable {
            lines.push(format!(
                "  - {}: {:.0}% fixed, {:.0}% variable",
                category,
                split.fixed_pct * 100.0,
                split.variable_pct * 100.0
            ));
        }
    }

    let outliers = &report.outliers;
    if !outliers.vendor_spikes.is_empty() {
        lines.push(format!(
            "Vendor spend spikes detected: {} months",
            outliers.vendor_spikes.len()
        ));
    }
    if !outliers.opex_spikes.is_empty() {
        lines.push(format!(
            "Operating expense spikes detected: {} months",
            outliers.opex_spikes.len()
        ));
    }
    if !outliers.revenue_declines.is_empty() {
        lines.push(format!(
            "Revenue declines detected: {} months",
            outliers.revenue_declines.len()
        ));
    }

    if let Some(trend) = report.trend(TrendMetric::Revenue) {
        lines.push(format!("Revenue trend: {}", trend.direction.as_str()));
    }
    if let Some(trend) = report.trend(TrendMetric::Ebitda) {
        lines.push(format!("EBITDA trend: {}", trend.direction.as_str()));
    }

    lines.join("\n")
}

/// Latest month figures, plus growth versus the first month
pub fn pnl_summary(records: &[CanonicalPnLRecord]) -> String {
    let (Some(first), Some(latest)) = (records.first(), records.last()) else {
        return "No P&L data available.".to_string();
    };

    let mut out = String::new();
    // writing to a String cannot fail
    let _ = writeln!(out, "Latest period ({}):", latest.month);
    let _ = writeln!(out, "  Revenue: {}", format_currency(latest.revenue));
    let _ = writeln!(out, "  COGS: {}", format_currency(latest.cogs));
    let _ = writeln!(
        out,
        "  Gross Margin: {} ({:.1}%)",
        format_currency(latest.gross_margin),
        latest.gross_margin_pct
    );
    let _ = writeln!(out, "  Total OpEx: {}", format_currency(latest.total_opex));
    let _ = writeln!(
        out,
        "  EBITDA: {} ({:.1}%)",
        format_currency(latest.ebitda),
        latest.ebitda_margin_pct
    );

    if records.len() > 1 {
        let revenue_growth = if first.revenue > 0.0 {
            (latest.revenue - first.revenue) / first.revenue * 100.0
        } else {
            0.0
        };
        let ebitda_change = if first.ebitda != 0.0 {
            (latest.ebitda - first.ebitda) / first.ebitda.abs() * 100.0
        } else {
            0.0
        };

        let _ = writeln!(out, "\nTrend over {} months:", records.len());
        let _ = writeln!(out, "  Revenue growth: {:.1}%", revenue_growth);
        let _ = writeln!(out, "  EBITDA change: {:.1}%", ebitda_change);
    }

    out
}

/// Whole dollars with thousands separators, e.g. `$1,234,567`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("$-{}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::diagnose;
    use crate::models::{FactSet, MonthlyFinancials};
    use crate::pnl::reconstruct_pnl;

    fn records(revenues: &[f64]) -> Vec<CanonicalPnLRecord> {
        let rows: Vec<MonthlyFinancials> = revenues
            .iter()
            .enumerate()
            .map(|(i, &revenue)| MonthlyFinancials {
                month: format!("2024-{:02}", i + 1),
                revenue,
                cogs: revenue * 0.4,
                opex_sales_marketing: 10_000.0,
                opex_rnd: 10_000.0,
                opex_gna: 5_000.0,
                opex_other: 5_000.0,
            })
            .collect();
        reconstruct_pnl(&rows)
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(2_500.5), "$2,500");
        assert_eq!(format_currency(1.5), "$2");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(-45_000.0), "$-45,000");
    }

    #[test]
    fn test_pnl_summary_empty() {
        assert_eq!(pnl_summary(&[]), "No P&L data available.");
    }

    #[test]
    fn test_pnl_summary_single_month() {
        let summary = pnl_summary(&records(&[100_000.0]));
        assert!(summary.starts_with("Latest period (2024-01):\n"));
        assert!(summary.contains("  Revenue: $100,000\n"));
        assert!(summary.contains("  Gross Margin: $60,000 (60.0%)\n"));
        assert!(summary.contains("  EBITDA: $30,000 (30.0%)\n"));
        assert!(!summary.contains("Trend over"));
    }

    #[test]
    fn test_pnl_summary_growth() {
        // EBITDA 30,000 -> 42,000
        let summary = pnl_summary(&records(&[100_000.0, 110_000.0, 120_000.0]));
        assert!(summary.contains("Trend over 3 months:"));
        assert!(summary.contains("  Revenue growth: 20.0%\n"));
        assert!(summary.contains("  EBITDA change: 40.0%\n"));
    }

    #[test]
    fn test_diagnostics_summary() {
        let pnl = records(&[100_000.0, 110_000.0, 120_000.0]);
        let summary = diagnostics_summary(&diagnose(&pnl, &FactSet::new()));

        assert!(summary.starts_with("Fixed vs Variable Cost Analysis:"));
        assert!(summary.contains("  - sales_marketing: 60% fixed, 40% variable"));
        assert!(summary.contains("Revenue trend: increasing"));
        assert!(summary.contains("EBITDA trend: increasing"));
        assert!(!summary.contains("spikes detected"));
    }

    #[test]
    fn test_diagnostics_summary_default_report_is_empty() {
        assert_eq!(diagnostics_summary(&DiagnosticsReport::default()), "");
    }
}
