//! Diagnostics Engine - deterministic analysis of the canonical P&L
//!
//! Produces four independent views of the same data:
//!
//! - **Cost behavior** - fixed vs variable split per opex category
//! - **Outliers** - vendor and opex spikes (z-score), sharp revenue declines
//! - **Trends** - least-squares slope and R² for headline metrics
//! - **Completeness** - how much of the expected data is actually present
//!
//! Thin or missing data never fails a run; each view falls back to defaults
//! or reports nothing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use margin_core::{diagnose, reconstruct, FactSet};
//!
//! let (pnl, _bridge) = reconstruct(&financials);
//! let report = diagnose(&pnl, &FactSet::new());
//! ```

pub mod completeness;
pub mod cost_behavior;
pub mod outliers;
pub mod stats;
pub mod trends;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FactSet, OpexCategory};
use crate::pnl::CanonicalPnLRecord;

pub use completeness::{assess_completeness, CompletenessReport};
pub use cost_behavior::{estimate_fixed_variable, CostSplit};
pub use outliers::{detect_outliers, OpexSpike, OutlierReport, RevenueDecline, VendorSpike};
pub use trends::{calculate_trends, Trend, TrendDirection, TrendMetric};

/// Everything the diagnostics engine knows about one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub fixed_vs_variable: BTreeMap<OpexCategory, CostSplit>,
    pub outliers: OutlierReport,
    pub trends: BTreeMap<TrendMetric, Trend>,
    pub completeness: CompletenessReport,
}

impl DiagnosticsReport {
    pub fn cost_split(&self, category: OpexCategory) -> Option<&CostSplit> {
        self.fixed_vs_variable.get(&category)
    }

    pub fn trend(&self, metric: TrendMetric) -> Option<&Trend> {
        self.trends.get(&metric)
    }
}

/// Run every diagnostic over the canonical P&L and the optional facts
pub fn diagnose(records: &[CanonicalPnLRecord], facts: &FactSet) -> DiagnosticsReport {
    let report = DiagnosticsReport {
        fixed_vs_variable: estimate_fixed_variable(records),
        outliers: detect_outliers(records, facts.vendor_spend()),
        trends: calculate_trends(records),
        completeness: assess_completeness(records, facts),
    };

    debug!(
        months = records.len(),
        vendor_spikes = report.outliers.vendor_spikes.len(),
        opex_spikes = report.outliers.opex_spikes.len(),
        revenue_declines = report.outliers.revenue_declines.len(),
        trends = report.trends.len(),
        completeness = report.completeness.completeness_score,
        "Diagnostics complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthlyFinancials, VendorSpendFact};
    use crate::pnl::reconstruct_pnl;

    fn sample_series() -> Vec<CanonicalPnLRecord> {
        let rows: Vec<MonthlyFinancials> = (1..=6)
            .map(|m| MonthlyFinancials {
                month: format!("2024-{:02}", m),
                revenue: 10_000.0 + m as f64 * 500.0,
                cogs: 4_000.0 + m as f64 * 150.0,
                opex_sales_marketing: 1_500.0 + m as f64 * 120.0,
                opex_rnd: 2_000.0 + (m % 2) as f64 * 50.0,
                opex_gna: 800.0,
                opex_other: 600.0 + (m % 3) as f64 * 40.0,
            })
            .collect();
        reconstruct_pnl(&rows)
    }

    #[test]
    fn test_short_history_returns_heuristics() {
        let records = sample_series();
        let report = diagnose(&records[..2], &FactSet::new());

        for &category in OpexCategory::all() {
            let split = report.cost_split(category).unwrap();
            assert_eq!(*split, CostSplit::heuristic(category));
            assert_eq!(split.confidence, 0.3);
        }
        assert!(report.trends.is_empty());
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn test_full_report_shape() {
        let report = diagnose(&sample_series(), &FactSet::new());
        assert_eq!(report.fixed_vs_variable.len(), 4);
        assert_eq!(report.trends.len(), 4);
        assert_eq!(
            report.trend(TrendMetric::Revenue).unwrap().direction,
            TrendDirection::Increasing
        );
        assert_eq!(report.completeness.total_months, 6);
    }

    #[test]
    fn test_diagnose_is_idempotent() {
        let records = sample_series();
        let facts = FactSet::new().with_vendor_spend(
            (1..=6)
                .map(|m| VendorSpendFact {
                    month: format!("2024-{:02}", m),
                    vendor: format!("Vendor {}", m % 3),
                    category: "Software".into(),
                    amount: 100.0 * m as f64,
                })
                .collect(),
        );

        let first = serde_json::to_string(&diagnose(&records, &facts)).unwrap();
        let second = serde_json::to_string(&diagnose(&records, &facts)).unwrap();
        assert_eq!(first, second);
    }
}
