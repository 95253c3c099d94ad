//! Fixed vs variable cost split per opex category
//!
//! Each category starts from a base split. With at least three months of
//! history, the absolute revenue correlation nudges the variable share.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stats::pearson;
use crate::models::OpexCategory;
use crate::pnl::{round_to, CanonicalPnLRecord};

/// Months of history needed before correlations are computed
pub const MIN_MONTHS_FOR_CORRELATION: usize = 3;

/// Confidence reported whenever the split is a heuristic default
pub const HEURISTIC_CONFIDENCE: f64 = 0.3;

const MAX_VARIABLE_PCT: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 0.7;

/// Estimated fixed/variable shares of one opex category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSplit {
    pub fixed_pct: f64,
    pub variable_pct: f64,
    pub confidence: f64,
}

impl CostSplit {
    /// The category's base split, reported with heuristic confidence
    pub fn heuristic(category: OpexCategory) -> Self {
        let (fixed_pct, variable_pct) = base_split(category);
        Self {
            fixed_pct,
            variable_pct,
            confidence: HEURISTIC_CONFIDENCE,
        }
    }
}

/// (fixed, variable) base shares by category
pub fn base_split(category: OpexCategory) -> (f64, f64) {
    match category {
        OpexCategory::SalesMarketing => (0.6, 0.4),
        OpexCategory::Rnd => (0.8, 0.2),
        OpexCategory::Gna => (0.9, 0.1),
        OpexCategory::Other => (0.7, 0.3),
    }
}

/// Estimate the split for every opex category
pub fn estimate_fixed_variable(
    records: &[CanonicalPnLRecord],
) -> BTreeMap<OpexCategory, CostSplit> {
    OpexCategory::all()
        .iter()
        .map(|&category| (category, estimate_category(records, category)))
        .collect()
}

fn estimate_category(records: &[CanonicalPnLRecord], category: OpexCategory) -> CostSplit {
    if records.len() < MIN_MONTHS_FOR_CORRELATION {
        return CostSplit::heuristic(category);
    }

    let revenue: Vec<f64> = records.iter().map(|r| r.revenue).collect();
    let costs: Vec<f64> = records.iter().map(|r| r.opex(category)).collect();

    let Some(correlation) = pearson(&revenue, &costs) else {
        return CostSplit::heuristic(category);
    };

    let strength = correlation.abs();
    let (_, base_variable) = base_split(category);
    let variable_pct = round_to(
        (base_variable + (strength - 0.3) * 0.2).min(MAX_VARIABLE_PCT),
        2,
    );
    let confidence = (strength * 0.8).clamp(HEURISTIC_CONFIDENCE, MAX_CONFIDENCE);

    CostSplit {
        fixed_pct: round_to(1.0 - variable_pct, 2),
        variable_pct,
        confidence: round_to(confidence, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthlyFinancials;
    use crate::pnl::reconstruct_pnl;

    fn series(revenue: &[f64], sales_marketing: &[f64]) -> Vec<CanonicalPnLRecord> {
        let rnd = vec![100.0; revenue.len()];
        series_with_rnd(revenue, sales_marketing, &rnd)
    }

    fn series_with_rnd(
        revenue: &[f64],
        sales_marketing: &[f64],
        rnd: &[f64],
    ) -> Vec<CanonicalPnLRecord> {
        let rows: Vec<MonthlyFinancials> = revenue
            .iter()
            .zip(sales_marketing)
            .zip(rnd)
            .enumerate()
            .map(|(i, ((&rev, &sm), &rd))| MonthlyFinancials {
                month: format!("2024-{:02}", i + 1),
                revenue: rev,
                cogs: 0.0,
                opex_sales_marketing: sm,
                opex_rnd: rd,
                opex_gna: 50.0,
                opex_other: 25.0,
            })
            .collect();
        reconstruct_pnl(&rows)
    }

    #[test]
    fn test_short_history_uses_defaults() {
        let records = series(&[100.0, 200.0], &[10.0, 20.0]);
        let splits = estimate_fixed_variable(&records);

        assert_eq!(splits.len(), 4);
        assert_eq!(
            splits[&OpexCategory::SalesMarketing],
            CostSplit {
                fixed_pct: 0.6,
                variable_pct: 0.4,
                confidence: 0.3
            }
        );
        assert_eq!(splits[&OpexCategory::Rnd].fixed_pct, 0.8);
        assert_eq!(splits[&OpexCategory::Gna].variable_pct, 0.1);
        assert_eq!(splits[&OpexCategory::Other].fixed_pct, 0.7);
        assert!(splits.values().all(|s| s.confidence == 0.3));
    }

    #[test]
    fn test_perfect_correlation_caps_variable_share() {
        let records = series(&[100.0, 200.0, 300.0, 400.0], &[10.0, 20.0, 30.0, 40.0]);
        let split = estimate_fixed_variable(&records)[&OpexCategory::SalesMarketing];

        // 0.4 + (1.0 - 0.3) * 0.2 = 0.54, capped at 0.5
        assert_eq!(split.variable_pct, 0.5);
        assert_eq!(split.fixed_pct, 0.5);
        // 1.0 * 0.8 = 0.8, capped at 0.7
        assert_eq!(split.confidence, 0.7);
    }

    #[test]
    fn test_correlation_nudges_variable_share_below_cap() {
        let revenue = [100.0, 200.0, 300.0, 400.0];
        let records = series_with_rnd(&revenue, &[10.0; 4], &[50.0, 60.0, 70.0, 80.0]);
        let split = estimate_fixed_variable(&records)[&OpexCategory::Rnd];

        // 0.2 + (1.0 - 0.3) * 0.2
        assert_eq!(split.variable_pct, 0.34);
        assert_eq!(split.fixed_pct, 0.66);
        assert_eq!(split.confidence, 0.7);
    }

    #[test]
    fn test_moderate_correlation_scales_confidence() {
        // correlation of exactly 0.8
        let revenue = [100.0, 200.0, 300.0, 400.0];
        let records = series_with_rnd(&revenue, &[10.0; 4], &[100.0, 300.0, 200.0, 400.0]);
        let split = estimate_fixed_variable(&records)[&OpexCategory::Rnd];

        // 0.2 + (0.8 - 0.3) * 0.2
        assert_eq!(split.variable_pct, 0.3);
        assert_eq!(split.fixed_pct, 0.7);
        // 0.8 * 0.8, inside both clamps
        assert_eq!(split.confidence, 0.64);
    }

    #[test]
    fn test_flat_costs_fall_back_to_heuristic() {
        let records = series(&[100.0, 200.0, 300.0], &[10.0, 20.0, 30.0]);
        let splits = estimate_fixed_variable(&records);
        // R&D, G&A and other never move in the fixture
        assert_eq!(splits[&OpexCategory::Rnd], CostSplit::heuristic(OpexCategory::Rnd));
        assert_eq!(splits[&OpexCategory::Gna], CostSplit::heuristic(OpexCategory::Gna));
    }

    #[test]
    fn test_weak_correlation_floors_confidence() {
        // Cost barely tracks revenue
        let records = series(&[100.0, 300.0, 200.0, 400.0], &[20.0, 20.0, 21.0, 20.0]);
        let split = estimate_fixed_variable(&records)[&OpexCategory::SalesMarketing];
        assert!(split.confidence >= 0.3);
        assert!(split.variable_pct <= 0.5);
        assert!((split.fixed_pct + split.variable_pct - 1.0).abs() < 1e-9);
    }
}
