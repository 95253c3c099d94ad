//! P&L reconstruction and margin bridge
//!
//! Turns raw monthly GL rows into canonical P&L records with derived margin
//! and EBITDA fields, then decomposes month-over-month EBITDA change into
//! revenue, COGS, opex and residual components.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{MonthlyFinancials, OpexCategory};

/// A GL month with derived P&L fields
///
/// Percentages are in percent units (42.5 means 42.5%), rounded to two
/// decimals, and are 0.0 whenever revenue is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPnLRecord {
    pub month: String,
    pub revenue: f64,
    pub cogs: f64,
    pub opex_sales_marketing: f64,
    pub opex_rnd: f64,
    pub opex_gna: f64,
    pub opex_other: f64,
    pub gross_margin: f64,
    pub gross_margin_pct: f64,
    pub total_opex: f64,
    pub ebitda: f64,
    pub ebitda_margin_pct: f64,
}

impl CanonicalPnLRecord {
    /// Derive the canonical record from one GL row
    pub fn from_financials(row: &MonthlyFinancials) -> Self {
        let gross_margin = row.revenue - row.cogs;
        let total_opex = row.total_opex();
        let ebitda = gross_margin - total_opex;

        Self {
            month: row.month.clone(),
            revenue: row.revenue,
            cogs: row.cogs,
            opex_sales_marketing: row.opex_sales_marketing,
            opex_rnd: row.opex_rnd,
            opex_gna: row.opex_gna,
            opex_other: row.opex_other,
            gross_margin,
            gross_margin_pct: percent_of(gross_margin, row.revenue),
            total_opex,
            ebitda,
            ebitda_margin_pct: percent_of(ebitda, row.revenue),
        }
    }

    /// Amount booked to one opex category this month
    pub fn opex(&self, category: OpexCategory) -> f64 {
        match category {
            OpexCategory::SalesMarketing => self.opex_sales_marketing,
            OpexCategory::Rnd => self.opex_rnd,
            OpexCategory::Gna => self.opex_gna,
            OpexCategory::Other => self.opex_other,
        }
    }
}

/// Month-over-month EBITDA decomposition
///
/// `other_impact` is the residual, so the four impacts always sum to
/// `ebitda_change`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginBridgeEntry {
    pub month: String,
    pub prev_month: String,
    pub ebitda_change: f64,
    pub revenue_impact: f64,
    pub cogs_impact: f64,
    pub opex_impact: f64,
    pub other_impact: f64,
}

/// `part / whole * 100` rounded to two decimals, 0.0 when `whole` is 0
fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let pct = part / whole * 100.0;
    if pct.is_finite() {
        round_to(pct, 2)
    } else {
        0.0
    }
}

/// Round to a fixed number of decimal places, halves to even
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Reconstruct the canonical P&L series and its margin bridge
///
/// Rows are ordered by month. When two rows share a month the later one
/// replaces the earlier, matching re-upload semantics.
pub fn reconstruct(
    financials: &[MonthlyFinancials],
) -> (Vec<CanonicalPnLRecord>, Vec<MarginBridgeEntry>) {
    let records = reconstruct_pnl(financials);
    let bridge = margin_bridge(&records);
    (records, bridge)
}

/// Build canonical records ordered ascending by month
pub fn reconstruct_pnl(financials: &[MonthlyFinancials]) -> Vec<CanonicalPnLRecord> {
    let mut by_month: BTreeMap<&str, &MonthlyFinancials> = BTreeMap::new();
    for row in financials {
        if by_month.insert(row.month.as_str(), row).is_some() {
            warn!(month = %row.month, "Duplicate GL month, keeping the later row");
        }
    }

    let records: Vec<CanonicalPnLRecord> = by_month
        .values()
        .map(|row| CanonicalPnLRecord::from_financials(row))
        .collect();

    debug!(months = records.len(), "Reconstructed P&L");
    records
}

/// Decompose EBITDA change between each pair of consecutive records
///
/// The revenue impact applies the previous month's gross margin percentage
/// to the revenue delta; whatever that misses lands in `other_impact`.
pub fn margin_bridge(records: &[CanonicalPnLRecord]) -> Vec<MarginBridgeEntry> {
    if records.len() < 2 {
        return Vec::new();
    }

    records
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);

            let ebitda_change = curr.ebitda - prev.ebitda;
            let revenue_impact = (curr.revenue - prev.revenue) * (prev.gross_margin_pct / 100.0);
            let cogs_impact = -(curr.cogs - prev.cogs);
            let opex_impact = -(curr.total_opex - prev.total_opex);

            MarginBridgeEntry {
                month: curr.month.clone(),
                prev_month: prev.month.clone(),
                ebitda_change,
                revenue_impact,
                cogs_impact,
                opex_impact,
                other_impact: ebitda_change - revenue_impact - cogs_impact - opex_impact,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(month: &str, revenue: f64, cogs: f64, opex: [f64; 4]) -> MonthlyFinancials {
        MonthlyFinancials {
            month: month.to_string(),
            revenue,
            cogs,
            opex_sales_marketing: opex[0],
            opex_rnd: opex[1],
            opex_gna: opex[2],
            opex_other: opex[3],
        }
    }

    #[test]
    fn test_empty_input() {
        let (records, bridge) = reconstruct(&[]);
        assert!(records.is_empty());
        assert!(bridge.is_empty());
    }

    #[test]
    fn test_round_to_halves_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(42.123, 2), 42.12);
    }

    #[test]
    fn test_single_month_has_no_bridge() {
        let (records, bridge) = reconstruct(&[month(
            "2024-01",
            1000.0,
            400.0,
            [100.0, 100.0, 50.0, 50.0],
        )]);
        assert_eq!(records.len(), 1);
        assert!(bridge.is_empty());

        let r = &records[0];
        assert_eq!(r.gross_margin, 600.0);
        assert_eq!(r.gross_margin_pct, 60.0);
        assert_eq!(r.total_opex, 300.0);
        assert_eq!(r.ebitda, 300.0);
        assert_eq!(r.ebitda_margin_pct, 30.0);
    }

    #[test]
    fn test_zero_revenue_percentages_are_zero() {
        let (records, _) = reconstruct(&[month("2024-01", 0.0, 50.0, [10.0, 0.0, 0.0, 0.0])]);
        let r = &records[0];
        assert_eq!(r.gross_margin_pct, 0.0);
        assert_eq!(r.ebitda_margin_pct, 0.0);
        assert_eq!(r.ebitda, r.gross_margin - r.total_opex);
        assert_eq!(r.ebitda, -60.0);
    }

    #[test]
    fn test_sorted_and_deduplicated_by_month() {
        let rows = vec![
            month("2024-03", 300.0, 0.0, [0.0; 4]),
            month("2024-01", 100.0, 0.0, [0.0; 4]),
            month("2024-02", 200.0, 0.0, [0.0; 4]),
            month("2024-01", 150.0, 0.0, [0.0; 4]),
        ];
        let records = reconstruct_pnl(&rows);
        let months: Vec<&str> = records.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(records[0].revenue, 150.0);
    }

    #[test]
    fn test_ebitda_identity_holds() {
        let rows = vec![
            month("2024-01", 1234.5, 321.0, [11.1, 22.2, 33.3, 44.4]),
            month("2024-02", 987.0, 654.0, [1.0, 2.0, 3.0, 4.0]),
        ];
        for r in reconstruct_pnl(&rows) {
            assert_eq!(r.ebitda, r.gross_margin - r.total_opex);
        }
    }

    #[test]
    fn test_margin_bridge_components() {
        let rows = vec![
            month("2024-01", 1000.0, 400.0, [100.0, 100.0, 50.0, 50.0]),
            month("2024-02", 1200.0, 500.0, [120.0, 100.0, 50.0, 60.0]),
        ];
        let (_, bridge) = reconstruct(&rows);
        assert_eq!(bridge.len(), 1);

        let b = &bridge[0];
        assert_eq!(b.month, "2024-02");
        assert_eq!(b.prev_month, "2024-01");
        // EBITDA 300 -> 370
        assert_eq!(b.ebitda_change, 70.0);
        // 200 revenue delta at the prior 60% gross margin
        assert!((b.revenue_impact - 120.0).abs() < 1e-9);
        assert_eq!(b.cogs_impact, -100.0);
        assert_eq!(b.opex_impact, -30.0);
        assert!((b.other_impact - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_margin_bridge_sums_to_change() {
        let rows = vec![
            month("2024-01", 1000.0, 333.0, [10.0, 20.0, 30.0, 40.0]),
            month("2024-02", 0.0, 10.0, [5.0, 5.0, 5.0, 5.0]),
            month("2024-03", 777.7, 123.4, [50.0, 60.0, 70.0, 80.0]),
        ];
        let (_, bridge) = reconstruct(&rows);
        assert_eq!(bridge.len(), 2);
        for b in &bridge {
            let sum = b.revenue_impact + b.cogs_impact + b.opex_impact + b.other_impact;
            assert!((b.ebitda_change - sum).abs() < 1e-6);
        }
    }
}
