//! Outlier detection: vendor spend spikes, opex spikes, revenue declines
//!
//! Every check needs at least three data points before it reports anything.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stats::abs_z_scores;
use crate::models::VendorSpendFact;
use crate::pnl::{round_to, CanonicalPnLRecord};

/// Minimum number of points a check needs before it runs
pub const MIN_POINTS: usize = 3;

/// |z| above this flags a spike
pub const Z_SCORE_THRESHOLD: f64 = 2.0;

/// Month-over-month revenue drop (percent) above this flags a decline
pub const REVENUE_DECLINE_THRESHOLD_PCT: f64 = 20.0;

/// A month whose total vendor spend is a statistical outlier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSpike {
    pub month: String,
    pub amount: f64,
    pub z_score: f64,
}

/// A month whose total opex is a statistical outlier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexSpike {
    pub month: String,
    pub total_opex: f64,
    pub z_score: f64,
}

/// A month where revenue fell sharply from the month before
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueDecline {
    pub month: String,
    pub prev_revenue: f64,
    pub current_revenue: f64,
    pub decline_pct: f64,
}

/// All outlier findings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub vendor_spikes: Vec<VendorSpike>,
    pub opex_spikes: Vec<OpexSpike>,
    pub revenue_declines: Vec<RevenueDecline>,
}

impl OutlierReport {
    pub fn is_empty(&self) -> bool {
        self.vendor_spikes.is_empty()
            && self.opex_spikes.is_empty()
            && self.revenue_declines.is_empty()
    }
}

/// Run all three checks
pub fn detect_outliers(
    records: &[CanonicalPnLRecord],
    vendor_spend: Option<&[VendorSpendFact]>,
) -> OutlierReport {
    OutlierReport {
        vendor_spikes: vendor_spend.map(detect_vendor_spikes).unwrap_or_default(),
        opex_spikes: detect_opex_spikes(records),
        revenue_declines: detect_revenue_declines(records),
    }
}

/// Months (ascending) with their summed vendor spend
pub fn monthly_vendor_totals(vendor_spend: &[VendorSpendFact]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for fact in vendor_spend {
        *totals.entry(fact.month.as_str()).or_insert(0.0) += fact.amount;
    }
    totals
        .into_iter()
        .map(|(month, amount)| (month.to_string(), amount))
        .collect()
}

/// Flag months whose total vendor spend has |z| > 2
pub fn detect_vendor_spikes(vendor_spend: &[VendorSpendFact]) -> Vec<VendorSpike> {
    let totals = monthly_vendor_totals(vendor_spend);
    if totals.len() < MIN_POINTS {
        return Vec::new();
    }

    let amounts: Vec<f64> = totals.iter().map(|(_, amount)| *amount).collect();
    let Some(z_scores) = abs_z_scores(&amounts) else {
        return Vec::new();
    };

    totals
        .into_iter()
        .zip(z_scores)
        .filter(|(_, z)| *z > Z_SCORE_THRESHOLD)
        .map(|((month, amount), z_score)| VendorSpike {
            month,
            amount,
            z_score,
        })
        .collect()
}

/// Flag months whose total opex has |z| > 2
pub fn detect_opex_spikes(records: &[CanonicalPnLRecord]) -> Vec<OpexSpike> {
    if records.len() < MIN_POINTS {
        return Vec::new();
    }

    let totals: Vec<f64> = records.iter().map(|r| r.total_opex).collect();
    let Some(z_scores) = abs_z_scores(&totals) else {
        return Vec::new();
    };

    records
        .iter()
        .zip(z_scores)
        .filter(|(_, z)| *z > Z_SCORE_THRESHOLD)
        .map(|(record, z_score)| OpexSpike {
            month: record.month.clone(),
            total_opex: record.total_opex,
            z_score,
        })
        .collect()
}

/// Flag months where revenue dropped more than 20% from a positive prior month
pub fn detect_revenue_declines(records: &[CanonicalPnLRecord]) -> Vec<RevenueDecline> {
    if records.len() < MIN_POINTS {
        return Vec::new();
    }

    records
        .windows(2)
        .filter_map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            if prev.revenue <= 0.0 {
                return None;
            }
            let decline_pct = (prev.revenue - curr.revenue) / prev.revenue * 100.0;
            (decline_pct > REVENUE_DECLINE_THRESHOLD_PCT).then(|| RevenueDecline {
                month: curr.month.clone(),
                prev_revenue: prev.revenue,
                current_revenue: curr.revenue,
                decline_pct: round_to(decline_pct, 2),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthlyFinancials;
    use crate::pnl::reconstruct_pnl;

    fn vendor(month: &str, vendor: &str, amount: f64) -> VendorSpendFact {
        VendorSpendFact {
            month: month.to_string(),
            vendor: vendor.to_string(),
            category: "Software".to_string(),
            amount,
        }
    }

    fn gl_series(revenue: &[f64], opex_other: &[f64]) -> Vec<CanonicalPnLRecord> {
        let rows: Vec<MonthlyFinancials> = revenue
            .iter()
            .zip(opex_other)
            .enumerate()
            .map(|(i, (&rev, &other))| MonthlyFinancials {
                month: format!("2023-{:02}", i + 1),
                revenue: rev,
                cogs: 0.0,
                opex_sales_marketing: 0.0,
                opex_rnd: 0.0,
                opex_gna: 0.0,
                opex_other: other,
            })
            .collect();
        reconstruct_pnl(&rows)
    }

    #[test]
    fn test_vendor_totals_are_summed_per_month() {
        let facts = vec![
            vendor("2024-02", "A", 10.0),
            vendor("2024-01", "A", 5.0),
            vendor("2024-01", "B", 7.0),
        ];
        let totals = monthly_vendor_totals(&facts);
        assert_eq!(
            totals,
            vec![("2024-01".to_string(), 12.0), ("2024-02".to_string(), 10.0)]
        );
    }

    #[test]
    fn test_vendor_spike_flagged() {
        let mut facts: Vec<VendorSpendFact> = (1..=9)
            .map(|m| vendor(&format!("2024-{:02}", m), "A", 100.0))
            .collect();
        facts.push(vendor("2024-10", "A", 1000.0));

        let spikes = detect_vendor_spikes(&facts);
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].month, "2024-10");
        assert_eq!(spikes[0].amount, 1000.0);
        assert!(spikes[0].z_score > 2.0);
    }

    #[test]
    fn test_four_point_series_cannot_exceed_threshold() {
        // With n points the largest possible population z-score is sqrt(n - 1)
        let facts = vec![
            vendor("2024-01", "A", 100.0),
            vendor("2024-02", "A", 100.0),
            vendor("2024-03", "A", 100.0),
            vendor("2024-04", "A", 1000.0),
        ];
        assert!(detect_vendor_spikes(&facts).is_empty());
    }

    #[test]
    fn test_vendor_spikes_need_three_months() {
        let facts = vec![vendor("2024-01", "A", 1.0), vendor("2024-02", "A", 1000.0)];
        assert!(detect_vendor_spikes(&facts).is_empty());
    }

    #[test]
    fn test_opex_spike_flagged() {
        let mut other = vec![50.0; 11];
        other.push(500.0);
        let records = gl_series(&[1000.0; 12], &other);
        let spikes = detect_opex_spikes(&records);
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].month, "2023-12");
        assert_eq!(spikes[0].total_opex, 500.0);
    }

    #[test]
    fn test_flat_opex_has_no_spikes() {
        let records = gl_series(&[1000.0; 5], &[50.0; 5]);
        assert!(detect_opex_spikes(&records).is_empty());
    }

    #[test]
    fn test_revenue_decline_flagged() {
        let records = gl_series(&[1000.0, 700.0, 650.0, 0.0, 100.0], &[0.0; 5]);
        let declines = detect_revenue_declines(&records);

        let months: Vec<&str> = declines.iter().map(|d| d.month.as_str()).collect();
        // 30% drop, then 7% (ignored), then 100%; 2023-05 follows a zero month
        assert_eq!(months, vec!["2023-02", "2023-04"]);
        assert_eq!(declines[0].decline_pct, 30.0);
        assert_eq!(declines[0].prev_revenue, 1000.0);
        assert_eq!(declines[0].current_revenue, 700.0);
        assert_eq!(declines[1].decline_pct, 100.0);
    }

    #[test]
    fn test_revenue_declines_need_three_months() {
        let records = gl_series(&[1000.0, 100.0], &[0.0; 2]);
        assert!(detect_revenue_declines(&records).is_empty());
    }

    #[test]
    fn test_missing_vendor_data_is_not_an_error() {
        let records = gl_series(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]);
        let report = detect_outliers(&records, None);
        assert!(report.is_empty());
    }
}
