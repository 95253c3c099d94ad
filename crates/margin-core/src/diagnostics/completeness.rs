//! Data completeness scoring
//!
//! The GL series is required; payroll, vendor spend and revenue segments are
//! optional. Expected months are every calendar month between the first and
//! last GL month, so a hole in the uploaded series counts as a gap.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::FactSet;
use crate::months::month_range;
use crate::pnl::{round_to, CanonicalPnLRecord};

/// Payroll cost coverage below this is reported as a gap
pub const PAYROLL_COST_COVERAGE_TARGET: f64 = 0.8;

const OPTIONAL_DATASET_WEIGHT: f64 = 0.25;

/// Completeness of the datasets behind an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub total_months: usize,
    pub missing_gl_months: Vec<String>,
    pub missing_payroll_months: Vec<String>,
    pub payroll_cost_coverage: f64,
    pub gl_records: usize,
    pub payroll_records: usize,
    pub vendor_records: usize,
    pub revenue_segment_records: usize,
    /// Human-readable gap descriptions for reporting
    pub data_gaps: Vec<String>,
    pub completeness_score: f64,
    pub has_payroll: bool,
    pub has_vendor: bool,
    pub has_revenue_segments: bool,
}

/// Score the datasets available for this analysis
pub fn assess_completeness(records: &[CanonicalPnLRecord], facts: &FactSet) -> CompletenessReport {
    let gl_months: BTreeSet<&str> = records.iter().map(|r| r.month.as_str()).collect();
    let expected_months = expected_months(&gl_months);

    let missing_gl_months: Vec<String> = expected_months
        .iter()
        .filter(|m| !gl_months.contains(m.as_str()))
        .cloned()
        .collect();

    let payroll = facts.payroll();
    let vendor = facts.vendor_spend();
    let segments = facts.revenue_segments();

    let missing_payroll_months: Vec<String> = match payroll {
        Some(rows) => {
            let payroll_months: BTreeSet<&str> = rows.iter().map(|p| p.month.as_str()).collect();
            expected_months
                .iter()
                .filter(|m| !payroll_months.contains(m.as_str()))
                .cloned()
                .collect()
        }
        None => expected_months.clone(),
    };

    let payroll_cost_coverage = match payroll {
        Some(rows) => {
            let with_cost = rows.iter().filter(|p| p.fully_loaded_cost.is_some()).count();
            with_cost as f64 / rows.len() as f64
        }
        None => 0.0,
    };

    let mut data_gaps = Vec::new();
    if !missing_gl_months.is_empty() {
        data_gaps.push(format!(
            "Missing GL/P&L data for {} months",
            missing_gl_months.len()
        ));
    }
    match payroll {
        None => data_gaps.push("Payroll summary data not provided (optional)".to_string()),
        Some(_) if !missing_payroll_months.is_empty() => data_gaps.push(format!(
            "Missing payroll data for {} months",
            missing_payroll_months.len()
        )),
        Some(_) => {}
    }
    if payroll.is_some() && payroll_cost_coverage < PAYROLL_COST_COVERAGE_TARGET {
        data_gaps.push(format!(
            "Payroll cost data coverage: {:.0}% (target: 100%)",
            payroll_cost_coverage * 100.0
        ));
    }
    if vendor.is_none() {
        data_gaps.push("Vendor spend data not provided (optional)".to_string());
    }
    if segments.is_none() {
        data_gaps.push("Revenue by segment data not provided (optional)".to_string());
    }

    let required_score = if !records.is_empty() && missing_gl_months.is_empty() {
        1.0
    } else {
        0.5
    };
    let mut optional_score = 0.0;
    if payroll.is_some() {
        let payroll_factor = if missing_payroll_months.is_empty() { 1.0 } else { 0.5 };
        optional_score += OPTIONAL_DATASET_WEIGHT * payroll_factor;
    }
    if vendor.is_some() {
        optional_score += OPTIONAL_DATASET_WEIGHT;
    }
    if segments.is_some() {
        optional_score += OPTIONAL_DATASET_WEIGHT;
    }

    CompletenessReport {
        total_months: expected_months.len(),
        missing_gl_months,
        missing_payroll_months: if payroll.is_some() {
            missing_payroll_months
        } else {
            Vec::new()
        },
        payroll_cost_coverage: round_to(payroll_cost_coverage, 2),
        gl_records: records.len(),
        payroll_records: payroll.map_or(0, |rows| rows.len()),
        vendor_records: vendor.map_or(0, |rows| rows.len()),
        revenue_segment_records: segments.map_or(0, |rows| rows.len()),
        data_gaps,
        completeness_score: round_to(required_score + optional_score, 2),
        has_payroll: payroll.is_some(),
        has_vendor: vendor.is_some(),
        has_revenue_segments: segments.is_some(),
    }
}

/// Calendar months from the first to the last GL month
///
/// Falls back to the uploaded months themselves if a key does not parse.
fn expected_months(gl_months: &BTreeSet<&str>) -> Vec<String> {
    let (Some(first), Some(last)) = (gl_months.first(), gl_months.last()) else {
        return Vec::new();
    };
    month_range(first, last)
        .unwrap_or_else(|| gl_months.iter().map(|m| m.to_string()).collect())
}
