//! Linear trend fits for headline P&L metrics

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::stats::linear_fit;
use crate::pnl::CanonicalPnLRecord;

/// Months of history needed before trends are fitted
pub const MIN_MONTHS_FOR_TREND: usize = 3;

/// Metrics that get a trend line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    Revenue,
    Ebitda,
    EbitdaMarginPct,
    TotalOpex,
}

impl TrendMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Ebitda => "ebitda",
            Self::EbitdaMarginPct => "ebitda_margin_pct",
            Self::TotalOpex => "total_opex",
        }
    }

    pub fn all() -> &'static [TrendMetric] {
        &[
            Self::Revenue,
            Self::Ebitda,
            Self::EbitdaMarginPct,
            Self::TotalOpex,
        ]
    }

    fn value(&self, record: &CanonicalPnLRecord) -> f64 {
        match self {
            Self::Revenue => record.revenue,
            Self::Ebitda => record.ebitda,
            Self::EbitdaMarginPct => record.ebitda_margin_pct,
            Self::TotalOpex => record.total_opex,
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a fitted slope; a flat slope counts as decreasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Self::Increasing
        } else {
            Self::Decreasing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fitted trend for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub slope: f64,
    pub direction: TrendDirection,
    pub r_squared: f64,
}

/// Fit every metric, or return an empty map with fewer than three months
pub fn calculate_trends(records: &[CanonicalPnLRecord]) -> BTreeMap<TrendMetric, Trend> {
    if records.len() < MIN_MONTHS_FOR_TREND {
        return BTreeMap::new();
    }

    TrendMetric::all()
        .iter()
        .map(|&metric| {
            let values: Vec<f64> = records.iter().map(|r| metric.value(r)).collect();
            let fit = linear_fit(&values);
            (
                metric,
                Trend {
                    slope: fit.slope,
                    direction: TrendDirection::from_slope(fit.slope),
                    r_squared: fit.r_squared,
                },
            )
        })
        .collect()
}
