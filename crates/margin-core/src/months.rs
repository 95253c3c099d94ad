//! `YYYY-MM` month keys
//!
//! Months travel as strings so they sort chronologically and serialize
//! exactly as they were uploaded. These helpers validate them and walk
//! calendar ranges.

use std::sync::OnceLock;

use chrono::{Datelike, Months, NaiveDate};
use regex::Regex;

fn month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid regex"))
}

/// Parse a `YYYY-MM` key into the first day of that month
pub fn parse_month(month: &str) -> Option<NaiveDate> {
    if !month_pattern().is_match(month) {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()
}

/// Format a date as its `YYYY-MM` key
pub fn format_month(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Every month from `first` to `last` inclusive
///
/// None when either key is malformed; empty when `last` precedes `first`.
pub fn month_range(first: &str, last: &str) -> Option<Vec<String>> {
    let mut current = parse_month(first)?;
    let end = parse_month(last)?;

    let mut months = Vec::new();
    while current <= end {
        months.push(format_month(current));
        current = current.checked_add_months(Months::new(1))?;
    }
    Some(months)
}
