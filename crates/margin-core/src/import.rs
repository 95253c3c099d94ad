//! CSV loaders for the four input datasets
//!
//! - `gl_pnl_monthly.csv`: month, revenue, cogs, opex_* (opex optional)
//! - `payroll_summary.csv`: month, function, headcount, fully_loaded_cost (optional)
//! - `vendor_spend.csv`: month, vendor, category, amount
//! - `revenue_by_segment.csv`: month, segment, revenue
//!
//! Invalid rows are skipped and reported as `Row N: message` alongside the
//! rows that parsed. Only a missing required column or an unreadable file
//! fails the whole load.

use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    MonthlyFinancials, PayrollFact, PayrollFunction, RevenueSegmentFact, VendorSpendFact,
};
use crate::months::parse_month;

/// Rows that parsed plus a message for every row that did not
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> LoadOutcome<T> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load monthly GL P&L rows
pub fn load_gl<R: Read>(reader: R) -> Result<LoadOutcome<MonthlyFinancials>> {
    load_rows(reader, "GL P&L", &["month", "revenue", "cogs"], |row| {
        Ok(MonthlyFinancials {
            month: row.month()?,
            revenue: row.amount("revenue")?,
            cogs: row.amount("cogs")?,
            opex_sales_marketing: row.optional_amount("opex_sales_marketing")?.unwrap_or(0.0),
            opex_rnd: row.optional_amount("opex_rnd")?.unwrap_or(0.0),
            opex_gna: row.optional_amount("opex_gna")?.unwrap_or(0.0),
            opex_other: row.optional_amount("opex_other")?.unwrap_or(0.0),
        })
    })
}

/// Load payroll summary rows
pub fn load_payroll<R: Read>(reader: R) -> Result<LoadOutcome<PayrollFact>> {
    load_rows(reader, "payroll", &["month", "function", "headcount"], |row| {
        let function: PayrollFunction = row.text("function")?.parse()?;
        let headcount = row.text("headcount")?;
        let headcount = headcount
            .parse::<u32>()
            .map_err(|_| format!("headcount must be a non-negative integer (got {})", headcount))?;

        Ok(PayrollFact {
            month: row.month()?,
            function,
            headcount,
            fully_loaded_cost: row.optional_amount("fully_loaded_cost")?,
        })
    })
}

/// Load vendor spend rows
pub fn load_vendor_spend<R: Read>(reader: R) -> Result<LoadOutcome<VendorSpendFact>> {
    load_rows(
        reader,
        "vendor spend",
        &["month", "vendor", "category", "amount"],
        |row| {
            Ok(VendorSpendFact {
                month: row.month()?,
                vendor: row.text("vendor")?.to_string(),
                category: row.text("category")?.to_string(),
                amount: row.amount("amount")?,
            })
        },
    )
}

/// Load revenue by segment rows
pub fn load_revenue_segments<R: Read>(reader: R) -> Result<LoadOutcome<RevenueSegmentFact>> {
    load_rows(
        reader,
        "revenue by segment",
        &["month", "segment", "revenue"],
        |row| {
            Ok(RevenueSegmentFact {
                month: row.month()?,
                segment: row.text("segment")?.to_string(),
                revenue: row.amount("revenue")?,
            })
        },
    )
}

fn load_rows<R, T, F>(
    reader: R,
    dataset: &str,
    required: &[&str],
    parse_row: F,
) -> Result<LoadOutcome<T>>
where
    R: Read,
    F: Fn(&Row) -> std::result::Result<T, String>,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = column_index(rdr.headers()?);
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !columns.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(Error::Import(format!(
            "{}: Missing required columns: {}",
            dataset,
            missing.join(", ")
        )));
    }

    let mut outcome = LoadOutcome {
        records: Vec::new(),
        errors: Vec::new(),
    };

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = Row {
            columns: &columns,
            record: &record,
        };
        match parse_row(&row) {
            Ok(parsed) => outcome.records.push(parsed),
            Err(message) => {
                warn!(dataset, row = i + 1, error = %message, "Skipping invalid row");
                outcome.errors.push(format!("Row {}: {}", i + 1, message));
            }
        }
    }

    debug!(
        dataset,
        records = outcome.records.len(),
        errors = outcome.errors.len(),
        "Loaded CSV"
    );
    Ok(outcome)
}

/// Header name (trimmed, lowercased) to column position
fn column_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

/// One data row with by-name field access
struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl Row<'_> {
    /// Trimmed field, None when the column or the value is absent
    fn get(&self, name: &str) -> Option<&str> {
        let idx = *self.columns.get(name)?;
        self.record
            .get(idx)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn text(&self, name: &str) -> std::result::Result<&str, String> {
        self.get(name).ok_or_else(|| format!("{} is required", name))
    }

    fn month(&self) -> std::result::Result<String, String> {
        let month = self.text("month")?;
        if parse_month(month).is_none() {
            return Err(format!("Month must be in YYYY-MM format (got {})", month));
        }
        Ok(month.to_string())
    }

    fn amount(&self, name: &str) -> std::result::Result<f64, String> {
        parse_amount(name, self.text(name)?)
    }

    fn optional_amount(&self, name: &str) -> std::result::Result<Option<f64>, String> {
        self.get(name).map(|v| parse_amount(name, v)).transpose()
    }
}

/// Parse a non-negative amount, tolerating currency symbols and commas
fn parse_amount(name: &str, s: &str) -> std::result::Result<f64, String> {
    let cleaned = s.trim().replace(['$', ',', ' '], "");
    let value = cleaned
        .parse::<f64>()
        .map_err(|_| format!("{} is not a number (got {})", name, s))?;

    if !value.is_finite() {
        return Err(format!("{} must be finite (got {})", name, s));
    }
    if value < 0.0 {
        return Err(format!("{} must be >= 0 (got {})", name, s));
    }
    Ok(value)
}
