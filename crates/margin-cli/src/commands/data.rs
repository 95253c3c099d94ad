//! Shared input loading for the analysis commands

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use margin_core::{
    import::{load_gl, load_payroll, load_revenue_segments, load_vendor_spend},
    FactSet, Initiative, LoadOutcome, MonthlyFinancials, SizedInitiative,
};
use tracing::debug;

use crate::cli::DataArgs;

/// Row errors shown per file before collapsing the rest
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Everything loaded from the data flags
pub struct Inputs {
    pub financials: Vec<MonthlyFinancials>,
    pub facts: FactSet,
}

/// Load the GL file and whichever optional datasets were given
pub fn load_inputs(data: &DataArgs) -> Result<Inputs> {
    let financials = load_gl_file(&data.gl)?;

    let mut facts = FactSet::new();
    if let Some(path) = &data.payroll {
        facts = facts.with_payroll(load_csv(path, "payroll", load_payroll)?);
    }
    if let Some(path) = &data.vendor {
        facts = facts.with_vendor_spend(load_csv(path, "vendor spend", load_vendor_spend)?);
    }
    if let Some(path) = &data.segments {
        facts = facts.with_revenue_segments(load_csv(
            path,
            "revenue by segment",
            load_revenue_segments,
        )?);
    }

    debug!(
        months = financials.len(),
        payroll = facts.payroll().is_some(),
        vendor = facts.vendor_spend().is_some(),
        segments = facts.revenue_segments().is_some(),
        "Loaded inputs"
    );
    Ok(Inputs { financials, facts })
}

pub fn load_gl_file(path: &Path) -> Result<Vec<MonthlyFinancials>> {
    load_csv(path, "GL P&L", load_gl)
}

fn load_csv<T, F>(path: &Path, label: &str, loader: F) -> Result<Vec<T>>
where
    F: FnOnce(File) -> margin_core::Result<LoadOutcome<T>>,
{
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let outcome = loader(file).with_context(|| format!("Failed to load {}", path.display()))?;

    if !outcome.is_clean() {
        eprintln!(
            "⚠️  {}: skipped {} invalid row(s) in {}",
            label,
            outcome.errors.len(),
            path.display()
        );
        for error in outcome.errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
            eprintln!("      {}", error);
        }
        if outcome.errors.len() > MAX_ROW_ERRORS_SHOWN {
            eprintln!(
                "      ... and {} more",
                outcome.errors.len() - MAX_ROW_ERRORS_SHOWN
            );
        }
    }

    Ok(outcome.records)
}

/// Read a JSON array of unsized initiatives
pub fn read_initiatives(path: &Path) -> Result<Vec<Initiative>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read initiatives: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse initiatives JSON: {}", path.display()))
}

/// Read a JSON array of sized initiatives
pub fn read_sized_initiatives(path: &Path) -> Result<Vec<SizedInitiative>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read initiatives: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse sized initiatives JSON: {}", path.display()))
}
