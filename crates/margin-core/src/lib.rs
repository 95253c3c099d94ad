//! Margin Core Library
//!
//! Deterministic analytics for monthly company financials:
//! - CSV loaders for GL P&L, payroll, vendor spend and revenue segments
//! - P&L reconstruction and month-over-month margin bridge
//! - Diagnostics (cost behavior, outliers, trends, data completeness)
//! - Heuristic initiative sizing and weighted ranking
//! - Ranking configuration with embedded defaults
//! - Plain-text context summaries for the initiative generator

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod initiatives;
pub mod models;
pub mod months;
pub mod pipeline;
pub mod pnl;
pub mod summary;

pub use config::RankingConfig;
pub use diagnostics::{diagnose, DiagnosticsReport};
pub use error::{Error, Result};
pub use import::LoadOutcome;
pub use initiatives::{rank_initiatives, size_initiative, size_initiatives, InitiativeKind};
pub use models::{
    FactSet, Initiative, InitiativeCategory, MonthlyFinancials, OpexCategory, PayrollFact,
    PayrollFunction, RankedInitiative, RevenueSegmentFact, RiskLevel, SizedInitiative, Sizing,
    VendorSpendFact,
};
pub use pipeline::{run_analysis, AnalysisRun, RunStatus};
pub use pnl::{reconstruct, CanonicalPnLRecord, MarginBridgeEntry};
