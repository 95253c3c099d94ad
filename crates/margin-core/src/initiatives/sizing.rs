//! Initiative Sizer
//!
//! Attaches a deterministic impact range, cost, timeline, risk and confidence
//! to an initiative. Each [`InitiativeKind`] has one rule. A rule prefers its
//! own dataset, falls back to a GL-based proxy where one exists, and otherwise
//! reports `needs_data` with zero impact.

use std::collections::BTreeMap;

use tracing::debug;

use super::kind::InitiativeKind;
use crate::diagnostics::DiagnosticsReport;
use crate::models::{FactSet, Initiative, OpexCategory, RiskLevel, SizedInitiative, Sizing};
use crate::pnl::CanonicalPnLRecord;

/// Cost per head assumed when payroll carries no usable cost
pub const DEFAULT_COST_PER_HEAD: f64 = 150_000.0;

pub const MIN_CONFIDENCE: f64 = 0.2;
pub const MAX_CONFIDENCE: f64 = 0.9;

const MONTHS_PER_YEAR: f64 = 12.0;
const DEFAULT_WEEKS: u32 = 12;

/// Working estimate threaded through a sizing rule
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub impact_low: f64,
    pub impact_high: f64,
    pub time_to_value_weeks: u32,
    pub implementation_cost: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub assumptions: Vec<String>,
    pub next_steps: Vec<String>,
    pub needs_data: bool,
}

impl Estimate {
    /// Impact as a percentage band of an annual base
    pub fn from_base(base: f64, low_pct: f64, high_pct: f64) -> Self {
        Self {
            impact_low: base * low_pct,
            impact_high: base * high_pct,
            time_to_value_weeks: DEFAULT_WEEKS,
            implementation_cost: 0.0,
            risk_level: RiskLevel::Med,
            confidence: 0.5,
            assumptions: Vec::new(),
            next_steps: Vec::new(),
            needs_data: false,
        }
    }

    /// Nothing to size from: zero impact, minimum confidence
    pub fn missing_data(assumption: impl Into<String>, next_step: impl Into<String>) -> Self {
        Self {
            confidence: MIN_CONFIDENCE,
            needs_data: true,
            ..Self::from_base(0.0, 0.0, 0.0)
        }
        .assume(assumption)
        .next_step(next_step)
    }

    pub fn with_weeks(mut self, weeks: u32) -> Self {
        self.time_to_value_weeks = weeks;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.implementation_cost = cost;
        self
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk_level = risk;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn assume(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }

    pub fn next_step(mut self, step: impl Into<String>) -> Self {
        self.next_steps.push(step.into());
        self
    }

    /// Round money to the nearest 1,000 and clamp confidence
    pub fn finish(self) -> Sizing {
        Sizing {
            impact_low: round_thousands(self.impact_low),
            impact_high: round_thousands(self.impact_high),
            time_to_value_weeks: self.time_to_value_weeks,
            implementation_cost_estimate: round_thousands(self.implementation_cost),
            risk_level: self.risk_level,
            confidence: self.confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
            assumptions: self.assumptions,
            next_steps: self.next_steps,
            needs_data: self.needs_data,
        }
    }
}

fn round_thousands(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value / 1000.0).round_ties_even() * 1000.0;
    // avoid serializing -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Inputs every rule can draw on
struct SizingContext<'a> {
    diagnostics: &'a DiagnosticsReport,
    pnl: &'a [CanonicalPnLRecord],
    facts: &'a FactSet,
}

impl SizingContext<'_> {
    /// Monthly average of a GL field, None without GL data
    fn monthly_average(&self, field: impl Fn(&CanonicalPnLRecord) -> f64) -> Option<f64> {
        if self.pnl.is_empty() {
            return None;
        }
        let total: f64 = self.pnl.iter().map(field).sum();
        Some(total / self.pnl.len() as f64)
    }
}

/// Size one initiative from diagnostics, the canonical P&L and optional facts
pub fn size_initiative(
    initiative: &Initiative,
    diagnostics: &DiagnosticsReport,
    pnl: &[CanonicalPnLRecord],
    facts: &FactSet,
) -> Sizing {
    let ctx = SizingContext {
        diagnostics,
        pnl,
        facts,
    };
    let kind = InitiativeKind::from_title(&initiative.title);

    let estimate = match kind {
        InitiativeKind::VendorConsolidation => size_vendor_consolidation(&ctx),
        InitiativeKind::CloudOptimization => size_cloud_optimization(&ctx),
        InitiativeKind::WorkforceOptimization => size_workforce_optimization(&ctx),
        InitiativeKind::SalesMarketingEfficiency => size_sales_marketing(&ctx),
        InitiativeKind::ToolRationalization => size_tool_rationalization(&ctx),
        InitiativeKind::Generic => size_generic(&ctx),
    };

    debug!(
        title = %initiative.title,
        kind = %kind,
        needs_data = estimate.needs_data,
        "Sized initiative"
    );

    estimate.finish()
}

/// Size every initiative, preserving input order
pub fn size_initiatives(
    initiatives: Vec<Initiative>,
    diagnostics: &DiagnosticsReport,
    pnl: &[CanonicalPnLRecord],
    facts: &FactSet,
) -> Vec<SizedInitiative> {
    initiatives
        .into_iter()
        .map(|initiative| {
            let sizing = size_initiative(&initiative, diagnostics, pnl, facts);
            initiative.sized(sizing)
        })
        .collect()
}

fn size_vendor_consolidation(ctx: &SizingContext) -> Estimate {
    if let Some(vendors) = ctx.facts.vendor_spend() {
        let mut by_vendor: BTreeMap<&str, f64> = BTreeMap::new();
        for fact in vendors {
            *by_vendor.entry(fact.vendor.as_str()).or_default() += fact.amount;
        }
        let total: f64 = by_vendor.values().sum();
        let vendor_count = by_vendor.len();

        return Estimate::from_base(total, 0.05, 0.15)
            .with_weeks(8)
            .with_cost(total * 0.02)
            .with_risk(RiskLevel::Low)
            .with_confidence(if vendor_count > 10 { 0.7 } else { 0.5 })
            .assume(format!("Assumes {} vendors can be consolidated", vendor_count))
            .next_step("Inventory all vendor contracts")
            .next_step("Identify consolidation candidates");
    }

    // Roughly 30% of opex_other is vendor spend
    if let Some(avg_other) = ctx.monthly_average(|r| r.opex_other) {
        let base = avg_other * 0.3 * MONTHS_PER_YEAR;
        return Estimate::from_base(base, 0.05, 0.15)
            .with_weeks(8)
            .with_cost(base * 0.02)
            .with_risk(RiskLevel::Med)
            .with_confidence(0.3)
            .assume("Vendor data not available - estimate based on opex_other")
            .next_step("Collect vendor spend data")
            .next_step("Inventory all vendor contracts");
    }

    Estimate::missing_data(
        "Vendor and GL data not available - cannot estimate vendor spend",
        "Collect vendor spend data",
    )
}

fn size_cloud_optimization(ctx: &SizingContext) -> Estimate {
    let Some(avg_other) = ctx.monthly_average(|r| r.opex_other) else {
        return Estimate::missing_data(
            "GL data not available - cannot estimate infrastructure spend",
            "Upload GL P&L data",
        );
    };

    let base = avg_other * MONTHS_PER_YEAR;
    Estimate::from_base(base, 0.10, 0.25)
        .with_weeks(16)
        .with_cost(base * 0.05)
        .with_risk(RiskLevel::Med)
        .with_confidence(0.6)
        .assume("Infrastructure costs are ~30% of opex_other")
        .next_step("Right-size instances")
        .next_step("Reserved instance analysis")
}

fn size_workforce_optimization(ctx: &SizingContext) -> Estimate {
    if let Some(payroll) = ctx.facts.payroll() {
        let latest = payroll
            .iter()
            .map(|p| p.month.as_str())
            .max()
            .unwrap_or_default();
        let headcount: u64 = payroll
            .iter()
            .filter(|p| p.month == latest)
            .map(|p| u64::from(p.headcount))
            .sum();
        let total_cost: f64 = payroll.iter().filter_map(|p| p.fully_loaded_cost).sum();

        let has_cost = total_cost > 0.0;
        let cost_per_head = if headcount > 0 {
            total_cost / headcount as f64
        } else {
            DEFAULT_COST_PER_HEAD
        };

        let mut estimate = Estimate::from_base(headcount as f64 * cost_per_head, 0.05, 0.10)
            .with_weeks(24)
            .with_cost(cost_per_head * 0.5)
            .with_risk(RiskLevel::High)
            .with_confidence(if has_cost { 0.5 } else { 0.3 })
            .assume(format!("Assumes {} total headcount", headcount));
        if headcount == 0 {
            estimate = estimate.assume(format!(
                "No headcount in the latest month - assumes ${:.0} per head",
                DEFAULT_COST_PER_HEAD
            ));
        } else if !has_cost {
            estimate = estimate.assume("Fully loaded cost not available - impact not estimated");
        }
        return estimate
            .next_step("Workforce analysis")
            .next_step("Identify optimization opportunities");
    }

    // Roughly 60% of opex is payroll
    if let Some(avg_opex) = ctx.monthly_average(|r| r.total_opex) {
        let base = avg_opex * 0.6 * MONTHS_PER_YEAR;
        return Estimate::from_base(base, 0.05, 0.10)
            .with_weeks(24)
            .with_cost(base * 0.02)
            .with_risk(RiskLevel::High)
            .with_confidence(0.3)
            .assume("Payroll data not available - estimate based on opex")
            .next_step("Collect payroll data")
            .next_step("Workforce analysis");
    }

    Estimate::missing_data(
        "Payroll and GL data not available - cannot estimate payroll",
        "Collect payroll data",
    )
}

fn size_sales_marketing(ctx: &SizingContext) -> Estimate {
    let Some(avg_sm) = ctx.monthly_average(|r| r.opex_sales_marketing) else {
        return Estimate::missing_data(
            "GL data not available - cannot estimate sales & marketing spend",
            "Upload GL P&L data",
        );
    };

    let base = avg_sm * MONTHS_PER_YEAR;
    let mut estimate = Estimate::from_base(base, 0.10, 0.20)
        .with_weeks(12)
        .with_cost(base * 0.05)
        .with_risk(RiskLevel::Med)
        .with_confidence(0.6)
        .assume("Sales & Marketing spend can be optimized");

    if let Some(split) = ctx.diagnostics.cost_split(OpexCategory::SalesMarketing) {
        estimate = estimate.assume(format!(
            "Sales & Marketing spend is an estimated {:.0}% variable (confidence {:.1})",
            split.variable_pct * 100.0,
            split.confidence
        ));
    }

    estimate
        .next_step("CAC analysis")
        .next_step("Channel efficiency review")
}

fn size_tool_rationalization(ctx: &SizingContext) -> Estimate {
    let software: Vec<_> = ctx
        .facts
        .vendor_spend()
        .unwrap_or_default()
        .iter()
        .filter(|v| v.is_software())
        .collect();

    if software.is_empty() {
        return Estimate::missing_data(
            "Software vendor data not available - cannot estimate tool spend",
            "Collect vendor spend data with categories",
        );
    }

    let total: f64 = software.iter().map(|v| v.amount).sum();
    Estimate::from_base(total, 0.15, 0.25)
        .with_weeks(8)
        .with_cost(total * 0.03)
        .with_risk(RiskLevel::Low)
        .with_confidence(0.7)
        .assume(format!("{} software vendors identified", software.len()))
        .next_step("Software inventory")
        .next_step("Usage analysis")
}

fn size_generic(ctx: &SizingContext) -> Estimate {
    let Some(avg_opex) = ctx.monthly_average(|r| r.total_opex) else {
        return Estimate::missing_data(
            "GL data not available - cannot estimate operating expense",
            "Upload GL P&L data",
        );
    };

    let base = avg_opex * MONTHS_PER_YEAR;
    Estimate::from_base(base, 0.03, 0.08)
        .with_weeks(16)
        .with_cost(base * 0.02)
        .with_risk(RiskLevel::Med)
        .with_confidence(0.4)
        .assume("Generic cost reduction estimate")
        .assume(format!(
            "{} opex spike month(s) flagged in diagnostics",
            ctx.diagnostics.outliers.opex_spikes.len()
        ))
        .next_step("Detailed analysis required")
}
