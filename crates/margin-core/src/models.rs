//! Domain models for Margin
//!
//! Raw monthly facts come in from ingestion, initiatives come in from the
//! external generator. Every struct here is plain data: the analytics
//! modules never hold references back into the caller's storage.

use serde::{Deserialize, Serialize};

/// One month of general-ledger P&L facts
///
/// `month` is `YYYY-MM`, which sorts chronologically as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFinancials {
    pub month: String,
    pub revenue: f64,
    pub cogs: f64,
    #[serde(default)]
    pub opex_sales_marketing: f64,
    #[serde(default)]
    pub opex_rnd: f64,
    #[serde(default)]
    pub opex_gna: f64,
    #[serde(default)]
    pub opex_other: f64,
}

impl MonthlyFinancials {
    pub fn total_opex(&self) -> f64 {
        self.opex_sales_marketing + self.opex_rnd + self.opex_gna + self.opex_other
    }
}

/// Operating expense buckets carried on every GL row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpexCategory {
    SalesMarketing,
    Rnd,
    Gna,
    Other,
}

impl OpexCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesMarketing => "sales_marketing",
            Self::Rnd => "rnd",
            Self::Gna => "gna",
            Self::Other => "other",
        }
    }

    /// Get all categories in reporting order
    pub fn all() -> &'static [OpexCategory] {
        &[Self::SalesMarketing, Self::Rnd, Self::Gna, Self::Other]
    }
}

impl std::fmt::Display for OpexCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vendor spend for one vendor in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSpendFact {
    pub month: String,
    pub vendor: String,
    pub category: String,
    pub amount: f64,
}

impl VendorSpendFact {
    /// Software and SaaS vendors are the base for tool rationalization
    pub fn is_software(&self) -> bool {
        let category = self.category.to_lowercase();
        category.contains("software") || category.contains("saas")
    }
}

/// Business function a payroll row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayrollFunction {
    Sales,
    Marketing,
    #[serde(rename = "R&D")]
    RnD,
    #[serde(rename = "G&A")]
    GnA,
    Ops,
}

impl PayrollFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "Sales",
            Self::Marketing => "Marketing",
            Self::RnD => "R&D",
            Self::GnA => "G&A",
            Self::Ops => "Ops",
        }
    }
}

impl std::str::FromStr for PayrollFunction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Sales" => Ok(Self::Sales),
            "Marketing" => Ok(Self::Marketing),
            "R&D" => Ok(Self::RnD),
            "G&A" => Ok(Self::GnA),
            "Ops" => Ok(Self::Ops),
            _ => Err(format!(
                "Function must be one of: Sales, Marketing, R&D, G&A, Ops (got {})",
                s
            )),
        }
    }
}

impl std::fmt::Display for PayrollFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Headcount and (optionally) fully loaded cost for one function in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollFact {
    pub month: String,
    pub function: PayrollFunction,
    pub headcount: u32,
    pub fully_loaded_cost: Option<f64>,
}

/// Revenue for one segment in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSegmentFact {
    pub month: String,
    pub segment: String,
    pub revenue: f64,
}

/// The optional auxiliary datasets available to an analysis call
///
/// Each dataset is either absent (`None`) or loaded. An empty vector is
/// treated exactly like an absent dataset by the accessors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactSet {
    pub vendor_spend: Option<Vec<VendorSpendFact>>,
    pub payroll: Option<Vec<PayrollFact>>,
    pub revenue_segments: Option<Vec<RevenueSegmentFact>>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vendor_spend(mut self, rows: Vec<VendorSpendFact>) -> Self {
        self.vendor_spend = Some(rows);
        self
    }

    pub fn with_payroll(mut self, rows: Vec<PayrollFact>) -> Self {
        self.payroll = Some(rows);
        self
    }

    pub fn with_revenue_segments(mut self, rows: Vec<RevenueSegmentFact>) -> Self {
        self.revenue_segments = Some(rows);
        self
    }

    /// Vendor rows, or None when the dataset is absent or empty
    pub fn vendor_spend(&self) -> Option<&[VendorSpendFact]> {
        non_empty(&self.vendor_spend)
    }

    /// Payroll rows, or None when the dataset is absent or empty
    pub fn payroll(&self) -> Option<&[PayrollFact]> {
        non_empty(&self.payroll)
    }

    /// Segment rows, or None when the dataset is absent or empty
    pub fn revenue_segments(&self) -> Option<&[RevenueSegmentFact]> {
        non_empty(&self.revenue_segments)
    }
}

fn non_empty<T>(rows: &Option<Vec<T>>) -> Option<&[T]> {
    rows.as_deref().filter(|r| !r.is_empty())
}

/// Initiative category assigned by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitiativeCategory {
    Cost,
    Efficiency,
    Structural,
}

impl InitiativeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cost => "Cost",
            Self::Efficiency => "Efficiency",
            Self::Structural => "Structural",
        }
    }
}

impl std::fmt::Display for InitiativeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Execution risk of an initiative
///
/// Deserialization is lenient: any unrecognized label becomes `Med`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RiskLevel {
    Low,
    #[default]
    Med,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Med => "Med",
            Self::High => "High",
        }
    }
}

impl From<String> for RiskLevel {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Med,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An initiative as produced by the generator, before sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub title: String,
    pub category: InitiativeCategory,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_evidence: Vec<String>,
}

impl Initiative {
    pub fn new(title: impl Into<String>, category: InitiativeCategory) -> Self {
        Self {
            title: title.into(),
            category,
            owner: None,
            description: String::new(),
            data_evidence: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach the sizing fields, moving to the next pipeline stage
    pub fn sized(self, sizing: Sizing) -> SizedInitiative {
        SizedInitiative {
            initiative: self,
            sizing,
        }
    }
}

/// Quantitative estimate attached by the sizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sizing {
    pub impact_low: f64,
    pub impact_high: f64,
    pub time_to_value_weeks: u32,
    pub implementation_cost_estimate: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub needs_data: bool,
}

impl Sizing {
    pub fn impact_mid(&self) -> f64 {
        (self.impact_low + self.impact_high) / 2.0
    }
}

/// An initiative with sizing fields, serialized flat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedInitiative {
    #[serde(flatten)]
    pub initiative: Initiative,
    #[serde(flatten)]
    pub sizing: Sizing,
}

/// A sized initiative with its score and 1-based rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedInitiative {
    #[serde(flatten)]
    pub sized: SizedInitiative,
    pub weighted_score: f64,
    pub rank: usize,
}

impl RankedInitiative {
    pub fn title(&self) -> &str {
        &self.sized.initiative.title
    }
}
