//! Initiative kind resolution
//!
//! The sizer picks one rule per initiative from keywords in its title. The
//! table is checked top to bottom and the first hit wins, so "software"
//! always lands on vendor consolidation even though tool rationalization
//! also lists it.

use serde::{Deserialize, Serialize};

/// The sizing rule an initiative falls under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeKind {
    VendorConsolidation,
    CloudOptimization,
    WorkforceOptimization,
    SalesMarketingEfficiency,
    ToolRationalization,
    Generic,
}

/// Keywords per kind, in match order
const KEYWORDS: &[(InitiativeKind, &[&str])] = &[
    (
        InitiativeKind::VendorConsolidation,
        &["vendor", "saas", "software"],
    ),
    (
        InitiativeKind::CloudOptimization,
        &["cloud", "infrastructure", "aws", "azure"],
    ),
    (
        InitiativeKind::WorkforceOptimization,
        &["headcount", "staffing", "workforce"],
    ),
    (
        InitiativeKind::SalesMarketingEfficiency,
        &["sales", "marketing", "cac"],
    ),
    (
        InitiativeKind::ToolRationalization,
        &["tool", "software", "sprawl"],
    ),
];

impl InitiativeKind {
    /// Resolve the kind from an initiative title (case-insensitive substring match)
    pub fn from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| title.contains(w)))
            .map(|(kind, _)| *kind)
            .unwrap_or(Self::Generic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VendorConsolidation => "vendor_consolidation",
            Self::CloudOptimization => "cloud_optimization",
            Self::WorkforceOptimization => "workforce_optimization",
            Self::SalesMarketingEfficiency => "sales_marketing_efficiency",
            Self::ToolRationalization => "tool_rationalization",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for InitiativeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
