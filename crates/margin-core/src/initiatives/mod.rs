//! Initiative sizing and ranking
//!
//! Initiatives arrive from an external generator with a title and category.
//! The sizer attaches deterministic estimates from the data on hand and the
//! ranker orders the result by weighted score.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use margin_core::initiatives::{rank_initiatives, size_initiatives};
//!
//! let sized = size_initiatives(initiatives, &diagnostics, &pnl, &facts);
//! let ranked = rank_initiatives(sized, &RankingConfig::default());
//! ```

pub mod kind;
pub mod ranking;
pub mod sizing;

pub use kind::InitiativeKind;
pub use ranking::{rank_initiatives, weighted_score};
pub use sizing::{size_initiative, size_initiatives, Estimate};
