//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - P&L, diagnostics and summary commands
//! - `config` - Ranking configuration display
//! - `data` - Shared CSV/JSON loading for the other commands
//! - `initiatives` - Initiative sizing and ranking commands
//! - `run` - Full pipeline command

pub mod analyze;
pub mod config;
pub mod data;
pub mod initiatives;
pub mod run;

// Re-export command functions for main.rs
pub use analyze::*;
pub use config::*;
pub use data::*;
pub use initiatives::*;
pub use run::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
