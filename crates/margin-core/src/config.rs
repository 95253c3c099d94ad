//! Ranking configuration
//!
//! The ranker's five multipliers live in a TOML file so they can be tuned
//! without a rebuild. The resolved value is passed into the ranker
//! explicitly; nothing reads configuration from ambient state.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path, if given and present
//! 2. Override in data dir (~/.local/share/margin/config/ranking.toml)
//! 3. Embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::RiskLevel;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/ranking.toml");

/// Multipliers used by the initiative ranker
///
/// `weighted_score = impact_mid * confidence / (risk * time)` where
/// `time = time_multiplier_base + weeks * time_multiplier_per_week`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub risk_multiplier_low: f64,
    pub risk_multiplier_med: f64,
    pub risk_multiplier_high: f64,
    pub time_multiplier_base: f64,
    pub time_multiplier_per_week: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            risk_multiplier_low: 1.0,
            risk_multiplier_med: 1.2,
            risk_multiplier_high: 1.5,
            time_multiplier_base: 1.0,
            time_multiplier_per_week: 0.01,
        }
    }
}

impl RankingConfig {
    /// Resolve configuration (explicit path, then data dir override, then embedded)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path.filter(|p| !p.exists()) {
            warn!(path = %path.display(), "Ranking config not found, using defaults");
        }
        let (content, source) = read_config(path)?;
        debug!(source = %source, "Loading ranking config");
        parse_config(&content)
    }

    /// Parse a TOML document; keys left out keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// The embedded defaults, ignoring any override files
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    pub fn risk_multiplier(&self, risk: RiskLevel) -> f64 {
        match risk {
            RiskLevel::Low => self.risk_multiplier_low,
            RiskLevel::Med => self.risk_multiplier_med,
            RiskLevel::High => self.risk_multiplier_high,
        }
    }

    pub fn time_multiplier(&self, weeks: u32) -> f64 {
        self.time_multiplier_base + f64::from(weeks) * self.time_multiplier_per_week
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("margin").join("config").join("ranking.toml"))
}

/// The file that `RankingConfig::load` would read, or None for embedded
pub fn resolved_config_path(path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    default_config_path().filter(|p| p.exists())
}

fn read_config(path: Option<&Path>) -> Result<(String, String)> {
    match resolved_config_path(path) {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Ok((content, path.display().to_string()))
        }
        None => Ok((DEFAULT_CONFIG.to_string(), "embedded".to_string())),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    ranking: Option<RawRanking>,
}

#[derive(Debug, Deserialize)]
struct RawRanking {
    risk_multiplier_low: Option<f64>,
    risk_multiplier_med: Option<f64>,
    risk_multiplier_high: Option<f64>,
    time_multiplier_base: Option<f64>,
    time_multiplier_per_week: Option<f64>,
}

fn parse_config(content: &str) -> Result<RankingConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid ranking config TOML: {}", e)))?;

    let mut config = RankingConfig::default();

    if let Some(ranking) = raw.ranking {
        if let Some(v) = ranking.risk_multiplier_low {
            config.risk_multiplier_low = v;
        }
        if let Some(v) = ranking.risk_multiplier_med {
            config.risk_multiplier_med = v;
        }
        if let Some(v) = ranking.risk_multiplier_high {
            config.risk_multiplier_high = v;
        }
        if let Some(v) = ranking.time_multiplier_base {
            config.time_multiplier_base = v;
        }
        if let Some(v) = ranking.time_multiplier_per_week {
            config.time_multiplier_per_week = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        assert_eq!(RankingConfig::embedded().unwrap(), RankingConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = RankingConfig::from_toml(
            r#"
            [ranking]
            risk_multiplier_high = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.risk_multiplier_high, 2.0);
        assert_eq!(config.risk_multiplier_low, 1.0);
        assert_eq!(config.time_multiplier_per_week, 0.01);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(RankingConfig::from_toml("").unwrap(), RankingConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = RankingConfig::from_toml("[ranking\nfoo = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_multipliers() {
        let config = RankingConfig::default();
        assert_eq!(config.risk_multiplier(RiskLevel::Low), 1.0);
        assert_eq!(config.risk_multiplier(RiskLevel::High), 1.5);
        assert!((config.time_multiplier(24) - 1.24).abs() < 1e-12);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.toml");
        fs::write(&path, "[ranking]\ntime_multiplier_base = 2.5\n").unwrap();

        let config = RankingConfig::load(Some(&path)).unwrap();
        assert_eq!(config.time_multiplier_base, 2.5);
        assert_eq!(resolved_config_path(Some(&path)), Some(path));
    }
}
