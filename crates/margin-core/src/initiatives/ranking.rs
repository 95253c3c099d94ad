//! Initiative Ranker
//!
//! Scores sized initiatives by risk- and time-adjusted expected value and
//! assigns dense 1-based ranks.

use tracing::debug;

use crate::config::RankingConfig;
use crate::models::{RankedInitiative, SizedInitiative, Sizing};
use crate::pnl::round_to;

/// `impact_mid * confidence / (risk * time)`, rounded to two decimals
///
/// Returns 0.0 when the denominator is not positive or the result is not
/// finite.
pub fn weighted_score(sizing: &Sizing, config: &RankingConfig) -> f64 {
    let denominator =
        config.risk_multiplier(sizing.risk_level) * config.time_multiplier(sizing.time_to_value_weeks);
    if denominator <= 0.0 {
        return 0.0;
    }

    let score = sizing.impact_mid() * sizing.confidence / denominator;
    if !score.is_finite() {
        return 0.0;
    }
    let rounded = round_to(score, 2);
    // -0.0 must tie with 0.0 under total_cmp
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Score and order initiatives, highest score first
///
/// Ties keep their input order.
pub fn rank_initiatives(
    initiatives: Vec<SizedInitiative>,
    config: &RankingConfig,
) -> Vec<RankedInitiative> {
    let mut scored: Vec<(f64, SizedInitiative)> = initiatives
        .into_iter()
        .map(|sized| (weighted_score(&sized.sizing, config), sized))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let ranked: Vec<RankedInitiative> = scored
        .into_iter()
        .enumerate()
        .map(|(i, (weighted_score, sized))| RankedInitiative {
            sized,
            weighted_score,
            rank: i + 1,
        })
        .collect();

    debug!(count = ranked.len(), "Ranked initiatives");
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Initiative, InitiativeCategory, RiskLevel};

    fn sized(
        title: &str,
        impact: (f64, f64),
        confidence: f64,
        risk_level: RiskLevel,
        weeks: u32,
    ) -> SizedInitiative {
        Initiative::new(title, InitiativeCategory::Cost).sized(Sizing {
            impact_low: impact.0,
            impact_high: impact.1,
            time_to_value_weeks: weeks,
            implementation_cost_estimate: 0.0,
            risk_level,
            confidence,
            assumptions: vec![],
            next_steps: vec![],
            needs_data: false,
        })
    }

    #[test]
    fn test_higher_value_lower_risk_ranks_first() {
        let config = RankingConfig::default();
        let ranked = rank_initiatives(
            vec![
                sized("B", (50_000.0, 100_000.0), 0.6, RiskLevel::High, 24),
                sized("A", (100_000.0, 200_000.0), 0.8, RiskLevel::Low, 8),
            ],
            &config,
        );

        assert_eq!(ranked[0].title(), "A");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].title(), "B");
        assert_eq!(ranked[1].rank, 2);
        // 150,000 * 0.8 / (1.0 * 1.08)
        assert_eq!(ranked[0].weighted_score, 111_111.11);
        // 75,000 * 0.6 / (1.5 * 1.24)
        assert_eq!(ranked[1].weighted_score, 24_193.55);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let config = RankingConfig::default();
        let ranked = rank_initiatives(
            vec![
                sized("first", (10_000.0, 20_000.0), 0.5, RiskLevel::Med, 12),
                sized("second", (10_000.0, 20_000.0), 0.5, RiskLevel::Med, 12),
            ],
            &config,
        );
        assert_eq!(ranked[0].title(), "first");
        assert_eq!(ranked[1].title(), "second");
        assert_eq!(ranked[0].weighted_score, ranked[1].weighted_score);
    }

    #[test]
    fn test_non_positive_denominator_scores_zero() {
        let config = RankingConfig {
            time_multiplier_base: 0.0,
            time_multiplier_per_week: 0.0,
            ..RankingConfig::default()
        };
        let item = sized("x", (10_000.0, 20_000.0), 0.5, RiskLevel::Low, 4);
        assert_eq!(weighted_score(&item.sizing, &config), 0.0);
    }

    #[test]
    fn test_needs_data_initiatives_rank_last() {
        let config = RankingConfig::default();
        let ranked = rank_initiatives(
            vec![
                sized("empty", (0.0, 0.0), 0.2, RiskLevel::Med, 12),
                sized("real", (10_000.0, 20_000.0), 0.4, RiskLevel::Med, 16),
            ],
            &config,
        );
        assert_eq!(ranked[0].title(), "real");
        assert_eq!(ranked[1].weighted_score, 0.0);
    }

    #[test]
    fn test_negative_zero_score_ties_with_zero() {
        let config = RankingConfig::default();
        let negative = sized("negative", (-20_000.0, -10_000.0), 0.0, RiskLevel::Med, 12);
        assert!(weighted_score(&negative.sizing, &config).is_sign_positive());

        let ranked = rank_initiatives(
            vec![
                sized("zero", (0.0, 0.0), 0.2, RiskLevel::Med, 12),
                negative,
            ],
            &config,
        );
        assert_eq!(ranked[0].title(), "zero");
        assert_eq!(ranked[1].title(), "negative");

        let ranked = rank_initiatives(
            vec![
                sized("negative", (-20_000.0, -10_000.0), 0.0, RiskLevel::Med, 12),
                sized("zero", (0.0, 0.0), 0.2, RiskLevel::Med, 12),
            ],
            &config,
        );
        assert_eq!(ranked[0].title(), "negative");
        assert_eq!(ranked[1].title(), "zero");
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_initiatives(vec![], &RankingConfig::default()).is_empty());
    }
}
