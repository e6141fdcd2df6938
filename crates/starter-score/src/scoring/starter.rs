// Composite starter score: four interpolated stat terms followed by the
// walk-rate, concentration, diversity, and workload rules.

use crate::config::ScoreWeights;
use crate::data::stats::{PitchMix, PitcherRow};
use crate::scoring::interp::{stat_term, Direction};
use crate::scoring::quantiles::{QuantileBoundaries, ScoredStat};
use crate::scoring::rules::{self, Contribution};
use serde::Serialize;
use tracing::debug;

/// Interpolated terms in evaluation order: (stat, log label, direction).
const STAT_TERMS: [(ScoredStat, &str, Direction); 4] = [
    (ScoredStat::Xwoba, "xwOBA", Direction::LowerIsBetter),
    (ScoredStat::BarrelRate, "Barrel%", Direction::LowerIsBetter),
    (ScoredStat::Xslg, "xSLG", Direction::LowerIsBetter),
    (ScoredStat::Whiff, "Whiff%", Direction::HigherIsBetter),
];

fn weight_for(weights: &ScoreWeights, stat: ScoredStat) -> f64 {
    match stat {
        ScoredStat::Xwoba => weights.xwoba,
        ScoredStat::BarrelRate => weights.barrel_rate,
        ScoredStat::Xslg => weights.xslg,
        ScoredStat::Whiff => weights.whiff,
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A pitcher row lacks a numeric value the score depends on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("`{player}` has no numeric value for `{column}`")]
pub struct MissingStat {
    pub player: String,
    pub column: &'static str,
}

/// The numeric stats a score needs, all known to be present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatLine {
    pub xwoba: f64,
    pub barrel_rate: f64,
    pub xslg: f64,
    pub whiff: f64,
    pub bb_percent: f64,
    pub total_pitches: f64,
}

impl StatLine {
    /// Pull the scored stats out of a row, failing on the first missing one.
    pub fn from_row(row: &PitcherRow) -> Result<Self, MissingStat> {
        let require = |column: &'static str, value: Option<f64>| {
            value.ok_or_else(|| MissingStat {
                player: row.player.clone(),
                column,
            })
        };
        Ok(StatLine {
            xwoba: require("xwoba", row.xwoba)?,
            barrel_rate: require("barrels_per_bbe_percent", row.barrels_per_bbe_percent)?,
            xslg: require("xslg", row.xslg)?,
            whiff: require("swing_miss_percent", row.swing_miss_percent)?,
            bb_percent: require("bb_percent", row.bb_percent)?,
            total_pitches: require("total_pitches", row.total_pitches)?,
        })
    }

    pub fn stat(&self, stat: ScoredStat) -> f64 {
        match stat {
            ScoredStat::Xwoba => self.xwoba,
            ScoredStat::BarrelRate => self.barrel_rate,
            ScoredStat::Xslg => self.xslg,
            ScoredStat::Whiff => self.whiff,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Final score plus one log line per contributing rule, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub player: String,
    pub score: f64,
    pub logs: Vec<String>,
}

impl ScoreResult {
    /// Score rounded to one decimal place, as displayed.
    pub fn rounded_score(&self) -> f64 {
        (self.score * 10.0).round() / 10.0
    }

    /// Copy with the score rounded for output. Logs are unchanged.
    pub fn for_display(&self) -> ScoreResult {
        ScoreResult {
            score: self.rounded_score(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Every contribution for one pitcher, in evaluation order.
///
/// `pitch_mix` comes from the dataset and drives the concentration penalty;
/// `typed_pitches_over_15` counts the user's typed usage and drives the
/// diversity bonus. The two sources are independent.
pub fn contributions(
    stats: &StatLine,
    pitch_mix: &PitchMix,
    typed_pitches_over_15: usize,
    boundaries: &QuantileBoundaries,
    weights: &ScoreWeights,
) -> Vec<Contribution> {
    let mut out: Vec<Contribution> = STAT_TERMS
        .iter()
        .map(|&(stat, label, direction)| {
            stat_term(
                label,
                stats.stat(stat),
                boundaries.get(stat),
                weight_for(weights, stat),
                direction,
            )
        })
        .collect();

    out.push(rules::walk_rate(stats.bb_percent));
    out.extend(rules::pitch_concentration(pitch_mix.top_two_total()));
    out.extend(rules::pitch_diversity(typed_pitches_over_15));
    out.extend(rules::workload(stats.total_pitches));
    out
}

/// Sum contributions into a score, floored at zero.
pub fn fold_score(player: &str, contributions: Vec<Contribution>) -> ScoreResult {
    let mut total = 0.0;
    let mut logs = Vec::with_capacity(contributions.len());
    for c in contributions {
        debug!("{}: {:+.3} ({})", player, c.points, c.log);
        total += c.points;
        logs.push(c.log);
    }

    ScoreResult {
        player: player.to_string(),
        score: if total > 0.0 { total } else { 0.0 },
        logs,
    }
}

/// Score a pitcher end to end.
pub fn calculate_starter_score(
    player: &str,
    stats: &StatLine,
    pitch_mix: &PitchMix,
    typed_pitches_over_15: usize,
    boundaries: &QuantileBoundaries,
    weights: &ScoreWeights,
) -> ScoreResult {
    let items = contributions(stats, pitch_mix, typed_pitches_over_15, boundaries, weights);
    fold_score(player, items)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::PitchType;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn test_boundaries() -> QuantileBoundaries {
        QuantileBoundaries {
            xwoba: [0.250, 0.270, 0.290, 0.310, 0.330, 0.350, 0.370],
            barrel_rate: [4.0, 5.0, 6.5, 8.0, 9.5, 11.0, 12.0],
            xslg: [0.330, 0.360, 0.390, 0.420, 0.450, 0.480, 0.510],
            whiff: [18.0, 20.0, 22.5, 25.0, 27.5, 30.0, 32.0],
        }
    }

    fn median_stats() -> StatLine {
        StatLine {
            xwoba: 0.310,
            barrel_rate: 8.0,
            xslg: 0.420,
            whiff: 25.0,
            bb_percent: 8.0,
            total_pitches: 1600.0,
        }
    }

    fn make_row() -> PitcherRow {
        PitcherRow {
            player: "Test Arm".into(),
            normalized_player: "test arm".into(),
            xwoba: Some(0.310),
            xslg: Some(0.420),
            barrels_per_bbe_percent: Some(8.0),
            swing_miss_percent: Some(25.0),
            bb_percent: Some(8.0),
            total_pitches: Some(1600.0),
            pitch_usage: [Some(45.0), None, None, Some(25.0), Some(15.0), Some(10.0), None],
        }
    }

    #[test]
    fn median_pitcher_log_sequence() {
        let row = make_row();
        let stats = StatLine::from_row(&row).unwrap();
        let result = calculate_starter_score(
            &row.player,
            &stats,
            &row.pitch_mix(),
            2,
            &test_boundaries(),
            &ScoreWeights::default(),
        );

        assert_eq!(
            result.logs,
            vec![
                "xwOBA → +12.5",
                "Barrel% → +10.0",
                "xSLG → +7.5",
                "Whiff% → +10.0",
                "BB% ≤9 → +9",
                "상위 2개 구종 ≥70% → -4",
                "다양성 2개 → +3",
                "투구 수 ≥1500 → +3",
            ]
        );
        // 12.5 + 10 + 7.5 + 10 + 9 - 4 + 3 + 3
        assert!(approx_eq(result.score, 51.0, 1e-9));
        assert_eq!(result.player, "Test Arm");
    }

    #[test]
    fn best_possible_pitcher() {
        let stats = StatLine {
            xwoba: 0.200,
            barrel_rate: 2.0,
            xslg: 0.300,
            whiff: 40.0,
            bb_percent: 4.0,
            total_pitches: 3000.0,
        };
        let result = calculate_starter_score(
            "Ace",
            &stats,
            &PitchMix::default(),
            4,
            &test_boundaries(),
            &ScoreWeights::default(),
        );
        // 25 + 20 + 15 + 20 + 15 + 5 + 5, no concentration line
        assert!(approx_eq(result.score, 105.0, 1e-9));
        assert_eq!(result.logs.len(), 7);
        assert!(!result.logs.iter().any(|l| l.contains("구종")));
    }

    #[test]
    fn score_floors_at_zero() {
        let stats = StatLine {
            xwoba: 0.450,
            barrel_rate: 15.0,
            xslg: 0.600,
            whiff: 10.0,
            bb_percent: 16.0,
            total_pitches: 150.0,
        };
        let row = PitcherRow {
            pitch_usage: [Some(80.0), Some(15.0), None, None, None, None, None],
            ..make_row()
        };
        let result = calculate_starter_score(
            "Struggler",
            &stats,
            &row.pitch_mix(),
            0,
            &test_boundaries(),
            &ScoreWeights::default(),
        );
        assert_eq!(result.score, 0.0);
        assert!(result.score.is_sign_positive());
        assert_eq!(
            result.logs,
            vec![
                "xwOBA → +0.0",
                "Barrel% → +0.0",
                "xSLG → +0.0",
                "Whiff% → +0.0",
                "BB% >13 → +0",
                "상위 2개 구종 ≥75% → -5",
            ]
        );
    }

    #[test]
    fn diversity_uses_typed_count_not_stored_mix() {
        // The stored mix has three pitches at 15%+ but the typed count is 1.
        let row = make_row();
        let stats = StatLine::from_row(&row).unwrap();
        let items = contributions(
            &stats,
            &row.pitch_mix(),
            1,
            &test_boundaries(),
            &ScoreWeights::default(),
        );
        assert!(items.iter().any(|c| c.log == "다양성 1개 → +1"));
    }

    #[test]
    fn custom_weights_scale_terms() {
        let weights = ScoreWeights {
            xwoba: 50.0,
            barrel_rate: 10.0,
            xslg: 30.0,
            whiff: 40.0,
        };
        let items = contributions(
            &median_stats(),
            &PitchMix::default(),
            0,
            &test_boundaries(),
            &weights,
        );
        assert!(approx_eq(items[0].points, 25.0, 1e-9));
        assert!(approx_eq(items[1].points, 5.0, 1e-9));
        assert!(approx_eq(items[2].points, 15.0, 1e-9));
        assert!(approx_eq(items[3].points, 20.0, 1e-9));
    }

    #[test]
    fn missing_stat_reports_first_absent_column() {
        let row = PitcherRow {
            barrels_per_bbe_percent: None,
            bb_percent: None,
            ..make_row()
        };
        let err = StatLine::from_row(&row).unwrap_err();
        assert_eq!(err.column, "barrels_per_bbe_percent");
        assert_eq!(err.player, "Test Arm");

        let row = PitcherRow {
            total_pitches: None,
            ..make_row()
        };
        assert_eq!(StatLine::from_row(&row).unwrap_err().column, "total_pitches");
    }

    #[test]
    fn missing_pitch_usage_is_not_a_missing_stat() {
        let row = PitcherRow {
            pitch_usage: [None; 7],
            ..make_row()
        };
        assert!(StatLine::from_row(&row).is_ok());
        assert!(row.pitch_mix().entries().is_empty());
        assert_eq!(row.usage(PitchType::FourSeam), None);
    }

    #[test]
    fn rounded_score_one_decimal() {
        let result = ScoreResult {
            player: "x".into(),
            score: 63.4567,
            logs: vec![],
        };
        assert!(approx_eq(result.rounded_score(), 63.5, 1e-12));
    }

    #[test]
    fn for_display_rounds_score_only() {
        let result = ScoreResult {
            player: "x".into(),
            score: 38.666_666_7,
            logs: vec!["xwOBA → +9.2".into()],
        };
        let shown = result.for_display();
        assert_eq!(shown.score, 38.7);
        assert_eq!(shown.player, result.player);
        assert_eq!(shown.logs, result.logs);
    }
}
