// One loaded dataset and the boundaries derived from it.
//
// A session is built once per dataset and never mutated afterwards; every
// query borrows it immutably, so a failed query cannot disturb later ones.
// Loading a new dataset means building a new session.

use crate::config::{Config, ScoreWeights};
use crate::data::stats::{load_dataset, load_dataset_from_reader, Dataset, DatasetError};
use crate::data::usage::{PitchUsage, UsageParseError};
use crate::scoring::quantiles::{compute_quantile_boundaries, BoundaryError, QuantileBoundaries};
use crate::scoring::rules::DIVERSITY_MIN_SHARE;
use crate::scoring::starter::{calculate_starter_score, MissingStat, ScoreResult, StatLine};
use std::io::Read;
use std::path::Path;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failure to build a session. Blocks all querying.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Boundaries(#[from] BoundaryError),
}

/// Failure of a single query. The session stays usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("pitcher not found: {name}")]
    PitcherNotFound { name: String },

    #[error("invalid pitch usage: {0}")]
    Usage(#[from] UsageParseError),

    #[error("cannot score: {0}")]
    MissingStat(#[from] MissingStat),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    boundaries: QuantileBoundaries,
    weights: ScoreWeights,
}

impl Session {
    /// Derive boundaries from `dataset` over pitchers with at least
    /// `min_total_pitches` pitches.
    pub fn new(
        dataset: Dataset,
        min_total_pitches: f64,
        weights: ScoreWeights,
    ) -> Result<Self, BoundaryError> {
        let boundaries = compute_quantile_boundaries(&dataset.rows, min_total_pitches)?;
        Ok(Session {
            dataset,
            boundaries,
            weights,
        })
    }

    /// Load a dataset from a CSV reader using the reference and weight settings
    /// from `config`.
    pub fn from_reader<R: Read>(rdr: R, config: &Config) -> Result<Self, LoadError> {
        let dataset = load_dataset_from_reader(rdr)?;
        Ok(Self::new(
            dataset,
            config.reference.min_total_pitches(),
            config.weights,
        )?)
    }

    /// Load a dataset from a CSV file using the settings from `config`.
    pub fn load(path: &Path, config: &Config) -> Result<Self, LoadError> {
        let dataset = load_dataset(path)?;
        let session = Self::new(
            dataset,
            config.reference.min_total_pitches(),
            config.weights,
        )?;
        info!("Session ready: {} pitchers from {}", session.dataset.len(), path.display());
        Ok(session)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn boundaries(&self) -> &QuantileBoundaries {
        &self.boundaries
    }

    /// Score one pitcher by name against this session's dataset.
    ///
    /// `usage_input` is the hand-typed `Label:value, ...` string; it only
    /// feeds the diversity bonus. The concentration penalty uses the pitch
    /// mix stored in the dataset.
    pub fn query(&self, name: &str, usage_input: &str) -> Result<ScoreResult, QueryError> {
        let row = self
            .dataset
            .find_player(name)
            .ok_or_else(|| QueryError::PitcherNotFound {
                name: name.trim().to_string(),
            })?;

        let usage = PitchUsage::parse(usage_input)?;
        let typed_over_15 = usage.count_at_least(DIVERSITY_MIN_SHARE);

        let pitch_mix = row.pitch_mix();
        let stats = StatLine::from_row(row)?;

        let result = calculate_starter_score(
            &row.player,
            &stats,
            &pitch_mix,
            typed_over_15,
            &self.boundaries,
            &self.weights,
        );
        info!("Scored {}: {:.1}", result.player, result.score);
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::PitcherRow;

    fn make_row(name: &str, xwoba: Option<f64>, total_pitches: f64) -> PitcherRow {
        PitcherRow {
            player: name.into(),
            normalized_player: crate::data::names::normalize_name(name),
            xwoba,
            xslg: Some(0.400),
            barrels_per_bbe_percent: Some(8.0),
            swing_miss_percent: Some(25.0),
            bb_percent: Some(6.0),
            total_pitches: Some(total_pitches),
            pitch_usage: [Some(50.0), None, None, Some(30.0), None, None, None],
        }
    }

    fn test_session() -> Session {
        let dataset = Dataset {
            rows: vec![
                make_row("Ace Pitcher", Some(0.250), 3000.0),
                make_row("Mid Pitcher", Some(0.300), 1600.0),
                make_row("Bad Pitcher", Some(0.350), 900.0),
                make_row("No Xwoba", None, 1200.0),
            ],
        };
        Session::new(dataset, 100.0, ScoreWeights::default()).unwrap()
    }

    #[test]
    fn query_scores_known_pitcher() {
        let session = test_session();
        let result = session.query("ace pitcher", "4-Seam:50, Slider:30").unwrap();
        assert_eq!(result.player, "Ace Pitcher");
        assert_eq!(result.logs[0], "xwOBA → +25.0");
        assert!(result.logs.contains(&"다양성 2개 → +3".to_string()));
        assert!(result.logs.contains(&"상위 2개 구종 ≥75% → -5".to_string()));
        assert!(result.score > 0.0);
    }

    #[test]
    fn unknown_pitcher_is_not_found() {
        let session = test_session();
        let err = session.query("  Nobody Here ", "4-Seam:50").unwrap_err();
        assert_eq!(
            err,
            QueryError::PitcherNotFound {
                name: "Nobody Here".into()
            }
        );
    }

    #[test]
    fn malformed_usage_aborts_query() {
        let session = test_session();
        let err = session.query("Ace Pitcher", "4-Seam 55").unwrap_err();
        assert!(matches!(err, QueryError::Usage(UsageParseError::MalformedEntry { .. })));
    }

    #[test]
    fn missing_stat_aborts_query() {
        let session = test_session();
        let err = session.query("No Xwoba", "4-Seam:50").unwrap_err();
        match err {
            QueryError::MissingStat(m) => assert_eq!(m.column, "xwoba"),
            other => panic!("expected MissingStat, got: {other}"),
        }
    }

    #[test]
    fn failed_query_leaves_session_usable() {
        let session = test_session();
        let before = session.boundaries().clone();
        assert!(session.query("Nobody", "4-Seam:50").is_err());
        assert!(session.query("Ace Pitcher", "bad").is_err());
        assert_eq!(session.boundaries(), &before);
        assert!(session.query("Mid Pitcher", "4-Seam:50").is_ok());
    }

    #[test]
    fn repeated_queries_are_identical() {
        let session = test_session();
        let a = session.query("Mid Pitcher", "Sinker:40, Cutter:20").unwrap();
        let b = session.query("MID PITCHER", "Sinker:40, Cutter:20").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_reference_population_blocks_session() {
        let dataset = Dataset {
            rows: vec![make_row("Opener", Some(0.300), 40.0)],
        };
        let err = Session::new(dataset, 100.0, ScoreWeights::default()).unwrap_err();
        assert!(matches!(err, BoundaryError::EmptyReferencePopulation { .. }));
    }
}
