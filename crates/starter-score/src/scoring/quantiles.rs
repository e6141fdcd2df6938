// Reference-population quantile boundaries for the interpolated stat terms.

use crate::data::stats::PitcherRow;
use tracing::info;

// ---------------------------------------------------------------------------
// Scored stats
// ---------------------------------------------------------------------------

/// Quantile ranks at which boundaries are taken, ascending.
pub const QUANTILES: [f64; 7] = [0.05, 0.10, 0.25, 0.50, 0.75, 0.90, 0.95];

/// Seven boundary values for one stat, ascending by quantile rank.
pub type Boundaries = [f64; 7];

/// The continuous stats scored by interpolation against the reference pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoredStat {
    Xwoba,
    BarrelRate,
    Xslg,
    Whiff,
}

impl ScoredStat {
    /// Dataset column backing this stat.
    pub fn column(&self) -> &'static str {
        match self {
            ScoredStat::Xwoba => "xwoba",
            ScoredStat::BarrelRate => "barrels_per_bbe_percent",
            ScoredStat::Xslg => "xslg",
            ScoredStat::Whiff => "swing_miss_percent",
        }
    }

    pub fn value(&self, row: &PitcherRow) -> Option<f64> {
        match self {
            ScoredStat::Xwoba => row.xwoba,
            ScoredStat::BarrelRate => row.barrels_per_bbe_percent,
            ScoredStat::Xslg => row.xslg,
            ScoredStat::Whiff => row.swing_miss_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Boundary table
// ---------------------------------------------------------------------------

/// Quantile boundaries for every scored stat, derived once per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileBoundaries {
    pub xwoba: Boundaries,
    pub barrel_rate: Boundaries,
    pub xslg: Boundaries,
    pub whiff: Boundaries,
}

impl QuantileBoundaries {
    pub fn get(&self, stat: ScoredStat) -> &Boundaries {
        match stat {
            ScoredStat::Xwoba => &self.xwoba,
            ScoredStat::BarrelRate => &self.barrel_rate,
            ScoredStat::Xslg => &self.xslg,
            ScoredStat::Whiff => &self.whiff,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error("no pitcher has thrown at least {min_total_pitches} pitches; reference population is empty")]
    EmptyReferencePopulation { min_total_pitches: f64 },

    #[error("column `{column}` has no numeric values in the reference population")]
    NoNumericValues { column: &'static str },
}

// ---------------------------------------------------------------------------
// Pool filtering
// ---------------------------------------------------------------------------

/// Rows with at least `min_total_pitches` pitches thrown, in input order.
/// Rows with a missing pitch count never qualify.
pub fn filter_reference_pool(rows: &[PitcherRow], min_total_pitches: f64) -> Vec<&PitcherRow> {
    rows.iter()
        .filter(|r| r.total_pitches.is_some_and(|tp| tp >= min_total_pitches))
        .collect()
}

// ---------------------------------------------------------------------------
// Quantile computation
// ---------------------------------------------------------------------------

/// Linear-interpolated quantile of an ascending slice.
///
/// With `h = (n - 1) * q`, returns `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
/// Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let h = last as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    let hi = (lo + 1).min(last);
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Boundaries at [`QUANTILES`] for an unsorted set of values.
pub fn compute_boundaries(values: &[f64]) -> Option<Boundaries> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut out = [0.0; 7];
    for (slot, &q) in out.iter_mut().zip(QUANTILES.iter()) {
        *slot = quantile(&sorted, q)?;
    }
    Some(out)
}

fn stat_boundaries(pool: &[&PitcherRow], stat: ScoredStat) -> Result<Boundaries, BoundaryError> {
    let values: Vec<f64> = pool.iter().filter_map(|r| stat.value(r)).collect();
    compute_boundaries(&values).ok_or(BoundaryError::NoNumericValues {
        column: stat.column(),
    })
}

/// Compute the boundary table for every scored stat over the reference pool.
///
/// Missing cells are left out per stat, so each stat's boundaries come from
/// the pool members that actually report it.
pub fn compute_quantile_boundaries(
    rows: &[PitcherRow],
    min_total_pitches: f64,
) -> Result<QuantileBoundaries, BoundaryError> {
    let pool = filter_reference_pool(rows, min_total_pitches);
    if pool.is_empty() {
        return Err(BoundaryError::EmptyReferencePopulation { min_total_pitches });
    }
    info!(
        "Reference population: {} of {} pitchers with >= {} pitches",
        pool.len(),
        rows.len(),
        min_total_pitches
    );

    Ok(QuantileBoundaries {
        xwoba: stat_boundaries(&pool, ScoredStat::Xwoba)?,
        barrel_rate: stat_boundaries(&pool, ScoredStat::BarrelRate)?,
        xslg: stat_boundaries(&pool, ScoredStat::Xslg)?,
        whiff: stat_boundaries(&pool, ScoredStat::Whiff)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
