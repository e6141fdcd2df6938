// Piecewise-linear stat terms over quantile boundaries.
//
// Each scored stat maps its seven boundaries to seven control values spaced
// evenly between the full weight and zero. Values outside the boundary range
// clamp to the end control values, so a term always lies in [0, weight].

use crate::scoring::quantiles::Boundaries;
use crate::scoring::rules::Contribution;

/// Control values at the seven boundaries, as fractions of the weight, for a
/// stat where lower raw values are better.
pub const CONTROL_FRACTIONS: [f64; 7] = [
    1.0,
    5.0 / 6.0,
    4.0 / 6.0,
    3.0 / 6.0,
    2.0 / 6.0,
    1.0 / 6.0,
    0.0,
];

/// Which end of a stat's distribution earns the full weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Contact-quality stats (xwOBA, Barrel%, xSLG).
    LowerIsBetter,
    /// Bat-missing stats (Whiff%).
    HigherIsBetter,
}

/// Control values for `weight` in the given direction, aligned with
/// ascending boundaries.
pub fn control_points(weight: f64, direction: Direction) -> [f64; 7] {
    let mut cuts = CONTROL_FRACTIONS.map(|f| weight * f);
    if direction == Direction::HigherIsBetter {
        cuts.reverse();
    }
    cuts
}

/// One-dimensional linear interpolation of `x` over ascending `xp` → `fp`.
///
/// Below `xp[0]` returns `fp[0]`; at or above the last point returns the last
/// value. Repeated `xp` values are allowed: the right-most point not greater
/// than `x` starts the segment used. `xp` and `fp` must be the same length.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    debug_assert!(
        xp.windows(2).all(|w| w[0] <= w[1]),
        "interpolation points must be non-decreasing"
    );
    let Some(&last) = xp.last() else {
        return 0.0;
    };
    let n = xp.len();

    if x < xp[0] {
        return fp[0];
    }
    if x >= last {
        return fp[n - 1];
    }

    // x >= xp[0] guarantees at least one point qualifies; x < last guarantees
    // j + 1 is in range with xp[j + 1] > x >= xp[j].
    let j = xp.partition_point(|&b| b <= x) - 1;
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (fp[j], fp[j + 1]);
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}

/// Term for a stat where lower is better: the 5th-percentile boundary earns
/// the full weight, the 95th earns nothing.
pub fn inv_score(val: f64, boundaries: &Boundaries, weight: f64) -> f64 {
    interp(val, boundaries, &control_points(weight, Direction::LowerIsBetter))
}

/// Term for a stat where higher is better: the 95th-percentile boundary earns
/// the full weight, the 5th earns nothing.
pub fn pct_score(val: f64, boundaries: &Boundaries, weight: f64) -> f64 {
    interp(val, boundaries, &control_points(weight, Direction::HigherIsBetter))
}

/// Score one stat and render its log line, e.g. `"xwOBA → +12.5"`.
pub fn stat_term(
    label: &str,
    val: f64,
    boundaries: &Boundaries,
    weight: f64,
    direction: Direction,
) -> Contribution {
    let points = match direction {
        Direction::LowerIsBetter => inv_score(val, boundaries, weight),
        Direction::HigherIsBetter => pct_score(val, boundaries, weight),
    };
    Contribution {
        points,
        log: format!("{label} → +{points:.1}"),
    }
}
