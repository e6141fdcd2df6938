// Bracketed bonus/penalty rules: walk rate, pitch concentration, pitch
// diversity, and workload.
//
// Each rule checks its brackets from best to worst and applies only the first
// match, so at most one log line comes out of a rule per query.

/// One scored item: the points it adds (negative for penalties) and the log
/// line explaining it.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub points: f64,
    pub log: String,
}

impl Contribution {
    fn new(points: f64, log: String) -> Self {
        Contribution { points, log }
    }
}

// ---------------------------------------------------------------------------
// Bracket tables
// ---------------------------------------------------------------------------

/// (upper bound on BB%, bonus). Bounds are inclusive.
const WALK_BRACKETS: [(f64, f64); 5] = [
    (5.0, 15.0),
    (7.0, 12.0),
    (9.0, 9.0),
    (11.0, 6.0),
    (13.0, 3.0),
];

/// (minimum combined top-two usage %, penalty).
const CONCENTRATION_BRACKETS: [(f64, f64); 5] = [
    (75.0, 5.0),
    (70.0, 4.0),
    (65.0, 3.0),
    (60.0, 2.0),
    (55.0, 1.0),
];

/// (minimum total pitches, bonus).
const WORKLOAD_BRACKETS: [(f64, f64); 3] = [(2500.0, 5.0), (1500.0, 3.0), (800.0, 1.0)];

/// Usage share a typed pitch needs to count toward diversity.
pub const DIVERSITY_MIN_SHARE: f64 = 15.0;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Walk-rate bonus. Always produces a line, including the zero bracket.
pub fn walk_rate(bb_percent: f64) -> Contribution {
    WALK_BRACKETS
        .iter()
        .find(|&&(max, _)| bb_percent <= max)
        .map(|&(max, bonus)| Contribution::new(bonus, format!("BB% ≤{max} → +{bonus}")))
        .unwrap_or_else(|| Contribution::new(0.0, "BB% >13 → +0".to_string()))
}

/// Penalty for leaning on two pitches. `top_two_usage` is the combined usage
/// of the two most-thrown pitches.
pub fn pitch_concentration(top_two_usage: f64) -> Option<Contribution> {
    CONCENTRATION_BRACKETS
        .iter()
        .find(|&&(min, _)| top_two_usage >= min)
        .map(|&(min, penalty)| {
            Contribution::new(-penalty, format!("상위 2개 구종 ≥{min}% → -{penalty}"))
        })
}

/// Bonus for the number of pitches thrown at least [`DIVERSITY_MIN_SHARE`]
/// percent of the time.
pub fn pitch_diversity(pitches_over_share: usize) -> Option<Contribution> {
    let (points, log) = match pitches_over_share {
        0 => return None,
        1 => (1.0, "다양성 1개 → +1"),
        2 => (3.0, "다양성 2개 → +3"),
        _ => (5.0, "다양성 ≥3개 → +5"),
    };
    Some(Contribution::new(points, log.to_string()))
}

/// Bonus for season volume.
pub fn workload(total_pitches: f64) -> Option<Contribution> {
    WORKLOAD_BRACKETS
        .iter()
        .find(|&&(min, _)| total_pitches >= min)
        .map(|&(min, bonus)| Contribution::new(bonus, format!("투구 수 ≥{min} → +{bonus}")))
}
