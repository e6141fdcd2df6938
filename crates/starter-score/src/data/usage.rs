// Hand-typed pitch usage, e.g. "4-Seam:51.1, Slider:32.6, Curve:10".
//
// Labels are free text and are not checked against the dataset's pitch
// columns. Values are taken as given: no clamping, no normalization to 100.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UsageParseError {
    #[error("pitch usage input is empty")]
    Empty,

    #[error("entry `{entry}` is not in `Label:value` form")]
    MalformedEntry { entry: String },

    #[error("usage value `{value}` for `{label}` is not a finite number")]
    InvalidValue { label: String, value: String },
}

/// Parsed label → usage percentage pairs, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchUsage {
    entries: Vec<(String, f64)>,
}

impl PitchUsage {
    /// Parse a comma-separated list of `Label:value` pairs.
    ///
    /// Whitespace around labels and values is trimmed. The whole input is
    /// rejected if any entry lacks exactly one colon or has a value that is
    /// not a finite float. A repeated label keeps its first position but
    /// takes the later value.
    pub fn parse(input: &str) -> Result<Self, UsageParseError> {
        if input.trim().is_empty() {
            return Err(UsageParseError::Empty);
        }

        let mut usage = PitchUsage::default();
        for item in input.split(',') {
            let mut parts = item.split(':');
            let (label, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(label), Some(value), None) => (label.trim(), value.trim()),
                _ => {
                    return Err(UsageParseError::MalformedEntry {
                        entry: item.trim().to_string(),
                    })
                }
            };

            let pct = value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| UsageParseError::InvalidValue {
                    label: label.to_string(),
                    value: value.to_string(),
                })?;

            usage.insert(label, pct);
        }
        Ok(usage)
    }

    fn insert(&mut self, label: &str, pct: f64) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 = pct,
            None => self.entries.push((label.to_string(), pct)),
        }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, pct)| pct)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct labels used at least `min_share` percent.
    pub fn count_at_least(&self, min_share: f64) -> usize {
        self.entries.iter().filter(|&&(_, pct)| pct >= min_share).count()
    }
}

impl FromStr for PitchUsage {
    type Err = UsageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PitchUsage::parse(s)
    }
}
