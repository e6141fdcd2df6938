// Season-aggregate pitcher stats loaded from a league CSV export.
//
// Every numeric cell is coerced the same way: trimmed text parsed as a float,
// with blank, unparseable, or non-finite text held as missing (`None`).
// Missing cells never become zeros; scoring decides what to do with them.

use crate::data::names::normalize_name;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Pitch types tracked as per-pitch usage columns in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchType {
    FourSeam,
    Sinker,
    Cutter,
    Slider,
    Changeup,
    Curve,
    Splitter,
}

impl PitchType {
    /// All tracked pitch types, in the order their usage is stored.
    pub const ALL: [PitchType; 7] = [
        PitchType::FourSeam,
        PitchType::Sinker,
        PitchType::Cutter,
        PitchType::Slider,
        PitchType::Changeup,
        PitchType::Curve,
        PitchType::Splitter,
    ];

    /// The dataset column holding this pitch type's usage percentage.
    pub fn column(&self) -> &'static str {
        match self {
            PitchType::FourSeam => "4-Seam",
            PitchType::Sinker => "Sinker",
            PitchType::Cutter => "Cutter",
            PitchType::Slider => "Slider",
            PitchType::Changeup => "Changeup",
            PitchType::Curve => "Curve",
            PitchType::Splitter => "Splitter",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One pitcher's season aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct PitcherRow {
    /// Display name as it appears in the dataset (trimmed).
    pub player: String,
    /// Lookup key produced by [`normalize_name`].
    pub normalized_player: String,
    pub xwoba: Option<f64>,
    pub xslg: Option<f64>,
    pub barrels_per_bbe_percent: Option<f64>,
    pub swing_miss_percent: Option<f64>,
    pub bb_percent: Option<f64>,
    pub total_pitches: Option<f64>,
    /// Usage percentage per pitch type, indexed in [`PitchType::ALL`] order.
    pub pitch_usage: [Option<f64>; 7],
}

impl PitcherRow {
    /// Stored usage percentage for one pitch type, if present and numeric.
    pub fn usage(&self, pitch: PitchType) -> Option<f64> {
        self.pitch_usage[pitch.index()]
    }

    /// The pitch types this pitcher actually throws according to the dataset.
    pub fn pitch_mix(&self) -> PitchMix {
        let entries = PitchType::ALL
            .iter()
            .filter_map(|&pitch| match self.usage(pitch) {
                Some(pct) if pct > 0.0 => Some((pitch, pct)),
                _ => None,
            })
            .collect();
        PitchMix { entries }
    }
}

/// Stored pitch usage restricted to tracked pitch types with a positive share.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchMix {
    entries: Vec<(PitchType, f64)>,
}

impl PitchMix {
    pub fn entries(&self) -> &[(PitchType, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Combined usage of the two most-thrown pitches. A single-pitch mix
    /// returns that pitch's usage; an empty mix returns 0.0.
    pub fn top_two_total(&self) -> f64 {
        let mut shares: Vec<f64> = self.entries.iter().map(|&(_, pct)| pct).collect();
        shares.sort_by(|a, b| b.total_cmp(a));
        shares.iter().take(2).sum()
    }
}

/// Every row of an uploaded league CSV, in input order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<PitcherRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the row whose normalized name matches `name` after normalization.
    ///
    /// When several rows share a key, the first in input order wins.
    pub fn find_player(&self, name: &str) -> Option<&PitcherRow> {
        let key = normalize_name(name);
        let mut matches = self.rows.iter().filter(|r| r.normalized_player == key);
        let first = matches.next()?;
        let extra = matches.count();
        if extra > 0 {
            warn!(
                "{} rows match '{}'; using the first ('{}')",
                extra + 1,
                key,
                first.player
            );
        }
        Some(first)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column `{column}` is missing from the CSV header")]
    MissingColumn { column: &'static str },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "player",
    "xwoba",
    "xslg",
    "barrels_per_bbe_percent",
    "swing_miss_percent",
    "bb_percent",
    "total_pitches",
];

/// Raw league CSV row. Cells are kept as text so each one can be coerced on
/// its own; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawPitcherRow {
    player: String,
    #[serde(default)]
    xwoba: Option<String>,
    #[serde(default)]
    xslg: Option<String>,
    #[serde(default)]
    barrels_per_bbe_percent: Option<String>,
    #[serde(default)]
    swing_miss_percent: Option<String>,
    #[serde(default)]
    bb_percent: Option<String>,
    #[serde(default)]
    total_pitches: Option<String>,
    #[serde(rename = "4-Seam", default)]
    four_seam: Option<String>,
    #[serde(rename = "Sinker", default)]
    sinker: Option<String>,
    #[serde(rename = "Cutter", default)]
    cutter: Option<String>,
    #[serde(rename = "Slider", default)]
    slider: Option<String>,
    #[serde(rename = "Changeup", default)]
    changeup: Option<String>,
    #[serde(rename = "Curve", default)]
    curve: Option<String>,
    #[serde(rename = "Splitter", default)]
    splitter: Option<String>,
}

impl RawPitcherRow {
    fn into_row(self) -> PitcherRow {
        let player = self.player.trim().to_string();
        PitcherRow {
            normalized_player: normalize_name(&player),
            player,
            xwoba: coerce_numeric(self.xwoba.as_deref()),
            xslg: coerce_numeric(self.xslg.as_deref()),
            barrels_per_bbe_percent: coerce_numeric(self.barrels_per_bbe_percent.as_deref()),
            swing_miss_percent: coerce_numeric(self.swing_miss_percent.as_deref()),
            bb_percent: coerce_numeric(self.bb_percent.as_deref()),
            total_pitches: coerce_numeric(self.total_pitches.as_deref()),
            // Same order as PitchType::ALL.
            pitch_usage: [
                coerce_numeric(self.four_seam.as_deref()),
                coerce_numeric(self.sinker.as_deref()),
                coerce_numeric(self.cutter.as_deref()),
                coerce_numeric(self.slider.as_deref()),
                coerce_numeric(self.changeup.as_deref()),
                coerce_numeric(self.curve.as_deref()),
                coerce_numeric(self.splitter.as_deref()),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a cell as a finite float; anything else counts as missing.
fn coerce_numeric(cell: Option<&str>) -> Option<f64> {
    let value: f64 = cell?.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Load a league dataset from any CSV reader.
///
/// Fails if the header cannot be read or lacks a required column. Records
/// shorter than the header keep their row, with the absent cells missing.
/// Records that cannot be decoded at all are skipped with a warning.
pub fn load_dataset_from_reader<R: Read>(rdr: R) -> Result<Dataset, DatasetError> {
    // Exports often drop empty trailing cells; short records read as missing.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn { column });
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawPitcherRow>() {
        match result {
            Ok(raw) => rows.push(raw.into_row()),
            Err(e) => {
                warn!("skipping malformed pitcher row: {}", e);
            }
        }
    }

    Ok(Dataset { rows })
}

/// Load a league dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let dataset = load_dataset_from_reader(file)?;
    info!("Loaded {} pitcher rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
