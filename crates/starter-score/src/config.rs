// Configuration loading and parsing (config/scorer.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the config file under `config/` (and its template under `defaults/`).
pub const CONFIG_FILE: &str = "scorer.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// scorer.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub reference: ReferenceConfig,
    pub weights: ScoreWeights,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// League pitcher CSV loaded at startup.
    pub csv_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceConfig {
    /// Pitch count a pitcher needs to join the reference population.
    pub min_total_pitches: u32,
}

impl ReferenceConfig {
    pub fn min_total_pitches(&self) -> f64 {
        f64::from(self.min_total_pitches)
    }
}

/// Maximum points each interpolated stat can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreWeights {
    pub xwoba: f64,
    pub barrel_rate: f64,
    pub xslg: f64,
    pub whiff: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            xwoba: 25.0,
            barrel_rate: 20.0,
            xslg: 15.0,
            whiff: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/scorer.toml` relative to `base_dir`.
///
/// This does not copy defaults; prefer `load_config()` which does.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/scorer.toml` from `defaults/scorer.toml` if it is absent.
///
/// Returns the path written, or `None` when a config file already exists.
/// An existing file is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let template = base_dir.join("defaults").join(CONFIG_FILE);
    if !template.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} under config/ or defaults/ in {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("copying {} to {}: {e}", template.display(), target.display()),
    };
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(copy_err)?;
    }
    std::fs::copy(&template, &target).map_err(copy_err)?;
    info!("Seeded {} from defaults", target.display());
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory,
/// copying defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.csv_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.csv_path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.reference.min_total_pitches == 0 {
        return Err(ConfigError::ValidationError {
            field: "reference.min_total_pitches".into(),
            message: "must be greater than 0".into(),
        });
    }

    let w = &config.weights;
    let weight_fields: &[(&str, f64)] = &[
        ("weights.xwoba", w.xwoba),
        ("weights.barrel_rate", w.barrel_rate),
        ("weights.xslg", w.xslg),
        ("weights.whiff", w.whiff),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite number > 0, got {val}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
