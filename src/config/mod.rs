//! TOML-based configuration.
//!
//! Example configuration:
//! ```toml
//! cardinality_threshold = 100000
//! row_dimension_cap = 3
//! level_sample_size = 50
//!
//! [classifier]
//! variable_marker = "VARIABLE"
//! group_marker = "APARTADO"
//! measure_marker = "MEASURE"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Tuning knobs for the interactive query-building core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Estimated row count above which a non-fatal advisory is emitted.
    pub cardinality_threshold: u64,

    /// Maximum simultaneous CROSSJOIN axes. A usability cap, not an MDX
    /// limitation.
    pub row_dimension_cap: usize,

    /// How many of the longest unique names to sample for depth inference.
    pub level_sample_size: usize,

    /// Markers for the domain-specific two-tier grouping classifier.
    pub classifier: ClassifierSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cardinality_threshold: default_cardinality_threshold(),
            row_dimension_cap: default_row_dimension_cap(),
            level_sample_size: default_level_sample_size(),
            classifier: ClassifierSettings::default(),
        }
    }
}

fn default_cardinality_threshold() -> u64 {
    100_000
}

fn default_row_dimension_cap() -> usize {
    3
}

fn default_level_sample_size() -> usize {
    50
}

/// Substring markers identifying the variable-carrying pseudo-dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Marker on the dimension that carries statistical variables.
    pub variable_marker: String,
    /// Marker on the hierarchy that carries the two-tier grouping.
    pub group_marker: String,
    /// Marker on the measure pseudo-dimension.
    pub measure_marker: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            variable_marker: "VARIABLE".to_string(),
            group_marker: "APARTADO".to_string(),
            measure_marker: "MEASURE".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load from a path if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
