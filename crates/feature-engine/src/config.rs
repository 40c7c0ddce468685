//! Extraction configuration
//!
//! Loaded from a TOML file, with `SYMFEAT_`-prefixed environment variables
//! layered on top (`SYMFEAT_PARALLEL=true`,
//! `SYMFEAT_WINDOWING__WINDOW_SIZE_SECS=5`,
//! `SYMFEAT_ENABLED_FEATURES="Chord Types,Mean Rhythmic Value"`).

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "SYMFEAT";

/// Window segmentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowingConfig {
    /// Extract per window; when false every feature is computed once
    pub enabled: bool,
    pub window_size_secs: f64,
    /// Fraction of a window shared with the next one, in [0, 1)
    pub overlap: f64,
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_size_secs: 10.0,
            overlap: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Features to extract; empty means every registered feature.
    /// Dependencies are added automatically.
    pub enabled_features: Vec<String>,
    pub windowing: WindowingConfig,
    /// Compute the windows of each feature on the rayon pool
    pub parallel: bool,
}

impl ExtractionConfig {
    /// Load from `path` plus environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        Self::load_with_prefix(path.as_ref(), ENV_PREFIX)
    }

    fn load_with_prefix(path: &Path, prefix: &str) -> Result<Self, EngineError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(environment(prefix))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, EngineError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let windowing = &self.windowing;
        if !(windowing.window_size_secs.is_finite() && windowing.window_size_secs > 0.0) {
            return Err(EngineError::Config(format!(
                "window_size_secs must be positive, got {}",
                windowing.window_size_secs
            )));
        }
        if !(0.0..1.0).contains(&windowing.overlap) {
            return Err(EngineError::Config(format!(
                "overlap must be in [0, 1), got {}",
                windowing.overlap
            )));
        }
        Ok(())
    }
}

/// `<PREFIX>_KEY`, with `__` separating nested keys
fn environment(prefix: &str) -> config::Environment {
    config::Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("enabled_features")
}
