//! Engine configuration
//!
//! Caller-tunable defaults loaded from TOML. The classifier thresholds and the
//! ADL table are clinical constants and live in their own modules.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::EngineError;
use crate::history::DEFAULT_HISTORY_WINDOW;

/// Step target used when the caller supplies none
pub const DEFAULT_STEP_TARGET: f64 = 2000.0;

/// Protein target per kg body weight (grams)
pub const DEFAULT_PROTEIN_G_PER_KG: f64 = 1.5;

/// Energy target per kg body weight (kcal)
pub const DEFAULT_CALORIES_KCAL_PER_KG: f64 = 27.5;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Daily step target when none is given explicitly
    pub default_step_target: f64,
    /// Number of days kept in the score history
    pub history_window_days: usize,
    /// Protein grams per kg body weight
    pub protein_g_per_kg: f64,
    /// Calories per kg body weight
    pub calories_kcal_per_kg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_step_target: DEFAULT_STEP_TARGET,
            history_window_days: DEFAULT_HISTORY_WINDOW,
            protein_g_per_kg: DEFAULT_PROTEIN_G_PER_KG,
            calories_kcal_per_kg: DEFAULT_CALORIES_KCAL_PER_KG,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::EncodingError(e.to_string()))
    }

    /// Check that every value is usable as a denominator or window size
    pub fn validate(&self) -> Result<(), EngineError> {
        let positive = [
            ("default_step_target", self.default_step_target),
            ("protein_g_per_kg", self.protein_g_per_kg),
            ("calories_kcal_per_kg", self.calories_kcal_per_kg),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::ConfigError(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.history_window_days == 0 {
            return Err(EngineError::ConfigError(
                "history_window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
