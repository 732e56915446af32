//! Configuration for the timeline store and history engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::effect::EffectId;
use crate::error::ImportError;
use crate::types::MAX_BRIGHTNESS;

/// Store-level configuration.
///
/// Every field has a default, so a partial JSON file only overrides what it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Maximum number of undo entries kept (oldest are evicted first).
    pub history_depth: usize,
    /// Duration given to blocks created by add/fill.
    pub default_block_duration_millis: f64,
    /// Floor applied to every duration update. Must be positive.
    pub min_block_duration_millis: f64,
    /// Effect given to new blocks.
    pub default_effect: EffectId,
    /// Starting brightness given to new blocks.
    pub default_brightness: i32,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            default_block_duration_millis: 500.0,
            min_block_duration_millis: 20.0,
            default_effect: EffectId::STATIC,
            default_brightness: MAX_BRIGHTNESS,
        }
    }
}

impl ComposerConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ImportError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), "Loaded composer config");
        Ok(config)
    }

    /// Check the invariants the store relies on.
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.history_depth == 0 {
            return Err(ImportError::Format {
                reason: "history_depth must be at least 1".to_string(),
            });
        }
        if !(self.min_block_duration_millis > 0.0) {
            return Err(ImportError::Format {
                reason: format!(
                    "min_block_duration_millis must be > 0, got {}",
                    self.min_block_duration_millis
                ),
            });
        }
        if !(self.default_block_duration_millis >= self.min_block_duration_millis) {
            return Err(ImportError::Format {
                reason: format!(
                    "default_block_duration_millis ({}) is below the minimum ({})",
                    self.default_block_duration_millis, self.min_block_duration_millis
                ),
            });
        }
        if !(0..=MAX_BRIGHTNESS).contains(&self.default_brightness) {
            return Err(ImportError::Format {
                reason: format!("default_brightness out of range: {}", self.default_brightness),
            });
        }
        Ok(())
    }
}
