//! Runtime settings for the canvas, parsed from a JSON object supplied by the page.
//!
//! Every field has a default, so the host may pass a partial object or nothing.
//! Unknown keys are rejected, so a misspelled setting falls back to defaults
//! with a warning instead of being silently ignored.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    ASSETS_URL, IMAGE_DROP_X, IMAGE_DROP_Y, ITEM_FOOTPRINT_PX, STORAGE_KEY, TEXT_DROP_X, TEXT_DROP_Y, UPLOAD_FIELD,
    UPLOAD_URL,
};
use crate::geom::Point;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid canvas config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("item footprint must be finite and non-negative, got {0}")]
    InvalidFootprint(f64),
    #[error("unknown log level: {0}")]
    InvalidLogLevel(String),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub storage_key: String,
    pub item_footprint: f64,
    pub text_drop: Point,
    pub image_drop: Point,
    pub assets_url: String,
    pub upload_url: String,
    pub upload_field: String,
    pub log_level: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_owned(),
            item_footprint: ITEM_FOOTPRINT_PX,
            text_drop: Point::new(TEXT_DROP_X, TEXT_DROP_Y),
            image_drop: Point::new(IMAGE_DROP_X, IMAGE_DROP_Y),
            assets_url: ASSETS_URL.to_owned(),
            upload_url: UPLOAD_URL.to_owned(),
            upload_field: UPLOAD_FIELD.to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed JSON or mistyped fields, and a specific
    /// variant for values that parse but are unusable.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse `raw` if present, falling back to defaults (with a warning) on any error.
    #[must_use]
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default canvas config");
                Self::default()
            }
        }
    }

    /// The configured log level.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLogLevel` if the name is not a `log` level.
    pub fn level(&self) -> Result<log::Level, ConfigError> {
        self.log_level
            .parse::<log::Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.item_footprint.is_finite() || self.item_footprint < 0.0 {
            return Err(ConfigError::InvalidFootprint(self.item_footprint));
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        self.level()?;
        Ok(())
    }
}
