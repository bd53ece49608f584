//! Editor configuration.

use crate::error::{ConfigError, ConfigResult};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Font size of emoji in the palette, in screen points.
/// Dropped emoji keep this on-screen size at the current zoom.
pub const DEFAULT_PALETTE_EMOJI_SIZE: f64 = 40.0;

/// Maximum number of undo states to keep.
pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// Tunables for a [`Canvas`](crate::Canvas).
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// On-screen size of emoji dropped from the palette.
    pub palette_emoji_size: f64,
    /// Undo history depth. Zero disables undo.
    pub undo_limit: usize,
    /// Initial viewport size in screen points.
    pub viewport_size: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            palette_emoji_size: DEFAULT_PALETTE_EMOJI_SIZE,
            undo_limit: DEFAULT_UNDO_LIMIT,
            viewport_size: Size::new(800.0, 600.0),
        }
    }
}

/// Viewport sizes must be finite and non-negative.
pub(crate) fn is_valid_viewport_size(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width >= 0.0 && size.height >= 0.0
}

impl EditorConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {:?}", path);
        Ok(config)
    }

    /// Check that sizes are positive and finite.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.palette_emoji_size.is_finite() && self.palette_emoji_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "palette_emoji_size must be positive, got {}",
                self.palette_emoji_size
            )));
        }
        if !is_valid_viewport_size(self.viewport_size) {
            let Size { width, height } = self.viewport_size;
            return Err(ConfigError::Invalid(format!(
                "viewport_size must be non-negative, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }
}
