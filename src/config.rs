//! Controller configuration, loadable from JSON handed over by the host.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{DEFAULT_HEIGHT_PX, DEFAULT_WIDTH_PX, HANDLE_SIZE_PX, MAX_SIZE_PX, MIN_SIZE_PX};
use crate::geom::{Bounds, Size};
use crate::input::LockModifier;

/// Selector of the editor's render root; the handle lives in its parent.
pub const DEFAULT_CONTAINER_SELECTOR: &str = ".ProseMirror";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid resize config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("min_size {min} exceeds max_size {max}")]
    InvertedBounds { min: f64, max: f64 },
    #[error("{field} {value} is outside the supported range [{min}, {max}]", min = MIN_SIZE_PX, max = MAX_SIZE_PX)]
    OutsideLimits { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub min_size: f64,
    pub max_size: f64,
    pub handle_size: f64,
    pub default_width: f64,
    pub default_height: f64,
    pub lock_modifier: LockModifier,
    pub container_selector: String,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE_PX,
            max_size: MAX_SIZE_PX,
            handle_size: HANDLE_SIZE_PX,
            default_width: DEFAULT_WIDTH_PX,
            default_height: DEFAULT_HEIGHT_PX,
            lock_modifier: LockModifier::default(),
            container_selector: DEFAULT_CONTAINER_SELECTOR.to_owned(),
        }
    }
}

impl ResizeConfig {
    /// Parse and validate a JSON config. Absent fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every size is finite and positive, and that the bounds are
    /// ordered and lie within [`MIN_SIZE_PX`, `MAX_SIZE_PX`]. A config may
    /// narrow the size range but never widen it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_size", self.min_size),
            ("max_size", self.max_size),
            ("handle_size", self.handle_size),
            ("default_width", self.default_width),
            ("default_height", self.default_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [("min_size", self.min_size), ("max_size", self.max_size)] {
            if !(MIN_SIZE_PX..=MAX_SIZE_PX).contains(&value) {
                return Err(ConfigError::OutsideLimits { field, value });
            }
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::InvertedBounds { min: self.min_size, max: self.max_size });
        }
        Ok(())
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min_size, self.max_size)
    }

    /// Start size for elements with neither an explicit nor a natural size.
    #[must_use]
    pub fn fallback_size(&self) -> Size {
        Size::new(self.default_width, self.default_height)
    }
}
