//! View configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! window_width = 1440.0
//! window_height = 900.0
//! transition_ms = 500
//! easing = "cubic-in-out"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use usagemap_core::{Easing, Size};

/// Layout, timing and text settings for a [`UsageView`](crate::UsageView).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Host window width in pixels.
    pub window_width: f64,
    /// Host window height in pixels.
    pub window_height: f64,
    /// Horizontal chrome subtracted from the window width.
    pub margin_horizontal: f64,
    /// Vertical chrome subtracted from the window height.
    pub margin_vertical: f64,
    /// Zoom transition length.
    pub transition_ms: u64,
    /// Zoom transition length while the slow-motion modifier is held.
    pub slow_transition_ms: u64,
    /// Easing for zoom transitions.
    pub easing: Easing,
    /// Advance of one monospace column, used to measure labels.
    pub char_width: f64,
    /// Keep the treemap row arrangement when the value mode changes.
    pub sticky: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 800.0,
            margin_horizontal: 64.0,
            margin_vertical: 92.0,
            transition_ms: 750,
            slow_transition_ms: 7500,
            easing: Easing::CubicInOut,
            char_width: 7.0,
            sticky: true,
        }
    }
}

impl ViewConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid or a value is out of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Set the host window size.
    #[must_use]
    pub const fn with_window(mut self, width: f64, height: f64) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the nominal and slow-motion transition lengths.
    #[must_use]
    pub const fn with_durations(mut self, transition_ms: u64, slow_transition_ms: u64) -> Self {
        self.transition_ms = transition_ms;
        self.slow_transition_ms = slow_transition_ms;
        self
    }

    /// Set the transition easing.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("margin_horizontal", self.margin_horizontal),
            ("margin_vertical", self.margin_vertical),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if !self.char_width.is_finite() || self.char_width <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "char_width",
                value: self.char_width,
            });
        }
        if self.transition_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transition_ms",
                value: 0.0,
            });
        }
        if self.slow_transition_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "slow_transition_ms",
                value: 0.0,
            });
        }

        let viewport = self.viewport();
        if !viewport.width.is_finite() || viewport.width <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "window_width",
                value: self.window_width,
            });
        }
        if !viewport.height.is_finite() || viewport.height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "window_height",
                value: self.window_height,
            });
        }
        Ok(())
    }

    /// Drawing area left after subtracting the chrome margins from a window.
    /// Sides never go negative.
    #[must_use]
    pub fn viewport_for_window(&self, width: f64, height: f64) -> Size {
        Size::new(
            (width - self.margin_horizontal).max(0.0),
            (height - self.margin_vertical).max(0.0),
        )
    }

    /// Drawing area for the configured window.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport_for_window(self.window_width, self.window_height)
    }
}
