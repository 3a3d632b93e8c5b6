//! Configuration types
//!
//! Board-agnostic configuration for the display subsystem. The firmware
//! starts from [`DisplayConfig::snowy`] and validates it before any pin is
//! touched.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wristlcd_protocol::SPLASH_SCENE;

/// Errors found while validating a [`DisplayConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Poll limit of zero would fail every wait immediately
    ZeroPollLimit,
    /// Poll interval of zero turns the waits into a spin
    ZeroPollInterval,
    /// Bring-up needs at least one attempt
    ZeroAttempts,
    /// A pin names a port or number that does not exist
    InvalidPin,
    /// Two functions are mapped to the same pin
    PinConflict,
    /// Geometry does not match the frame buffer it will drive
    FrameSizeMismatch { expected: usize, actual: usize },
}

/// Complete display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub geometry: PanelGeometry,
    pub pins: PinMap,
    pub timing: PanelTiming,
    /// Bootloader scene shown during bring-up
    pub splash_scene: u8,
}

impl DisplayConfig {
    /// Snowy board defaults
    pub const fn snowy() -> Self {
        Self {
            geometry: PanelGeometry::snowy(),
            pins: PinMap::snowy(),
            timing: PanelTiming::snowy(),
            splash_scene: SPLASH_SCENE,
        }
    }

    /// Check the configuration against a frame buffer of `buffer_len` bytes
    pub fn validate(&self, buffer_len: usize) -> Result<(), ConfigError> {
        if self.timing.poll_limit == 0 {
            return Err(ConfigError::ZeroPollLimit);
        }
        if self.timing.poll_interval_us == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.timing.bring_up_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if !self.pins.all().iter().all(PinConfig::is_valid) {
            return Err(ConfigError::InvalidPin);
        }
        if self.pins.has_conflicts() {
            return Err(ConfigError::PinConflict);
        }

        let expected = self.geometry.frame_len();
        if expected != buffer_len {
            return Err(ConfigError::FrameSizeMismatch {
                expected,
                actual: buffer_len,
            });
        }

        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::snowy()
    }
}
