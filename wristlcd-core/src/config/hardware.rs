//! Hardware configuration types
//!
//! Pin assignments for the panel controller link. Polarity lives here,
//! the HAL traits only deal in electrical levels.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO port letter ('A'..='K')
    pub port: char,
    /// Pin number within the port (0-15)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(port: char, pin: u8) -> Self {
        Self {
            port,
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(port: char, pin: u8) -> Self {
        Self {
            port,
            pin,
            inverted: true,
        }
    }

    /// Zero-based port index (A = 0)
    pub const fn port_index(&self) -> u8 {
        (self.port as u8).wrapping_sub(b'A')
    }

    /// Check that the port letter and pin number exist on the part
    pub fn is_valid(&self) -> bool {
        matches!(self.port, 'A'..='K') && self.pin < 16
    }
}

/// Pins wired to the panel controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinMap {
    /// Chip-select, active-low
    pub chip_select: PinConfig,
    /// Controller reset line
    pub reset: PinConfig,
    /// Reset-done (CDONE) input, high once the controller has loaded
    pub reset_done: PinConfig,
    /// Ready (INTN) input, active-low
    pub ready: PinConfig,
    /// SPI clock
    pub sck: PinConfig,
    /// SPI data in
    pub miso: PinConfig,
    /// SPI data out
    pub mosi: PinConfig,
}

impl PinMap {
    /// Wiring on the snowy board
    pub const fn snowy() -> Self {
        Self {
            chip_select: PinConfig::inverted('G', 8),
            reset: PinConfig::new('G', 15),
            reset_done: PinConfig::new('G', 9),
            ready: PinConfig::inverted('G', 10),
            sck: PinConfig::new('G', 13),
            miso: PinConfig::new('G', 12),
            mosi: PinConfig::new('G', 14),
        }
    }

    /// All pins, for validation and logging
    pub fn all(&self) -> [PinConfig; 7] {
        [
            self.chip_select,
            self.reset,
            self.reset_done,
            self.ready,
            self.sck,
            self.miso,
            self.mosi,
        ]
    }

    /// Check that no two functions share a pin
    pub fn has_conflicts(&self) -> bool {
        let pins = self.all();
        pins.iter().enumerate().any(|(i, a)| {
            pins[i + 1..]
                .iter()
                .any(|b| a.port == b.port && a.pin == b.pin)
        })
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::snowy()
    }
}
