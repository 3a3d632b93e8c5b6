//! Active-low chip-select

use wristlcd_hal::OutputPin;

/// Chip-select line
///
/// The pin is electrically inverted: `select(true)` drives it low and
/// addresses the controller.
pub struct ChipSelect<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> ChipSelect<P> {
    /// Wrap a pin and leave the device deselected
    pub fn new(mut pin: P) -> Self {
        pin.set_high();
        Self { pin }
    }

    /// Address (`true`) or release (`false`) the controller
    pub fn select(&mut self, enabled: bool) {
        self.pin.set_state(!enabled);
    }

    /// Check if the controller is currently addressed
    pub fn is_selected(&self) -> bool {
        !self.pin.is_set_high()
    }

    /// Access the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}
