//! GPIO pin abstractions
//!
//! The panel controller uses two outputs (chip-select, reset) and two
//! inputs (reset-done, ready). Polarity is handled one level up, these
//! traits only speak electrical levels.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// External interrupt line attached to an input pin
///
/// Handlers run in interrupt context and must not do more than
/// acknowledge the edge. The thread side only unmasks the line.
pub trait EdgeInterrupt {
    /// Check whether an edge is latched for this line
    fn is_pending(&self) -> bool;

    /// Clear the latched edge
    fn clear_pending(&mut self);

    /// Unmask the line so edges raise the interrupt
    fn enable(&mut self);
}
