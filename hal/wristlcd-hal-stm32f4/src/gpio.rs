//! GPIO adapters for STM32F4
//!
//! Thread-side pins wrap the embassy drivers. The interrupt side gets a
//! [`RawOutput`] for the same chip-select pin that only touches BSRR, so
//! both can exist without sharing the embassy `Output`.

use embassy_stm32::gpio::{Input, Output};
use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals;

/// Push-pull output driven through embassy
pub struct PanelOutput(pub Output<'static>);

impl wristlcd_hal::OutputPin for PanelOutput {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Input read through embassy
pub struct PanelInput(pub Input<'static>);

impl wristlcd_hal::InputPin for PanelInput {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// GPIO register block for a port index (A = 0)
pub(crate) fn port_block(port: u8) -> Option<pac::gpio::Gpio> {
    let block = match port {
        0 => pac::GPIOA,
        1 => pac::GPIOB,
        2 => pac::GPIOC,
        3 => pac::GPIOD,
        4 => pac::GPIOE,
        5 => pac::GPIOF,
        6 => pac::GPIOG,
        7 => pac::GPIOH,
        8 => pac::GPIOI,
        9 => pac::GPIOJ,
        10 => pac::GPIOK,
        _ => return None,
    };
    Some(block)
}

/// Output that writes the set/reset register directly
///
/// Usable from interrupt context. The pin must already be configured as
/// an output by its thread-side owner.
pub struct RawOutput {
    block: pac::gpio::Gpio,
    pin: usize,
}

impl RawOutput {
    /// Handle for `port` (A = 0) pin `pin`; `None` if either is out of range
    pub fn new(port: u8, pin: u8) -> Option<Self> {
        if pin > 15 {
            return None;
        }
        Some(Self {
            block: port_block(port)?,
            pin: pin as usize,
        })
    }
}

impl wristlcd_hal::OutputPin for RawOutput {
    fn set_high(&mut self) {
        self.block.bsrr().write(|w| w.set_bs(self.pin, true));
    }

    fn set_low(&mut self) {
        self.block.bsrr().write(|w| w.set_br(self.pin, true));
    }

    fn is_set_high(&self) -> bool {
        self.block.odr().read().odr(self.pin) == vals::Odr::HIGH
    }
}
