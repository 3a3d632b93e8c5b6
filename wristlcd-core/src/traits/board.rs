//! Board description
//!
//! Groups the concrete HAL types a board uses for the panel link so the
//! controller takes one type parameter instead of seven.

use embedded_hal::delay::DelayNs;
use wristlcd_hal::{EdgeInterrupt, InputPin, OutputPin, SpiBus, Watchdog};

use super::Alert;
use crate::bus::BusTransport;

/// HAL types wired to the panel controller
pub trait PanelBoard {
    /// SPI master with TX DMA
    type Spi: SpiBus;
    /// Chip-select and reset outputs
    type Output: OutputPin;
    /// Reset-done and ready inputs
    type Input: InputPin;
    /// Edge interrupt on the ready line
    type ReadyIrq: EdgeInterrupt;
    /// Busy-wait delay
    type Delay: DelayNs;
    type Watchdog: Watchdog;
    type Alert: Alert;
}

/// Owned peripherals for one panel
pub struct PanelIo<B: PanelBoard> {
    pub bus: BusTransport<B::Spi, B::Output>,
    /// High once the controller has loaded its image
    pub reset_done: B::Input,
    /// Low once the selected scene is on the glass
    pub ready: B::Input,
    pub ready_irq: B::ReadyIrq,
    pub delay: B::Delay,
    pub watchdog: B::Watchdog,
    pub alert: B::Alert,
}
