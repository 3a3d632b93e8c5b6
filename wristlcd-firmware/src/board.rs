//! Snowy board description
//!
//! Ties the STM32F4 HAL adapters to the panel controller.

use embassy_time::Delay;
use wristlcd_core::traits::PanelBoard;
use wristlcd_hal_stm32f4::{ExtiLine, IwdgReload, PanelInput, PanelOutput, Spi6Bus};

use crate::tasks::QueuedVibration;

/// Panel link as wired on snowy
pub struct Snowy;

impl PanelBoard for Snowy {
    type Spi = Spi6Bus;
    type Output = PanelOutput;
    type Input = PanelInput;
    type ReadyIrq = ExtiLine;
    type Delay = Delay;
    type Watchdog = IwdgReload;
    type Alert = QueuedVibration;
}
