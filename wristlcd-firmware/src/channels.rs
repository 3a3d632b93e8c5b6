//! Inter-task communication
//!
//! Statics shared between the display, DMA and render tasks and the
//! interrupt handlers. Uses embassy-sync primitives throughout.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use wristlcd_core::DisplayContext;
use wristlcd_hal_stm32f4::DmaJobs;
use wristlcd_protocol::FRAME_BUFFER_SIZE;

use crate::tasks::VibratePulse;

/// Channel capacity for queued vibration pulses
const VIBRATE_CHANNEL_SIZE: usize = 4;

/// Display state, frame buffer and draw request slot
pub static DISPLAY: DisplayContext<FRAME_BUFFER_SIZE> = DisplayContext::new();

/// Frames handed from the SPI6 bus to the DMA task
pub static DMA_JOBS: DmaJobs = DmaJobs::new();

/// Signal that a requested frame has reached the panel
pub static FRAME_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Vibration requests (fire and forget)
pub static VIBRATE: Channel<CriticalSectionRawMutex, VibratePulse, VIBRATE_CHANNEL_SIZE> =
    Channel::new();
