//! Embassy async tasks
//!
//! The display and DMA tasks run on the high-priority interrupt executor;
//! the rest run in thread mode and talk to them through [`crate::channels`].

pub mod display;
pub mod dma;
pub mod render;
pub mod vibrate;
pub mod watchdog;

pub use display::display_task;
pub use dma::dma_task;
pub use render::render_task;
pub use vibrate::{vibrate_task, QueuedVibration, VibratePulse};
pub use watchdog::watchdog_task;
