//! Display owning task
//!
//! Sole owner of the panel controller. Boots the panel, then serves draw
//! and reset requests posted through the draw gate.

use defmt::*;
use wristlcd_core::config::DisplayConfig;
use wristlcd_core::traits::{PanelIo, Passthrough};
use wristlcd_core::DisplayService;

use crate::board::Snowy;
use crate::channels::{DISPLAY, FRAME_DONE};

/// Display task - never returns
///
/// The renderer writes frames in panel order, so no scan conversion is
/// applied here.
#[embassy_executor::task]
pub async fn display_task(io: PanelIo<Snowy>, config: DisplayConfig, image: &'static [u8]) {
    info!("Display task started");

    let service = DisplayService::new(io, Passthrough, &DISPLAY, config, image);
    service.run(|| FRAME_DONE.signal(())).await
}
