//! Demo render task
//!
//! Stands in for the graphics stack: draws an alternating checkerboard
//! through the same lock / fill / request path a real renderer uses.

use defmt::*;
use embassy_time::{Duration, Ticker};
use wristlcd_core::config::PanelGeometry;
use wristlcd_core::pattern::{self, CHECKER_CELL, SPLASH_OFF, SPLASH_ON};

use crate::channels::{DISPLAY, FRAME_DONE};

/// Frame interval in milliseconds
pub const RENDER_INTERVAL_MS: u64 = 1000;

/// How long to wait for the frame buffer before dropping a frame
pub const LOCK_TIMEOUT_MS: u64 = 50;

/// Render task - redraws once per interval
#[embassy_executor::task]
pub async fn render_task(geometry: PanelGeometry) {
    info!("Render task started");

    let mut ticker = Ticker::every(Duration::from_millis(RENDER_INTERVAL_MS));
    let mut invert = false;

    loop {
        ticker.next().await;

        let gate = &DISPLAY.gate;
        let Some(mut frame) = gate.lock_buffer(Duration::from_millis(LOCK_TIMEOUT_MS)).await else {
            continue;
        };
        pattern::checkerboard(
            frame.as_mut_slice(),
            &geometry,
            CHECKER_CELL,
            SPLASH_ON,
            SPLASH_OFF,
            invert,
        );
        gate.unlock_buffer(frame);

        FRAME_DONE.reset();
        gate.request_draw();
        FRAME_DONE.wait().await;
        invert = !invert;

        let stats = gate.stats().snapshot();
        trace!(
            "Frames {} (coalesced {}, dropped {}, stalls {})",
            stats.frames,
            stats.coalesced,
            stats.dropped,
            stats.stalls
        );
    }
}
