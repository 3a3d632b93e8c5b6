//! Frame DMA task
//!
//! Owns DMA2 stream 5. Streams each frame posted by the SPI6 bus and
//! reports how it ended to the interrupt bridge, which releases
//! chip-select and wakes the display task.

use defmt::*;
use wristlcd_core::bus::ChipSelect;
use wristlcd_hal_stm32f4::{DmaCommand, FrameDma, RawOutput, TransferStatus};

use crate::channels::{DISPLAY, DMA_JOBS};

/// DMA task - runs on the high-priority executor next to the display task
#[embassy_executor::task]
pub async fn dma_task(mut dma: FrameDma, mut cs: ChipSelect<RawOutput>) {
    info!("DMA task started");

    let mut command = DMA_JOBS.wait().await;
    loop {
        let job = match command {
            DmaCommand::Start(job) => job,
            DmaCommand::Abort => {
                // Transfer already finished and was reported
                trace!("Abort with no frame streaming");
                command = DMA_JOBS.wait().await;
                continue;
            }
        };

        command = match dma.run(job, &DMA_JOBS).await {
            None => {
                let mut status = TransferStatus::completed();
                DISPLAY.bridge.on_transfer_complete(&mut status, &mut cs);
                DMA_JOBS.wait().await
            }
            Some(DmaCommand::Abort) => {
                warn!("Frame transfer aborted");
                DISPLAY.bridge.on_transfer_aborted(&mut cs);
                DMA_JOBS.wait().await
            }
            Some(next) => {
                warn!("Frame transfer pre-empted");
                next
            }
        };
    }
}
