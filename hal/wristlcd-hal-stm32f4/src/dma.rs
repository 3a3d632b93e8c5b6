//! DMA2 stream 5 frame path
//!
//! embassy-stm32 owns the DMA interrupt vectors, so the stream cannot be
//! serviced from a handler of our own. Instead the channel is owned by a
//! task on a high-priority interrupt executor: it waits for a job posted
//! by [`Spi6Bus::start_dma`](crate::Spi6Bus), runs the transfer, and on
//! completion hands a [`TransferStatus`] to the interrupt bridge. An
//! abort posted by [`Spi6Bus::abort_dma`](crate::Spi6Bus) stops the
//! running transfer instead. That task runs in the executor's interrupt,
//! above every thread-mode task.

use embassy_futures::select::{select, Either};
use embassy_stm32::dma::{Request, Transfer, TransferOptions};
use embassy_stm32::pac;
use embassy_stm32::peripherals::DMA2_CH5;
use embassy_stm32::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// SPI6_TX request line on DMA2 stream 5
const SPI6_TX_REQUEST: Request = 1;

/// A frame to stream: start address and length
#[derive(Clone, Copy)]
pub struct DmaJob {
    ptr: *const u8,
    len: usize,
}

// SAFETY: the job only carries the address of a buffer that stays locked
// by the display service until the transfer completes
unsafe impl Send for DmaJob {}

/// What the DMA task is asked to do next
#[derive(Clone, Copy)]
pub enum DmaCommand {
    Start(DmaJob),
    /// Stop the running transfer, if any
    Abort,
}

/// Mailbox between the byte-path bus and the DMA task
pub struct DmaJobs {
    next: Signal<CriticalSectionRawMutex, DmaCommand>,
}

impl DmaJobs {
    pub const fn new() -> Self {
        Self {
            next: Signal::new(),
        }
    }

    /// Post a frame; replaces a job that has not started yet
    pub fn post(&self, data: &[u8]) {
        self.next.signal(DmaCommand::Start(DmaJob {
            ptr: data.as_ptr(),
            len: data.len(),
        }));
    }

    /// Ask the DMA task to stop the running transfer
    pub fn abort(&self) {
        self.next.signal(DmaCommand::Abort);
    }

    pub async fn wait(&self) -> DmaCommand {
        self.next.wait().await
    }
}

impl Default for DmaJobs {
    fn default() -> Self {
        Self::new()
    }
}

/// SPI6 TX stream owner
pub struct FrameDma {
    channel: Peri<'static, DMA2_CH5>,
}

impl FrameDma {
    pub fn new(channel: Peri<'static, DMA2_CH5>) -> Self {
        Self { channel }
    }

    /// Stream `job`, stopping early if another command is posted first
    ///
    /// Returns the command that interrupted this transfer, if any.
    /// Dropping the embassy transfer disables the stream and waits for its
    /// enable bit to clear, so on return the buffer is no longer read.
    pub async fn run(&mut self, job: DmaJob, jobs: &DmaJobs) -> Option<DmaCommand> {
        let spi = pac::SPI6;
        spi.cr2().modify(|w| w.set_txdmaen(true));

        // SAFETY: `job` points into the frame buffer, which the display
        // service keeps locked until the bridge reports completion
        let frame = unsafe { core::slice::from_raw_parts(job.ptr, job.len) };
        let dr = spi.dr().as_ptr() as *mut u8;
        let transfer = unsafe {
            Transfer::new_write(
                self.channel.reborrow(),
                SPI6_TX_REQUEST,
                frame,
                dr,
                TransferOptions::default(),
            )
        };

        let preempted = match select(transfer, jobs.wait()).await {
            Either::First(()) => None,
            Either::Second(next) => Some(next),
        };

        spi.cr2().modify(|w| w.set_txdmaen(false));
        // RX is never read during a frame; clear the overrun it leaves
        let _ = spi.dr().read();
        let _ = spi.sr().read();

        preempted
    }
}

/// Completion view handed to the interrupt bridge
pub struct TransferStatus {
    complete: bool,
}

impl TransferStatus {
    /// Status for a transfer that ran to completion
    pub fn completed() -> Self {
        Self { complete: true }
    }
}

impl wristlcd_hal::DmaCompletion for TransferStatus {
    fn take_transfer_complete(&mut self) -> bool {
        core::mem::take(&mut self.complete)
    }

    fn tx_empty(&self) -> bool {
        pac::SPI6.sr().read().txe()
    }

    fn busy(&self) -> bool {
        pac::SPI6.sr().read().bsy()
    }
}
