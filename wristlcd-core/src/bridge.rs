//! Interrupt bridge
//!
//! The only display code that runs in interrupt context. It turns the DMA
//! stream's transfer-complete interrupt into a wake-up of the owning task
//! and is the second of the two writers of the display state.
//!
//! Each armed transfer ends in exactly one report, either a completion or
//! an abort confirmation. Reports for a transfer that is not armed are
//! dropped, so a late interrupt can never wake a wait meant for a later
//! frame.
//!
//! Nothing here blocks beyond polling the SPI status flags for the last
//! byte, and nothing allocates.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};
use wristlcd_hal::{DmaCompletion, EdgeInterrupt, OutputPin};

use crate::bus::ChipSelect;
use crate::state::{DisplayState, Event, StateCell};

/// How an armed transfer ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferEnd {
    /// Every byte left the shift register
    Complete,
    /// The stream was stopped on request; the buffer is free again
    Aborted,
}

/// Completion handoff between the DMA interrupt and the owning task
pub struct InterruptBridge {
    state: StateCell,
    done: Signal<CriticalSectionRawMutex, TransferEnd>,
    in_flight: AtomicBool,
    completions: AtomicU32,
    ready_edges: AtomicU32,
}

impl InterruptBridge {
    pub const fn new() -> Self {
        Self {
            state: StateCell::new(),
            done: Signal::new(),
            in_flight: AtomicBool::new(false),
            completions: AtomicU32::new(0),
            ready_edges: AtomicU32::new(0),
        }
    }

    /// Current display state
    pub fn state(&self) -> DisplayState {
        self.state.get()
    }

    pub(crate) fn apply(&self, event: Event) -> DisplayState {
        self.state.apply(event)
    }

    /// DMA stream interrupt handler body
    ///
    /// Clears the transfer-complete flag, waits for the last byte to leave
    /// the shift register, releases chip-select, moves the state to `Idle`
    /// and wakes the owning task. Returns `false` if the interrupt was not
    /// a transfer completion or no transfer was armed.
    pub fn on_transfer_complete<D, P>(&self, dma: &mut D, cs: &mut ChipSelect<P>) -> bool
    where
        D: DmaCompletion,
        P: OutputPin,
    {
        if !dma.take_transfer_complete() {
            return false;
        }
        if !self.in_flight.swap(false, Ordering::AcqRel) {
            trace!("Stray transfer completion dropped");
            return false;
        }

        while !dma.tx_empty() {
            core::hint::spin_loop();
        }
        while dma.busy() {
            core::hint::spin_loop();
        }

        cs.select(false);
        self.state.apply(Event::TransferComplete);
        self.completions.fetch_add(1, Ordering::Relaxed);
        self.done.signal(TransferEnd::Complete);
        true
    }

    /// Stream side confirmation that an abort took effect
    ///
    /// Called once the DMA stream is disabled. Releases chip-select, moves
    /// the state to `Idle` and wakes the owning task. Returns `false` if no
    /// transfer was armed.
    pub fn on_transfer_aborted<P: OutputPin>(&self, cs: &mut ChipSelect<P>) -> bool {
        if !self.in_flight.swap(false, Ordering::AcqRel) {
            return false;
        }

        cs.select(false);
        self.state.apply(Event::CompletionTimeout);
        self.done.signal(TransferEnd::Aborted);
        true
    }

    /// Ready line edge handler body
    ///
    /// The controller pulses ready after each frame; nothing consumes it
    /// yet, so the edge is only acknowledged.
    pub fn on_ready_edge<E: EdgeInterrupt>(&self, line: &mut E) {
        if line.is_pending() {
            line.clear_pending();
            self.ready_edges.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Expect one report for the transfer about to start
    ///
    /// Drops any report left over from an earlier transfer so the
    /// following wait can only be satisfied by this one.
    pub(crate) fn arm(&self) {
        self.done.reset();
        self.in_flight.store(true, Ordering::Release);
    }

    /// Withdraw an arm whose transfer was never started
    pub(crate) fn disarm(&self) {
        self.in_flight.store(false, Ordering::Release);
        self.done.reset();
    }

    /// Wait for the armed transfer to end
    pub(crate) async fn wait_complete(&self) -> TransferEnd {
        self.done.wait().await
    }

    /// Check if an armed transfer has not reported yet
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Transfers completed since boot
    pub fn completions(&self) -> u32 {
        self.completions.load(Ordering::Relaxed)
    }

    /// Ready edges acknowledged since boot
    pub fn ready_edges(&self) -> u32 {
        self.ready_edges.load(Ordering::Relaxed)
    }
}

impl Default for InterruptBridge {
    fn default() -> Self {
        Self::new()
    }
}
