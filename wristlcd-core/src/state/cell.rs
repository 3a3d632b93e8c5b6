//! Interrupt-safe home of the display state
//!
//! The owning task and the DMA interrupt both write the state, but never
//! at the same time: the task only applies events while no transfer is in
//! flight, and the interrupt only fires after the task has started one.
//! A plain load/store pair is therefore enough, no compare-exchange loop.

use portable_atomic::{AtomicU8, Ordering};

use super::{DisplayState, Event};

/// Atomic cell holding the current [`DisplayState`]
pub struct StateCell {
    raw: AtomicU8,
}

impl StateCell {
    /// New cell in the `Booting` state
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(DisplayState::Booting as u8),
        }
    }

    /// Current state
    pub fn get(&self) -> DisplayState {
        DisplayState::from_raw(self.raw.load(Ordering::Acquire))
    }

    /// Apply an event and return the resulting state
    pub(crate) fn apply(&self, event: Event) -> DisplayState {
        let next = self.get().transition(event);
        self.raw.store(next as u8, Ordering::Release);
        next
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
