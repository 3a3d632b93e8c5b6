//! Shared display context
//!
//! Everything reachable from more than one execution context: the bridge
//! (task and DMA interrupt) and the draw gate (renderers and task). Lives
//! in a `static` on target.

use crate::bridge::InterruptBridge;
use crate::gate::DrawGate;
use crate::state::DisplayState;

/// Shared state for one panel with an `N` byte frame buffer
pub struct DisplayContext<const N: usize> {
    pub bridge: InterruptBridge,
    pub gate: DrawGate<N>,
}

impl<const N: usize> DisplayContext<N> {
    pub const fn new() -> Self {
        Self {
            bridge: InterruptBridge::new(),
            gate: DrawGate::new(),
        }
    }

    /// Current display state
    pub fn state(&self) -> DisplayState {
        self.bridge.state()
    }
}

impl<const N: usize> Default for DisplayContext<N> {
    fn default() -> Self {
        Self::new()
    }
}
