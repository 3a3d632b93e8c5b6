//! Events that trigger display state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Cold boot finished without a splash frame in flight
    BootComplete,
    /// A reset was requested, the boot sequence runs again
    ResetRequested,

    // Frame events
    /// Service picked up a draw request and is converting the buffer
    DrawStarted,
    /// Frame-begin command sent, DMA about to start
    FrameBegun,
    /// DMA completion observed by the interrupt bridge
    TransferComplete,
    /// Overdue transfer stopped; the stream confirmed the abort
    CompletionTimeout,
}
