//! Panel errors

/// Failures reported by the panel controller protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Reset-done never went high after a programming-mode reset
    ResetTimeout,
    /// Ready line never asserted after a scene select
    ReadyTimeout,
    /// No controller image was linked into the firmware
    ImageMissing,
}
