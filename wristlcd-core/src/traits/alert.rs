//! User-visible alert

/// Alerting collaborator
///
/// Fired when the controller never reports reset-done, the one failure
/// that is surfaced beyond a log line.
pub trait Alert {
    /// Queue a short vibration; must not block
    fn vibrate(&mut self);
}
