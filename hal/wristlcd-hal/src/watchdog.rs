//! Independent watchdog

/// Watchdog reload hook
///
/// Long hardware sequences (controller bring-up, image download) call
/// this between bounded iterations so the watchdog only fires when the
/// sequence itself has hung.
pub trait Watchdog {
    /// Reload the watchdog counter
    fn reload(&mut self);
}
