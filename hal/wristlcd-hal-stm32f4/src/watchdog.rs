//! Independent watchdog reload
//!
//! The watchdog itself is started by the firmware through embassy's
//! `IndependentWatchdog`. Long panel sequences only need to reload it, so
//! they get this register-level handle instead of the driver.

use embassy_stm32::pac;
use embassy_stm32::pac::iwdg::vals::Key;

/// Reloads the IWDG counter
#[derive(Debug, Default, Clone, Copy)]
pub struct IwdgReload;

impl wristlcd_hal::Watchdog for IwdgReload {
    fn reload(&mut self) {
        pac::IWDG.kr().write(|w| w.set_key(Key::RESET));
    }
}
