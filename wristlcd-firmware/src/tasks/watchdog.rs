//! Watchdog feed task
//!
//! Feeds the IWDG from thread mode. While the display task blocks in
//! bring-up or the image download it reloads the counter itself.

use defmt::*;
use embassy_stm32::peripherals::IWDG;
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_time::{Duration, Ticker};

/// Feed interval in milliseconds
pub const FEED_INTERVAL_MS: u64 = 500;

#[embassy_executor::task]
pub async fn watchdog_task(mut wdg: IndependentWatchdog<'static, IWDG>) {
    info!("Watchdog task started");

    wdg.unleash();
    let mut ticker = Ticker::every(Duration::from_millis(FEED_INTERVAL_MS));
    loop {
        ticker.next().await;
        wdg.pet();
    }
}
