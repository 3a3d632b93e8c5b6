//! Vibration motor task
//!
//! Drains the vibration queue, driving the motor for each pulse. The
//! display subsystem only ever posts; it never waits on the motor.

use defmt::*;
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};
use wristlcd_core::traits::Alert;

use crate::channels::VIBRATE;

/// Gap between queued pulses so they are felt separately
const PULSE_GAP_MS: u64 = 150;

/// One motor pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub struct VibratePulse {
    pub duration_ms: u16,
}

impl VibratePulse {
    /// Pulse used for hardware fault alerts
    pub const SHORT: Self = Self { duration_ms: 200 };
}

/// Alert that queues a short pulse
pub struct QueuedVibration;

impl Alert for QueuedVibration {
    fn vibrate(&mut self) {
        if VIBRATE.try_send(VibratePulse::SHORT).is_err() {
            warn!("Vibration queue full, pulse dropped");
        }
    }
}

/// Vibration task - motor pin is active-high
#[embassy_executor::task]
pub async fn vibrate_task(mut motor: Output<'static>) {
    info!("Vibrate task started");
    motor.set_low();

    loop {
        let pulse = VIBRATE.receive().await;
        debug!("Vibrate {} ms", pulse.duration_ms);

        motor.set_high();
        Timer::after(Duration::from_millis(u64::from(pulse.duration_ms))).await;
        motor.set_low();
        Timer::after(Duration::from_millis(PULSE_GAP_MS)).await;
    }
}
