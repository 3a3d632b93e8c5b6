//! SPI6 byte path
//!
//! Commands and the controller image go out one byte at a time through
//! the embassy blocking driver. Frames and aborts are handed to the DMA
//! task through [`DmaJobs`].

use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use wristlcd_hal::spi::{Phase, Polarity, SpiConfig};

use crate::dma::DmaJobs;

/// Convert the link configuration to the embassy driver's
pub fn embassy_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = Hertz(config.frequency);
    out.mode = spi::Mode {
        polarity: match config.polarity {
            Polarity::IdleLow => spi::Polarity::IdleLow,
            Polarity::IdleHigh => spi::Polarity::IdleHigh,
        },
        phase: match config.phase {
            Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
            Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
        },
    };
    out
}

/// SPI6 master for the panel controller
pub struct Spi6Bus {
    spi: Spi<'static, Blocking>,
    jobs: &'static DmaJobs,
}

impl Spi6Bus {
    pub fn new(spi: Spi<'static, Blocking>, jobs: &'static DmaJobs) -> Self {
        Self { spi, jobs }
    }
}

impl wristlcd_hal::SpiBus for Spi6Bus {
    fn transfer_byte(&mut self, byte: u8) -> u8 {
        let mut buf = [byte];
        if let Err(_e) = self.spi.blocking_transfer_in_place(&mut buf) {
            #[cfg(feature = "defmt")]
            defmt::warn!("SPI6 transfer error: {}", _e);
        }
        buf[0]
    }

    fn start_dma(&mut self, data: &[u8]) {
        self.jobs.post(data);
    }

    fn abort_dma(&mut self) {
        self.jobs.abort();
    }
}
