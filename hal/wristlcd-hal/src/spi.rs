//! SPI bus abstractions
//!
//! The panel controller talks over a write-mostly SPI link with two
//! transfer paths: a blocking byte exchange used for commands and the
//! controller image, and a fire-and-forget DMA stream used for frames.

/// SPI bus master with a TX DMA stream
///
/// Neither transfer has a timeout. The peripheral is assumed to always
/// finish a byte, and DMA completion is reported through
/// [`DmaCompletion`] from the stream's interrupt.
pub trait SpiBus {
    /// Exchange one byte
    ///
    /// Blocks until the receive register is full and the bus is no longer
    /// busy, then returns the byte clocked in.
    fn transfer_byte(&mut self, byte: u8) -> u8;

    /// Stream `data` to the data register via DMA
    ///
    /// Disables any in-flight transfer first (waiting for the stream's
    /// enable bit to clear), clears every stream status flag, then arms
    /// and enables the stream. Returns immediately.
    ///
    /// `data` must stay borrowed and unmodified until the completion
    /// interrupt has fired.
    fn start_dma(&mut self, data: &[u8]);

    /// Ask for the stream started by [`start_dma`](Self::start_dma) to stop
    ///
    /// Returns immediately. The stream side confirms with exactly one
    /// completion or abort report for that transfer, after which the
    /// buffer is no longer read.
    fn abort_dma(&mut self);
}

/// Interrupt-side view of the TX DMA stream and the SPI status register
///
/// Implementations are used from interrupt context only and must not
/// block beyond polling the status flags.
pub trait DmaCompletion {
    /// Check and clear the transfer-complete flag
    ///
    /// Returns `false` if the interrupt fired for another reason.
    fn take_transfer_complete(&mut self) -> bool;

    /// Transmit buffer empty
    fn tx_empty(&self) -> bool;

    /// Bus still shifting out the last byte
    fn busy(&self) -> bool;
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
}

impl Default for SpiConfig {
    /// Panel controller link: CPOL=1, CPHA=0, MSB first
    fn default() -> Self {
        Self {
            frequency: 10_000_000,
            polarity: Polarity::IdleHigh,
            phase: Phase::CaptureOnFirstTransition,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

impl From<(Polarity, Phase)> for Mode {
    fn from((polarity, phase): (Polarity, Phase)) -> Self {
        match (polarity, phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => Mode::Mode0,
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => Mode::Mode1,
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => Mode::Mode2,
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => Mode::Mode3,
        }
    }
}

impl SpiConfig {
    /// Combined SPI mode for this configuration
    pub fn mode(&self) -> Mode {
        Mode::from((self.polarity, self.phase))
    }
}
