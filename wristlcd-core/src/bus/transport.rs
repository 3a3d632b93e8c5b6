//! SPI transport with control lines

use wristlcd_hal::{OutputPin, SpiBus};

use super::ChipSelect;

/// SPI link to the panel controller
pub struct BusTransport<S: SpiBus, P: OutputPin> {
    spi: S,
    cs: ChipSelect<P>,
    reset: P,
}

impl<S: SpiBus, P: OutputPin> BusTransport<S, P> {
    /// Create a transport; the controller starts deselected
    pub fn new(spi: S, cs: P, reset: P) -> Self {
        Self {
            spi,
            cs: ChipSelect::new(cs),
            reset,
        }
    }

    /// Exchange one byte, blocking until the bus is idle again
    pub fn send_byte(&mut self, byte: u8) -> u8 {
        self.spi.transfer_byte(byte)
    }

    /// Send a run of bytes over the blocking path
    pub fn send_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.send_byte(byte);
        }
    }

    /// Start streaming `data` by DMA; returns immediately
    pub fn start_dma(&mut self, data: &[u8]) {
        self.spi.start_dma(data);
    }

    /// Stop a running DMA stream; the stream side reports when it has
    pub fn abort_dma(&mut self) {
        self.spi.abort_dma();
    }

    /// Address (`true`) or release (`false`) the controller
    pub fn select(&mut self, enabled: bool) {
        self.cs.select(enabled);
    }

    /// Check if the controller is currently addressed
    pub fn is_selected(&self) -> bool {
        self.cs.is_selected()
    }

    /// Drive the reset line
    pub fn reset_line(&mut self, enabled: bool) {
        self.reset.set_state(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockOutput, MockSpi, Wire};
    use std::rc::Rc;

    fn transport(wire: &Rc<Wire>) -> BusTransport<MockSpi, MockOutput> {
        BusTransport::new(
            MockSpi::new(wire),
            MockOutput::chip_select(wire),
            MockOutput::reset(wire),
        )
    }

    #[test]
    fn test_send_byte_returns_received_byte() {
        let wire = Rc::new(Wire::default());
        wire.miso.set(0x3C);
        let mut bus = transport(&wire);

        bus.select(true);
        assert_eq!(bus.send_byte(0x81), 0x3C);
        bus.send_all(&[0x01, 0x02]);
        bus.select(false);

        assert_eq!(*wire.windows.borrow(), vec![vec![0x81, 0x01, 0x02]]);
    }

    #[test]
    fn test_abort_stops_stream() {
        let wire = Rc::new(Wire::default());
        let mut bus = transport(&wire);

        bus.start_dma(&[0u8; 8]);
        assert!(wire.dma_pending.get());
        bus.abort_dma();
        assert!(!wire.dma_pending.get());
        assert_eq!(wire.dma_aborts.get(), 1);
    }
}
