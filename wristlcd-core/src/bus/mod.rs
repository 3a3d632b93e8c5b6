//! Bus transport
//!
//! Byte and DMA transfer over the SPI link plus the two control lines.
//! Only the panel controller drives this; the interrupt bridge gets its
//! own [`ChipSelect`] handle to release the device after a DMA frame.

pub mod chip_select;
pub mod transport;

pub use chip_select::ChipSelect;
pub use transport::BusTransport;
