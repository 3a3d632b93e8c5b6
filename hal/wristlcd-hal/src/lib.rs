//! wristlcd Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display subsystem is written
//! against. Chip-specific crates implement them; the host test suites in
//! `wristlcd-core` implement them with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  wristlcd-core (panel protocol, gate)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  wristlcd-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ wristlcd-hal- │       │  host mocks   │
//! │    stm32f4    │       │  (cfg(test))  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::EdgeInterrupt`] - Digital I/O
//! - [`spi::SpiBus`], [`spi::DmaCompletion`] - SPI byte and DMA transfers
//! - [`watchdog::Watchdog`] - Independent watchdog reload

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod watchdog;

// Re-export key traits at crate root for convenience
pub use gpio::{EdgeInterrupt, InputPin, OutputPin};
pub use spi::{DmaCompletion, SpiBus};
pub use watchdog::Watchdog;
