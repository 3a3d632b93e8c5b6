//! STM32F4-specific HAL for the wristlcd panel link
//!
//! This crate implements the `wristlcd-hal` traits on top of embassy-stm32
//! for the snowy board (STM32F439):
//!
//! - SPI6 byte path through the embassy blocking driver
//! - DMA2 stream 5 frame path, driven from a high-priority task that owns
//!   the channel (embassy binds the DMA interrupts itself)
//! - Chip-select and reset outputs, reset-done and ready inputs
//! - EXTI line for the controller's ready edge
//! - IWDG reload handle
//!
//! # Features
//!
//! - `stm32f439zg` - Snowy MCU
//! - `stm32f429zi` - Discovery boards used for bring-up
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod dma;
pub mod exti;
pub mod gpio;
pub mod spi;
pub mod watchdog;

pub use dma::{DmaCommand, DmaJobs, FrameDma, TransferStatus};
pub use exti::ExtiLine;
pub use gpio::{PanelInput, PanelOutput, RawOutput};
pub use spi::Spi6Bus;
pub use watchdog::IwdgReload;
