//! Panel Controller Command Set
//!
//! This crate defines the byte-level protocol spoken to the FPGA panel
//! controller over SPI, plus the request codes used to ask the display
//! owner for work.
//!
//! # Protocol Overview
//!
//! Every command is an opcode byte, optionally followed by one operand,
//! clocked out while chip-select is asserted:
//! ```text
//! ┌────────┬──────────┐
//! │ OPCODE │ OPERAND  │
//! │ 1B     │ 0–1B     │
//! └────────┴──────────┘
//! ```
//!
//! `FRAME` is followed (in a second chip-select window) by the raw frame
//! buffer, streamed by DMA. The controller pulls its ready line low once a
//! selected scene is on the glass.

#![no_std]
#![deny(unsafe_code)]

pub mod commands;
pub mod geometry;
pub mod request;

pub use commands::{CommandError, ControllerCommand, MAX_COMMAND_LEN, SPLASH_SCENE};
pub use geometry::{BORDER_COLS, BORDER_ROWS, FRAME_BUFFER_SIZE, PANEL_COLS, PANEL_ROWS};
pub use request::{DisplayRequest, RequestKind};
