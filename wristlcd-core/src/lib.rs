//! Board-agnostic core logic for the panel display subsystem
//!
//! This crate contains all display logic that does not depend on specific
//! hardware implementations:
//!
//! - Display state machine and its interrupt-safe cell
//! - Configuration type definitions (geometry, pins, timing)
//! - Bus transport (chip-select, reset, byte and DMA transfer)
//! - Panel controller protocol and the bring-up state machine
//! - Interrupt bridge (DMA completion to owning task)
//! - Draw request gate (buffer lock, coalescing request slot)
//! - Display service (the owning task loop)
//!
//! # Ownership
//!
//! ```text
//!  renderer ──lock/fill/request──▶ DrawGate ──request──▶ DisplayService
//!                                                         │ owns PanelController
//!                                                         ▼
//!  DMA ISR ──on_transfer_complete──▶ InterruptBridge ──signal──▶ (wakes service)
//! ```
//!
//! The display state is written by the service and the bridge only. The
//! bus, DMA stream and frame buffer each have one owner at a time.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod bridge;
pub mod bus;
pub mod config;
pub mod context;
pub mod gate;
pub mod panel;
pub mod pattern;
pub mod service;
pub mod state;
pub mod traits;

#[cfg(test)]
mod mock;

pub use bridge::{InterruptBridge, TransferEnd};
pub use context::DisplayContext;
pub use gate::{BufferGuard, DrawGate, DrawStats, FrameBuffer, StatsSnapshot};
pub use panel::{BootReport, BringUpOutcome, PanelController, PanelError, ResetMode};
pub use service::DisplayService;
pub use state::DisplayState;
