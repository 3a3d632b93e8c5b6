//! Panel controller protocol
//!
//! Everything that talks to the FPGA controller: reset, the scene-select
//! handshake with its retry policy, image download and the frame-begin /
//! frame-data sequence.

pub mod bring_up;
pub mod controller;
pub mod error;

pub use bring_up::{BringUp, BringUpEvent, BringUpOutcome, BringUpPhase};
pub use controller::{BootReport, PanelController, ResetMode};
pub use error::PanelError;
