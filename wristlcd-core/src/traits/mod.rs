//! Collaborator traits
//!
//! The display subsystem leans on a few outside services it does not
//! implement: an alert for hard failures, the scan converter that lays
//! the frame out for the panel, and a board description tying the HAL
//! types together.

pub mod alert;
pub mod board;
pub mod scan;

pub use alert::Alert;
pub use board::{PanelBoard, PanelIo};
pub use scan::{Passthrough, ScanConverter};
