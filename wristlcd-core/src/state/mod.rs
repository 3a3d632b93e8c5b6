//! Display state machine
//!
//! One value at any instant, written only by the display service and the
//! interrupt bridge. The transition table is explicit, finite, and
//! deterministic.

pub mod cell;
pub mod events;
pub mod machine;

pub use cell::StateCell;
pub use events::Event;
pub use machine::DisplayState;
