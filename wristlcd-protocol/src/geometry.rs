//! Panel geometry
//!
//! The controller takes one byte per pixel, column-major, including the
//! border rows and columns the glass hides.

/// Pixel rows per frame
pub const PANEL_ROWS: usize = 168;

/// Pixel columns per frame
pub const PANEL_COLS: usize = 144;

/// Hidden rows at the top and bottom edge
pub const BORDER_ROWS: usize = 2;

/// Hidden columns at the left and right edge
pub const BORDER_COLS: usize = 2;

/// Bytes streamed after a `FRAME` command
pub const FRAME_BUFFER_SIZE: usize = PANEL_ROWS * PANEL_COLS;
