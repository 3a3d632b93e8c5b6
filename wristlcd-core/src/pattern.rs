//! Test patterns
//!
//! Used for the splash frame when no artwork is staged, and by the demo
//! renderer. The buffer is column-major: byte `col * rows + row`.

use crate::config::PanelGeometry;

/// Checker cell edge in pixels
pub const CHECKER_CELL: usize = 21;

/// Bytes used for the splash pattern
pub const SPLASH_ON: u8 = 0xFF;
pub const SPLASH_OFF: u8 = 0xC0;

/// Fill `frame` with a checkerboard of `cell`-pixel squares
///
/// `invert` swaps the two values, which lets the demo alternate frames.
/// Bytes past the end of the geometry are left alone.
pub fn checkerboard(
    frame: &mut [u8],
    geometry: &PanelGeometry,
    cell: usize,
    on: u8,
    off: u8,
    invert: bool,
) {
    let rows = geometry.rows as usize;
    if rows == 0 || cell == 0 {
        return;
    }

    let len = frame.len().min(geometry.frame_len());
    for (i, px) in frame[..len].iter_mut().enumerate() {
        let col = i / rows;
        let row = i % rows;
        let lit = ((col / cell) + (row / cell)) % 2 == 0;
        *px = if lit != invert { on } else { off };
    }
}

/// Splash image staged before the controller image download
pub fn splash(frame: &mut [u8], geometry: &PanelGeometry) {
    checkerboard(frame, geometry, CHECKER_CELL, SPLASH_ON, SPLASH_OFF, false);
}
