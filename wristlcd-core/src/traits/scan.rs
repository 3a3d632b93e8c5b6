//! Scan conversion

/// Rearranges the frame buffer into the order the panel scans it
///
/// Called by the owning task right before the frame-begin command, with
/// the offsets carried by the draw request.
pub trait ScanConverter {
    fn convert(&mut self, frame: &mut [u8], x_offset: u8, y_offset: u8);
}

/// Leaves the buffer untouched
///
/// For renderers that already write in panel order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl ScanConverter for Passthrough {
    fn convert(&mut self, _frame: &mut [u8], _x_offset: u8, _y_offset: u8) {}
}

impl<F> ScanConverter for F
where
    F: FnMut(&mut [u8], u8, u8),
{
    fn convert(&mut self, frame: &mut [u8], x_offset: u8, y_offset: u8) {
        self(frame, x_offset, y_offset)
    }
}
