//! Requests posted to the display owner
//!
//! A request is a kind plus the scan offset handed to the scan converter.
//! Requests travel through a single slot, so a newer request is merged
//! into a pending one instead of queueing behind it.

/// What the display owner is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    /// Push the frame buffer to the panel
    Draw,
    /// Re-run the cold boot sequence
    Reset,
}

/// A request for the display owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayRequest {
    pub kind: RequestKind,
    pub x_offset: u8,
    pub y_offset: u8,
    /// A draw was merged into this reset; the buffer holds a frame to show
    pub then_draw: bool,
}

impl DisplayRequest {
    /// Draw the whole frame at the origin
    pub const fn draw() -> Self {
        Self::draw_at(0, 0)
    }

    /// Draw with the scan converter offset by `(x, y)`
    pub const fn draw_at(x_offset: u8, y_offset: u8) -> Self {
        Self {
            kind: RequestKind::Draw,
            x_offset,
            y_offset,
            then_draw: false,
        }
    }

    /// Reset and re-initialise the controller
    pub const fn reset() -> Self {
        Self {
            kind: RequestKind::Reset,
            x_offset: 0,
            y_offset: 0,
            then_draw: false,
        }
    }

    /// Check if serving this request ends with a drawn frame
    pub const fn draws(&self) -> bool {
        matches!(self.kind, RequestKind::Draw) || self.then_draw
    }

    /// Merge a newer request into this pending one
    ///
    /// A reset always wins. A draw on either side of it is not lost: the
    /// merged reset carries `then_draw` and the draw's offset. Between
    /// two draws the newest offset is kept.
    pub fn coalesce(self, newer: DisplayRequest) -> DisplayRequest {
        match (self.kind, newer.kind) {
            (RequestKind::Draw, RequestKind::Draw) => newer,
            (RequestKind::Reset, RequestKind::Draw) => Self {
                x_offset: newer.x_offset,
                y_offset: newer.y_offset,
                then_draw: true,
                ..self
            },
            (RequestKind::Draw, RequestKind::Reset) => Self {
                kind: RequestKind::Reset,
                then_draw: true,
                ..self
            },
            (RequestKind::Reset, RequestKind::Reset) => {
                if self.then_draw && !newer.then_draw {
                    self
                } else {
                    newer
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_keeps_newest_draw() {
        let merged = DisplayRequest::draw().coalesce(DisplayRequest::draw_at(3, 4));
        assert_eq!(merged, DisplayRequest::draw_at(3, 4));
        assert!(merged.draws());
    }

    #[test]
    fn test_coalesce_reset_wins_but_keeps_draw() {
        let merged = DisplayRequest::reset().coalesce(DisplayRequest::draw_at(1, 2));
        assert_eq!(merged.kind, RequestKind::Reset);
        assert!(merged.then_draw);
        assert_eq!((merged.x_offset, merged.y_offset), (1, 2));

        let merged = DisplayRequest::draw_at(5, 6).coalesce(DisplayRequest::reset());
        assert_eq!(merged.kind, RequestKind::Reset);
        assert!(merged.then_draw);
        assert_eq!((merged.x_offset, merged.y_offset), (5, 6));
    }

    #[test]
    fn test_plain_reset_does_not_draw() {
        assert!(!DisplayRequest::reset().draws());
        let merged = DisplayRequest::reset().coalesce(DisplayRequest::reset());
        assert!(!merged.draws());
    }

    #[test]
    fn test_second_reset_keeps_merged_draw() {
        let pending = DisplayRequest::reset().coalesce(DisplayRequest::draw_at(7, 0));
        let merged = pending.coalesce(DisplayRequest::reset());
        assert!(merged.then_draw);
        assert_eq!(merged.x_offset, 7);
    }
}
