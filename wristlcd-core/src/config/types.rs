//! Panel geometry and timing

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wristlcd_protocol::geometry::{BORDER_COLS, BORDER_ROWS, PANEL_COLS, PANEL_ROWS};

/// Visible panel size plus the hidden border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelGeometry {
    pub rows: u16,
    pub cols: u16,
    pub border_rows: u8,
    pub border_cols: u8,
}

impl PanelGeometry {
    /// 144x168 snowy panel
    pub const fn snowy() -> Self {
        Self {
            rows: PANEL_ROWS as u16,
            cols: PANEL_COLS as u16,
            border_rows: BORDER_ROWS as u8,
            border_cols: BORDER_COLS as u8,
        }
    }

    /// Bytes in one frame (one byte per pixel)
    pub const fn frame_len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::snowy()
    }
}

/// Delays and retry bounds for the controller protocol
///
/// All delays are in microseconds unless the name says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelTiming {
    /// Spacing between polls of reset-done and ready
    pub poll_interval_us: u32,
    /// Polls before a reset-done or ready wait gives up
    pub poll_limit: u32,
    /// Scene-select attempts during bring-up
    pub bring_up_attempts: u8,
    /// Settling time on each side of the reset pulse
    pub reset_settle_us: u32,
    /// Wait before each scene select during bring-up
    pub scene_select_settle_us: u32,
    /// Chip-select setup before a bootloader command
    pub select_settle_us: u32,
    /// Chip-select setup before the frame-begin command
    pub frame_select_settle_us: u32,
    /// Gap after a command before the next phase
    pub post_command_us: u32,
    /// Re-poll period while the service sees `Booting`
    pub boot_poll_ms: u32,
    /// Give up on a DMA completion after this long (`None` waits forever)
    pub completion_deadline_ms: Option<u32>,
}

impl PanelTiming {
    /// Values used on the snowy board
    pub const fn snowy() -> Self {
        Self {
            poll_interval_us: 100,
            poll_limit: 1000,
            bring_up_attempts: 10,
            reset_settle_us: 1000,
            scene_select_settle_us: 1000,
            select_settle_us: 100,
            frame_select_settle_us: 80,
            post_command_us: 100,
            boot_poll_ms: 5,
            completion_deadline_ms: None,
        }
    }
}

impl Default for PanelTiming {
    fn default() -> Self {
        Self::snowy()
    }
}
