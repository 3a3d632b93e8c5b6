//! State machine definition

use super::events::Event;

/// Display states
///
/// `Booting → Idle → FrameInit → Frame → Idle …`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DisplayState {
    /// Controller bring-up or reset in progress; draw requests wait
    Booting = 0,
    /// Ready for the next draw request
    Idle = 1,
    /// Draw picked up, buffer being scan converted
    FrameInit = 2,
    /// Frame data streaming to the panel
    Frame = 3,
}

impl DisplayState {
    /// Decode the raw value stored in [`StateCell`](super::StateCell)
    ///
    /// Unknown values map to `Booting`, the one state that accepts no work.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => DisplayState::Idle,
            2 => DisplayState::FrameInit,
            3 => DisplayState::Frame,
            _ => DisplayState::Booting,
        }
    }

    /// Check if the service may pick up a draw request
    pub fn accepts_draw(&self) -> bool {
        matches!(self, DisplayState::Idle)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use DisplayState::*;
        use Event::*;

        match (self, event) {
            // Reset is accepted from anywhere
            (_, ResetRequested) => Booting,

            // Boot transitions; the splash frame goes straight to Frame
            (Booting, BootComplete) => Idle,
            (Booting, FrameBegun) => Frame,

            // Frame cycle
            (Idle, DrawStarted) => FrameInit,
            (FrameInit, FrameBegun) => Frame,
            (Frame, TransferComplete) => Idle,
            (Frame, CompletionTimeout) => Idle,

            // Stray completions and anything else leave the state alone
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_cycle() {
        let state = DisplayState::Idle;

        let init = state.transition(Event::DrawStarted);
        assert_eq!(init, DisplayState::FrameInit);

        let frame = init.transition(Event::FrameBegun);
        assert_eq!(frame, DisplayState::Frame);

        let idle = frame.transition(Event::TransferComplete);
        assert_eq!(idle, DisplayState::Idle);
    }

    #[test]
    fn test_boot_paths() {
        // Degraded boot without splash frame
        assert_eq!(
            DisplayState::Booting.transition(Event::BootComplete),
            DisplayState::Idle
        );

        // Splash frame completes through the bridge
        let frame = DisplayState::Booting.transition(Event::FrameBegun);
        assert_eq!(frame, DisplayState::Frame);
        assert_eq!(frame.transition(Event::TransferComplete), DisplayState::Idle);
    }

    #[test]
    fn test_reset_from_any_state() {
        let states = [
            DisplayState::Booting,
            DisplayState::Idle,
            DisplayState::FrameInit,
            DisplayState::Frame,
        ];

        for state in states {
            assert_eq!(
                state.transition(Event::ResetRequested),
                DisplayState::Booting
            );
        }
    }

    #[test]
    fn test_stray_completion_ignored() {
        assert_eq!(
            DisplayState::Idle.transition(Event::TransferComplete),
            DisplayState::Idle
        );
        assert_eq!(
            DisplayState::Booting.transition(Event::TransferComplete),
            DisplayState::Booting
        );
        assert_eq!(
            DisplayState::FrameInit.transition(Event::TransferComplete),
            DisplayState::FrameInit
        );
    }

    #[test]
    fn test_draw_ignored_while_booting() {
        assert_eq!(
            DisplayState::Booting.transition(Event::DrawStarted),
            DisplayState::Booting
        );
        assert!(!DisplayState::Booting.accepts_draw());
        assert!(DisplayState::Idle.accepts_draw());
    }

    #[test]
    fn test_completion_timeout_recovers() {
        assert_eq!(
            DisplayState::Frame.transition(Event::CompletionTimeout),
            DisplayState::Idle
        );
    }

    #[test]
    fn test_raw_roundtrip() {
        for state in [
            DisplayState::Booting,
            DisplayState::Idle,
            DisplayState::FrameInit,
            DisplayState::Frame,
        ] {
            assert_eq!(DisplayState::from_raw(state as u8), state);
        }
        assert_eq!(DisplayState::from_raw(0xFF), DisplayState::Booting);
    }
}
