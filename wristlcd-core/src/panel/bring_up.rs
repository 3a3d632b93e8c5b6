//! Bring-up state machine
//!
//! The controller sometimes fails to come out of its bootloader and has to
//! be reset and asked again. The retry policy is kept free of I/O so it
//! can be checked against arbitrary hardware behavior; the controller
//! feeds it one event per step.
//!
//! ```text
//! Reset ──ok──▶ SelectScene(1) ──▶ AwaitReady(1) ──ready──▶ BroughtUp
//!   │                 ▲                  │
//!   fail              │                  timeout
//!   ▼                 │                  ▼
//! ResetFailed      Retry(n) ◀── n < max ─┤
//!                                        └── n == max ──▶ Degraded
//! ```

/// Terminal result of a bring-up run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpOutcome {
    /// Ready seen on the given attempt, panel powered on
    BroughtUp { attempts: u8 },
    /// Every attempt timed out; the panel stays off
    Degraded { attempts: u8 },
    /// The initial reset failed, no scene was attempted
    ResetFailed,
}

impl BringUpOutcome {
    /// Check if the panel came up
    pub fn is_up(&self) -> bool {
        matches!(self, BringUpOutcome::BroughtUp { .. })
    }

    /// Scene-select attempts made
    pub fn attempts(&self) -> u8 {
        match self {
            BringUpOutcome::BroughtUp { attempts } | BringUpOutcome::Degraded { attempts } => {
                *attempts
            }
            BringUpOutcome::ResetFailed => 0,
        }
    }
}

/// Bring-up phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpPhase {
    /// Initial bootloader-mode reset
    Reset,
    /// Send the scene-select command
    SelectScene { attempt: u8 },
    /// Poll the ready line
    AwaitReady { attempt: u8 },
    /// Reset again after a ready timeout
    Retry { attempt: u8 },
    /// Terminal
    Finished(BringUpOutcome),
}

/// Results of the I/O performed for a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpEvent {
    /// Reset pulse finished, `true` on success
    ResetDone(bool),
    /// Scene-select command clocked out
    SceneSent,
    /// Ready wait finished, `true` if the line asserted
    Ready(bool),
}

impl BringUpPhase {
    /// Process an event and return the next phase
    pub fn next(self, event: BringUpEvent, max_attempts: u8) -> Self {
        use BringUpEvent::*;
        use BringUpPhase::*;

        match (self, event) {
            (Reset, ResetDone(true)) => SelectScene { attempt: 1 },
            (Reset, ResetDone(false)) => Finished(BringUpOutcome::ResetFailed),

            (SelectScene { attempt }, SceneSent) => AwaitReady { attempt },

            (AwaitReady { attempt }, Ready(true)) => {
                Finished(BringUpOutcome::BroughtUp { attempts: attempt })
            }
            (AwaitReady { attempt }, Ready(false)) if attempt >= max_attempts => {
                Finished(BringUpOutcome::Degraded { attempts: attempt })
            }
            (AwaitReady { attempt }, Ready(false)) => Retry { attempt },

            // The retry reset result is not checked, the next ready wait
            // catches a controller that did not come back
            (Retry { attempt }, ResetDone(_)) => SelectScene {
                attempt: attempt + 1,
            },

            _ => self,
        }
    }

    /// Check if this phase ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, BringUpPhase::Finished(_))
    }
}

/// Bring-up run bounded to `max_attempts` scene selects
#[derive(Debug, Clone, Copy)]
pub struct BringUp {
    phase: BringUpPhase,
    max_attempts: u8,
}

impl BringUp {
    /// Start a run; `max_attempts` of zero is treated as one
    pub fn new(max_attempts: u8) -> Self {
        Self {
            phase: BringUpPhase::Reset,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Current phase
    pub fn phase(&self) -> BringUpPhase {
        self.phase
    }

    /// Feed the result of the current phase's I/O
    pub fn advance(&mut self, event: BringUpEvent) -> BringUpPhase {
        self.phase = self.phase.next(event, self.max_attempts);
        self.phase
    }

    /// Outcome once the run is finished
    pub fn outcome(&self) -> Option<BringUpOutcome> {
        match self.phase {
            BringUpPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }
}
