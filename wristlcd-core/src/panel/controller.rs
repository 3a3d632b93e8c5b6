//! Panel controller driver
//!
//! Owns the bus and control lines. All blocking waits are bounded by
//! [`PanelTiming`] and spaced with the board's `DelayNs`, so they can be
//! run against mocks on the host.

use embedded_hal::delay::DelayNs;
use wristlcd_hal::{EdgeInterrupt, InputPin, Watchdog};
use wristlcd_protocol::ControllerCommand;

use super::bring_up::{BringUp, BringUpEvent, BringUpOutcome, BringUpPhase};
use super::PanelError;
use crate::bridge::InterruptBridge;
use crate::config::PanelTiming;
use crate::state::Event;
use crate::traits::{Alert, PanelBoard, PanelIo, ScanConverter};

/// Gap between the frame-begin command and the DMA select
const FRAME_GAP_US: u32 = 1;

/// Chip-select setup before a byte-by-byte frame
const SLOW_FRAME_SETTLE_US: u32 = 50;

/// Settle time after the splash frame is started
const SPLASH_SETTLE_US: u32 = 10;

/// Image bytes sent between watchdog reloads
const IMAGE_CHUNK: usize = 1024;

/// How the controller is reset
///
/// The controller samples chip-select on the rising edge of reset to pick
/// between its bootloader and a fresh image download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetMode {
    /// Chip-select released: boot the built-in scene bootloader.
    /// Returns as soon as the pulse is done, no polling.
    Bootloader,
    /// Chip-select held: wait for an image download. Polls reset-done
    /// and alerts the user if it never rises.
    Programming,
}

impl ResetMode {
    fn holds_select(&self) -> bool {
        matches!(self, ResetMode::Programming)
    }
}

/// Result of a cold boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    pub bring_up: BringUpOutcome,
    pub full_init: Result<(), PanelError>,
}

impl BootReport {
    /// Check if the splash frame is streaming and a completion will follow
    pub fn frame_started(&self) -> bool {
        self.full_init.is_ok()
    }
}

/// Driver for the FPGA panel controller
pub struct PanelController<'a, B: PanelBoard> {
    io: PanelIo<B>,
    timing: PanelTiming,
    bridge: &'a InterruptBridge,
}

impl<'a, B: PanelBoard> PanelController<'a, B> {
    /// Create a controller; no I/O happens until [`start`](Self::start)
    pub fn new(io: PanelIo<B>, timing: PanelTiming, bridge: &'a InterruptBridge) -> Self {
        Self { io, timing, bridge }
    }

    /// Pulse reset with chip-select strapped for `mode`
    pub fn reset_controller(&mut self, mode: ResetMode) -> Result<(), PanelError> {
        let settle = self.timing.reset_settle_us;

        self.io.bus.select(mode.holds_select());
        self.io.bus.reset_line(false);
        self.io.delay.delay_us(settle);
        self.io.bus.reset_line(true);
        self.io.delay.delay_us(settle);

        if !mode.holds_select() {
            return Ok(());
        }

        if self.poll_until(|io| io.reset_done.is_high()) {
            info!("Panel controller reset done");
            Ok(())
        } else {
            error!("Panel controller reset timed out");
            self.io.bus.select(false);
            self.io.alert.vibrate();
            Err(PanelError::ResetTimeout)
        }
    }

    /// Wait for the controller to pull its ready line low
    pub fn wait_ready(&mut self) -> Result<(), PanelError> {
        if self.poll_until(|io| io.ready.is_low()) {
            debug!("Panel controller ready");
            Ok(())
        } else {
            warn!("Panel controller not ready");
            Err(PanelError::ReadyTimeout)
        }
    }

    /// Poll `done` up to the configured limit
    ///
    /// Returns `false` after `poll_limit` reads that all came back false.
    fn poll_until(&mut self, mut done: impl FnMut(&PanelIo<B>) -> bool) -> bool {
        for _ in 0..self.timing.poll_limit {
            if done(&self.io) {
                return true;
            }
            self.io.delay.delay_us(self.timing.poll_interval_us);
        }
        false
    }

    /// Send one command in its own chip-select window
    pub fn send_command(&mut self, command: ControllerCommand) {
        let settle = match command {
            ControllerCommand::FrameBegin => self.timing.frame_select_settle_us,
            _ => self.timing.select_settle_us,
        };

        self.io.bus.select(true);
        self.io.delay.delay_us(settle);
        self.io.bus.send_all(&command.encode());
        self.io.bus.select(false);
    }

    /// Bring the controller up in bootloader mode showing `scene`
    ///
    /// Retries with a fresh reset whenever the ready wait times out. On
    /// success the panel is powered on. Running out of attempts is logged
    /// and leaves the panel off; it is not fatal.
    pub fn bring_up(&mut self, scene: u8) -> BringUpOutcome {
        let mut machine = BringUp::new(self.timing.bring_up_attempts);

        let outcome = loop {
            let event = match machine.phase() {
                BringUpPhase::Reset | BringUpPhase::Retry { .. } => {
                    BringUpEvent::ResetDone(self.reset_controller(ResetMode::Bootloader).is_ok())
                }
                BringUpPhase::SelectScene { .. } => {
                    self.io.delay.delay_us(self.timing.scene_select_settle_us);
                    self.send_command(ControllerCommand::SelectScene(scene));
                    self.io.watchdog.reload();
                    self.io.delay.delay_us(self.timing.post_command_us);
                    BringUpEvent::SceneSent
                }
                BringUpPhase::AwaitReady { .. } => BringUpEvent::Ready(self.wait_ready().is_ok()),
                BringUpPhase::Finished(outcome) => break outcome,
            };
            machine.advance(event);
        };

        match outcome {
            BringUpOutcome::BroughtUp { attempts } => {
                self.display_on();
                info!("Panel bring-up complete after {} attempts", attempts);
            }
            BringUpOutcome::Degraded { attempts } => {
                error!("Panel bring-up gave up after {} attempts", attempts);
            }
            BringUpOutcome::ResetFailed => {
                error!("Panel bring-up aborted, reset failed");
            }
        }

        outcome
    }

    /// Power the panel on (bootloader command)
    pub fn display_on(&mut self) {
        self.send_command(ControllerCommand::DisplayOn);
    }

    /// Blank the panel (bootloader command)
    pub fn display_off(&mut self) {
        self.send_command(ControllerCommand::DisplayOff);
    }

    /// Download the controller image over the blocking path
    pub fn program_controller(&mut self, image: &[u8]) -> Result<(), PanelError> {
        if image.is_empty() {
            warn!("No panel controller image linked");
            return Err(PanelError::ImageMissing);
        }

        self.io.bus.select(true);
        for chunk in image.chunks(IMAGE_CHUNK) {
            self.io.bus.send_all(chunk);
            self.io.watchdog.reload();
        }
        self.io.bus.select(false);

        info!("Panel controller image sent ({} bytes)", image.len());
        Ok(())
    }

    /// Scan convert `frame`, announce it and start the DMA stream
    ///
    /// Returns with the transfer in flight and chip-select held. `frame`
    /// must not be touched until the interrupt bridge reports completion.
    pub fn begin_frame<C: ScanConverter>(
        &mut self,
        frame: &mut [u8],
        scan: &mut C,
        x_offset: u8,
        y_offset: u8,
    ) {
        scan.convert(frame, x_offset, y_offset);

        self.send_command(ControllerCommand::FrameBegin);
        self.io.delay.delay_us(FRAME_GAP_US);

        self.bridge.apply(Event::FrameBegun);
        trace!("Frame start ({}, {})", x_offset, y_offset);

        self.transmit_frame(frame);
    }

    /// Select the controller and stream `frame` by DMA
    pub fn transmit_frame(&mut self, frame: &[u8]) {
        self.io.bus.select(true);
        self.io.bus.start_dma(frame);
    }

    /// Stop a transfer that is overdue
    ///
    /// Returns at once. The stream side confirms through the interrupt
    /// bridge, which releases chip-select; `frame` stays borrowed until
    /// then.
    pub fn abandon_transfer(&mut self) {
        self.io.bus.abort_dma();
    }

    /// Send `frame` byte by byte and release the controller
    ///
    /// Diagnostic path; no completion interrupt follows.
    pub fn transmit_frame_slow(&mut self, frame: &[u8]) {
        self.io.bus.select(true);
        self.io.delay.delay_us(SLOW_FRAME_SETTLE_US);
        self.io.bus.send_all(frame);
        self.io.bus.select(false);
    }

    /// Reprogram the controller for full frames and show the buffer
    ///
    /// `stage` may fill the frame buffer before it is sent; `origin` is
    /// the scan offset for that first frame. On success the frame is
    /// streaming and the ready edge interrupt is enabled.
    pub fn full_init<C: ScanConverter>(
        &mut self,
        frame: &mut [u8],
        scan: &mut C,
        origin: (u8, u8),
        image: &[u8],
        stage: impl FnOnce(&mut [u8]),
    ) -> Result<(), PanelError> {
        info!("Switching panel controller to full frame mode");

        self.reset_controller(ResetMode::Programming)?;
        stage(frame);
        self.program_controller(image)?;

        self.io.delay.delay_us(self.timing.post_command_us);
        self.display_on();
        self.io.delay.delay_us(self.timing.post_command_us);

        self.begin_frame(frame, scan, origin.0, origin.1);
        self.io.delay.delay_us(SPLASH_SETTLE_US);

        self.io.watchdog.reload();
        self.io.ready_irq.enable();
        Ok(())
    }

    /// Cold boot: bootloader splash scene, then full frame mode
    ///
    /// Failures in either phase are reported, not propagated; the display
    /// keeps running degraded.
    pub fn start<C: ScanConverter>(
        &mut self,
        scene: u8,
        frame: &mut [u8],
        scan: &mut C,
        origin: (u8, u8),
        image: &[u8],
        stage: impl FnOnce(&mut [u8]),
    ) -> BootReport {
        let bring_up = self.bring_up(scene);
        self.io.delay.delay_us(self.timing.post_command_us);
        let full_init = self.full_init(frame, scan, origin, image, stage);

        if let Err(e) = full_init {
            warn!("Full frame mode unavailable: {}", e);
        }

        BootReport {
            bring_up,
            full_init,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{mock_io, MockBoard, Wire};
    use crate::state::DisplayState;
    use proptest::prelude::*;
    use std::rc::Rc;
    use wristlcd_protocol::commands::{CMD_DISPLAY_OFF, CMD_DISPLAY_ON, CMD_FRAME, CMD_SCENE};

    fn controller<'a>(wire: &Rc<Wire>, bridge: &'a InterruptBridge) -> PanelController<'a, MockBoard> {
        PanelController::new(mock_io(wire), PanelTiming::snowy(), bridge)
    }

    fn send_frame(panel: &mut PanelController<'_, MockBoard>, frame: &mut [u8]) {
        let mut scan = crate::traits::Passthrough;
        panel.begin_frame(frame, &mut scan, 0, 0);
    }

    #[test]
    fn test_bootloader_reset_does_not_poll() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        assert_eq!(panel.reset_controller(ResetMode::Bootloader), Ok(()));
        assert_eq!(wire.reset_done_polls.get(), 0);
        assert_eq!(wire.reset_pulses.get(), 1);
        assert_eq!(*wire.cs_at_reset_edge.borrow(), vec![false]);
        assert_eq!(wire.vibrations.get(), 0);
    }

    #[test]
    fn test_programming_reset_waits_for_done() {
        let wire = Rc::new(Wire::default());
        wire.reset_done.set(true);
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        assert_eq!(panel.reset_controller(ResetMode::Programming), Ok(()));
        assert_eq!(wire.reset_done_polls.get(), 1);
        assert_eq!(*wire.cs_at_reset_edge.borrow(), vec![true]);
    }

    #[test]
    fn test_programming_reset_timeout_vibrates() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        assert_eq!(
            panel.reset_controller(ResetMode::Programming),
            Err(PanelError::ResetTimeout)
        );
        assert_eq!(wire.reset_done_polls.get(), 1000);
        assert_eq!(wire.vibrations.get(), 1);
    }

    #[test]
    fn test_wait_ready_gives_up_after_poll_limit() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        assert_eq!(panel.wait_ready(), Err(PanelError::ReadyTimeout));
        assert_eq!(wire.ready_polls.get(), 1000);
        assert_eq!(wire.count_delays(100), 1000);
    }

    #[test]
    fn test_bring_up_ready_on_fifth_attempt() {
        let wire = Rc::new(Wire::default());
        wire.ready_on_attempt.set(Some(5));
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        let outcome = panel.bring_up(2);
        assert_eq!(outcome, BringUpOutcome::BroughtUp { attempts: 5 });

        // Initial reset plus four retries
        assert_eq!(wire.reset_pulses.get(), 5);
        assert_eq!(wire.scene_selects.get(), 5);
        assert!(wire.reloads.get() >= 5);

        let windows = wire.windows.borrow();
        assert_eq!(windows[0], vec![CMD_SCENE, 2]);
        assert_eq!(windows.last(), Some(&vec![CMD_DISPLAY_ON]));
        assert!(!wire.selected());

        let commands = wire.commands.borrow();
        assert_eq!(commands[0], ControllerCommand::SelectScene(2));
        assert_eq!(commands.last(), Some(&ControllerCommand::DisplayOn));
    }

    #[test]
    fn test_bring_up_settles_before_each_scene_select() {
        let wire = Rc::new(Wire::default());
        wire.ready_on_attempt.set(Some(3));
        let bridge = InterruptBridge::new();
        let mut timing = PanelTiming::snowy();
        timing.scene_select_settle_us = 1500;
        let mut panel = PanelController::new(mock_io(&wire), timing, &bridge);

        panel.bring_up(2);
        assert_eq!(wire.scene_selects.get(), 3);
        assert_eq!(wire.count_delays(1500), 3);
    }

    #[test]
    fn test_bring_up_exhausted_is_degraded() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        let outcome = panel.bring_up(2);
        assert_eq!(outcome, BringUpOutcome::Degraded { attempts: 10 });
        assert_eq!(wire.scene_selects.get(), 10);
        assert_eq!(wire.reset_pulses.get(), 10);
        assert_eq!(wire.vibrations.get(), 0);
        assert!(!wire
            .windows
            .borrow()
            .iter()
            .any(|w| w.as_slice() == [CMD_DISPLAY_ON]));
    }

    #[test]
    fn test_begin_frame_leaves_dma_running() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        bridge.apply(Event::BootComplete);
        bridge.apply(Event::DrawStarted);
        let mut panel = controller(&wire, &bridge);

        let mut frame = [0u8; 32];
        let mut seen = None;
        let mut scan = |buf: &mut [u8], x: u8, y: u8| {
            buf[0] = 0x5A;
            seen = Some((x, y));
        };
        panel.begin_frame(&mut frame, &mut scan, 3, 7);

        assert_eq!(seen, Some((3, 7)));
        assert_eq!(frame[0], 0x5A);
        assert_eq!(*wire.windows.borrow(), vec![vec![CMD_FRAME]]);
        assert_eq!(*wire.dma_lengths.borrow(), vec![32]);
        assert!(wire.selected());
        assert_eq!(bridge.state(), DisplayState::Frame);
        assert_eq!(wire.count_delays(80), 1);
    }

    #[test]
    fn test_abandon_stops_stream_and_keeps_select() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        bridge.apply(Event::BootComplete);
        bridge.apply(Event::DrawStarted);
        let mut panel = controller(&wire, &bridge);

        let mut frame = [0u8; 8];
        send_frame(&mut panel, &mut frame);
        panel.abandon_transfer();

        // Released by the bridge once the stream confirms
        assert_eq!(wire.dma_aborts.get(), 1);
        assert!(!wire.dma_pending.get());
        assert!(wire.selected());
    }

    #[test]
    fn test_slow_frame_is_byte_by_byte() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        let frame = [1u8, 2, 3, 4];
        panel.transmit_frame_slow(&frame);

        assert_eq!(*wire.windows.borrow(), vec![vec![1, 2, 3, 4]]);
        assert!(wire.dma_lengths.borrow().is_empty());
        assert!(!wire.selected());
    }

    #[test]
    fn test_display_power_commands() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        panel.display_on();
        panel.display_off();

        assert_eq!(
            *wire.windows.borrow(),
            vec![vec![CMD_DISPLAY_ON], vec![CMD_DISPLAY_OFF]]
        );
        assert_eq!(wire.count_delays(100), 2);
    }

    #[test]
    fn test_program_controller() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        assert_eq!(panel.program_controller(&[]), Err(PanelError::ImageMissing));
        assert!(wire.windows.borrow().is_empty());

        let image: Vec<u8> = (0..3000u32).map(|i| i as u8).collect();
        assert_eq!(panel.program_controller(&image), Ok(()));
        assert_eq!(wire.windows.borrow()[0], image);
        assert_eq!(wire.reloads.get(), 3);
    }

    #[test]
    fn test_full_init_starts_splash_frame() {
        let wire = Rc::new(Wire::default());
        wire.reset_done.set(true);
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        let mut frame = [0u8; 16];
        let result = panel.full_init(
            &mut frame,
            &mut crate::traits::Passthrough,
            (0, 0),
            &[9, 9],
            |buf| buf.fill(0x11),
        );

        assert_eq!(result, Ok(()));
        assert!(frame.iter().all(|&b| b == 0x11));
        assert_eq!(
            *wire.windows.borrow(),
            vec![vec![9, 9], vec![CMD_DISPLAY_ON], vec![CMD_FRAME]]
        );
        assert_eq!(*wire.dma_lengths.borrow(), vec![16]);
        assert!(wire.ready_irq_enabled.get());
        assert_eq!(bridge.state(), DisplayState::Frame);
    }

    #[test]
    fn test_full_init_aborts_on_reset_timeout() {
        let wire = Rc::new(Wire::default());
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        let mut frame = [0u8; 16];
        let result = panel.full_init(
            &mut frame,
            &mut crate::traits::Passthrough,
            (0, 0),
            &[9],
            |buf| buf.fill(0x11),
        );

        assert_eq!(result, Err(PanelError::ResetTimeout));
        assert!(wire.dma_lengths.borrow().is_empty());
        assert!(!wire.ready_irq_enabled.get());
        assert_eq!(bridge.state(), DisplayState::Booting);
    }

    #[test]
    fn test_start_reports_both_phases() {
        let wire = Rc::new(Wire::default());
        wire.reset_done.set(true);
        let bridge = InterruptBridge::new();
        let mut panel = controller(&wire, &bridge);

        let mut frame = [0u8; 16];
        let report = panel.start(2, &mut frame, &mut crate::traits::Passthrough, (0, 0), &[1], |_| {});

        assert_eq!(report.bring_up, BringUpOutcome::Degraded { attempts: 10 });
        assert!(report.frame_started());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn bring_up_bounded_and_reloads_each_attempt(ready_on in proptest::option::of(1u32..16)) {
            let wire = Rc::new(Wire::default());
            wire.ready_on_attempt.set(ready_on);
            let bridge = InterruptBridge::new();
            let mut panel = controller(&wire, &bridge);

            let outcome = panel.bring_up(2);
            let attempts = wire.scene_selects.get();

            prop_assert!(attempts <= 10);
            prop_assert_eq!(u32::from(outcome.attempts()), attempts);
            prop_assert!(wire.reloads.get() >= attempts);
            prop_assert!(wire.reset_pulses.get() <= 10);
            match ready_on {
                Some(n) if n <= 10 => {
                    prop_assert_eq!(outcome, BringUpOutcome::BroughtUp { attempts: n as u8 });
                }
                _ => {
                    prop_assert_eq!(outcome, BringUpOutcome::Degraded { attempts: 10 });
                }
            }
        }
    }
}
