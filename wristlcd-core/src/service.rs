//! Display service
//!
//! The owning task. It is the only caller of the panel controller: it
//! boots the panel, then loops taking draw requests from the gate,
//! starting a frame and sleeping until the interrupt bridge reports the
//! transfer done.

use embassy_time::{with_timeout, Duration, Timer};
use wristlcd_protocol::RequestKind;

use crate::bridge::TransferEnd;
use crate::config::DisplayConfig;
use crate::context::DisplayContext;
use crate::panel::{BootReport, PanelController};
use crate::pattern;
use crate::state::Event;
use crate::traits::{PanelBoard, PanelIo, ScanConverter};

/// Owning task state for one panel
pub struct DisplayService<'a, B: PanelBoard, C: ScanConverter, const N: usize> {
    panel: PanelController<'a, B>,
    scan: C,
    ctx: &'a DisplayContext<N>,
    config: DisplayConfig,
    image: &'a [u8],
}

impl<'a, B, C, const N: usize> DisplayService<'a, B, C, N>
where
    B: PanelBoard,
    C: ScanConverter,
{
    /// Create the service
    ///
    /// `image` is the controller bitstream downloaded during full init.
    pub fn new(
        io: PanelIo<B>,
        scan: C,
        ctx: &'a DisplayContext<N>,
        config: DisplayConfig,
        image: &'a [u8],
    ) -> Self {
        Self {
            panel: PanelController::new(io, config.timing, &ctx.bridge),
            scan,
            ctx,
            config,
            image,
        }
    }

    /// Run the cold boot sequence and show the splash frame
    pub async fn boot(&mut self) -> BootReport {
        self.cold_boot(None).await.0
    }

    /// Cold boot, then show either the splash or the current buffer
    ///
    /// With `redraw` set the buffer is left alone and sent at that scan
    /// offset. Holds the frame buffer until the first frame has streamed.
    /// When no frame could be started the display is marked idle anyway
    /// so draw requests keep completing. The second value reports whether
    /// a frame reached the panel.
    async fn cold_boot(&mut self, redraw: Option<(u8, u8)>) -> (BootReport, bool) {
        let ctx = self.ctx;
        ctx.bridge.apply(Event::ResetRequested);

        let mut frame = ctx.gate.lock_for_transfer().await;
        ctx.bridge.arm();

        let geometry = self.config.geometry;
        let report = self.panel.start(
            self.config.splash_scene,
            frame.as_mut_slice(),
            &mut self.scan,
            redraw.unwrap_or((0, 0)),
            self.image,
            |buf| {
                if redraw.is_none() {
                    pattern::splash(buf, &geometry);
                }
            },
        );

        let shown = if report.frame_started() {
            self.await_completion().await == TransferEnd::Complete
        } else {
            ctx.bridge.disarm();
            ctx.bridge.apply(Event::BootComplete);
            false
        };
        drop(frame);

        (report, shown)
    }

    /// Take one request from the gate and carry it out
    ///
    /// `on_frame_done` is called once for each request that asked for a
    /// frame, including a reset with a draw merged into it.
    pub async fn service_one<F: FnMut()>(&mut self, on_frame_done: &mut F) -> RequestKind {
        let request = self.ctx.gate.next_request().await;
        let origin = (request.x_offset, request.y_offset);

        match request.kind {
            RequestKind::Draw => self.draw(origin.0, origin.1).await,
            RequestKind::Reset => {
                info!("Display reset requested (then draw: {})", request.then_draw);
                let redraw = request.then_draw.then_some(origin);
                let (_, shown) = self.cold_boot(redraw).await;
                if let Some((x, y)) = redraw {
                    if shown {
                        self.ctx.gate.stats().record_frame();
                    } else {
                        self.draw(x, y).await;
                    }
                }
            }
        }

        if request.draws() {
            on_frame_done();
        }

        request.kind
    }

    /// Boot, then serve requests forever
    pub async fn run<F: FnMut()>(mut self, mut on_frame_done: F) -> ! {
        let report = self.boot().await;
        info!(
            "Display boot: bring-up {}, full frame mode {}",
            report.bring_up.is_up(),
            report.frame_started()
        );

        let poll = Duration::from_millis(u64::from(self.config.timing.boot_poll_ms));
        loop {
            if !self.ctx.state().accepts_draw() {
                Timer::after(poll).await;
                continue;
            }
            self.service_one(&mut on_frame_done).await;
        }
    }

    async fn draw(&mut self, x_offset: u8, y_offset: u8) {
        let ctx = self.ctx;
        let mut frame = ctx.gate.lock_for_transfer().await;

        ctx.bridge.apply(Event::DrawStarted);
        ctx.bridge.arm();
        self.panel
            .begin_frame(frame.as_mut_slice(), &mut self.scan, x_offset, y_offset);

        let end = self.await_completion().await;
        drop(frame);

        if end == TransferEnd::Complete {
            ctx.gate.stats().record_frame();
        }
    }

    /// Sleep until the bridge reports the transfer done
    ///
    /// Without a configured deadline this waits forever, like the hardware
    /// it mirrors. Past the deadline the stream is told to stop and the
    /// wait continues for its confirmation; the frame buffer is not
    /// released while DMA may still read it.
    async fn await_completion(&mut self) -> TransferEnd {
        let ctx = self.ctx;
        let bridge = &ctx.bridge;

        let Some(ms) = self.config.timing.completion_deadline_ms else {
            return bridge.wait_complete().await;
        };

        let deadline = Duration::from_millis(u64::from(ms));
        if let Ok(end) = with_timeout(deadline, bridge.wait_complete()).await {
            return end;
        }

        error!("Frame transfer not complete after {} ms, aborting", ms);
        self.panel.abandon_transfer();
        let end = bridge.wait_complete().await;
        if end == TransferEnd::Aborted {
            ctx.gate.stats().record_stall();
        }
        end
    }
}
