//! Draw request gate
//!
//! Serializes renderers against the single panel. A renderer locks the
//! frame buffer (with a timeout), draws into it, posts a draw request and
//! unlocks. The owning task takes the same lock for the whole transfer, so
//! a renderer can never write into a frame that is still streaming.
//!
//! Requests go through a single slot: a request posted while another is
//! pending is merged into it, so any number of requests issued during a
//! transfer produce at most one more transfer.

use core::cell::Cell;
use core::ops::{Deref, DerefMut};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use portable_atomic::{AtomicU32, Ordering};
use wristlcd_protocol::DisplayRequest;

/// Frame buffer, one byte per pixel in panel order
#[repr(C, align(4))]
pub struct FrameBuffer<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FrameBuffer<N> {
    /// Zeroed buffer
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Set every byte to `value`
    pub fn fill(&mut self, value: u8) {
        self.bytes.fill(value);
    }
}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for FrameBuffer<N> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> DerefMut for FrameBuffer<N> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// Held lock on the frame buffer
pub type BufferGuard<'a, const N: usize> = MutexGuard<'a, CriticalSectionRawMutex, FrameBuffer<N>>;

/// Frame counters readable by diagnostics
pub struct DrawStats {
    requests: AtomicU32,
    coalesced: AtomicU32,
    dropped: AtomicU32,
    frames: AtomicU32,
    stalls: AtomicU32,
}

/// Point-in-time copy of [`DrawStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsSnapshot {
    /// Requests posted
    pub requests: u32,
    /// Requests merged into one already pending
    pub coalesced: u32,
    /// Buffer locks that timed out
    pub dropped: u32,
    /// Frames streamed to completion
    pub frames: u32,
    /// Transfers abandoned at the completion deadline
    pub stalls: u32,
}

impl DrawStats {
    pub const fn new() -> Self {
        Self {
            requests: AtomicU32::new(0),
            coalesced: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            frames: AtomicU32::new(0),
            stalls: AtomicU32::new(0),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            frames: self.frames.load(Ordering::Relaxed),
            stalls: self.stalls.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stall(&self) {
        self.stalls.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for DrawStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffer lock plus single-slot request channel
pub struct DrawGate<const N: usize> {
    buffer: Mutex<CriticalSectionRawMutex, FrameBuffer<N>>,
    pending: BlockingMutex<CriticalSectionRawMutex, Cell<Option<DisplayRequest>>>,
    wake: Signal<CriticalSectionRawMutex, ()>,
    stats: DrawStats,
}

impl<const N: usize> DrawGate<N> {
    pub const fn new() -> Self {
        Self {
            buffer: Mutex::new(FrameBuffer::new()),
            pending: BlockingMutex::new(Cell::new(None)),
            wake: Signal::new(),
            stats: DrawStats::new(),
        }
    }

    /// Lock the frame buffer, giving up after `timeout`
    ///
    /// `None` means the draw should be skipped: a dropped frame is better
    /// than a torn one.
    pub async fn lock_buffer(&self, timeout: Duration) -> Option<BufferGuard<'_, N>> {
        match with_timeout(timeout, self.buffer.lock()).await {
            Ok(guard) => Some(guard),
            Err(_) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                debug!("Frame buffer busy, draw dropped");
                None
            }
        }
    }

    /// Lock the frame buffer only if it is free right now
    pub fn try_lock_buffer(&self) -> Option<BufferGuard<'_, N>> {
        self.buffer.try_lock().ok()
    }

    /// Release a lock taken with [`lock_buffer`](Self::lock_buffer)
    pub fn unlock_buffer(&self, guard: BufferGuard<'_, N>) {
        drop(guard);
    }

    /// Ask for the buffer to be drawn at the origin
    pub fn request_draw(&self) {
        self.request(DisplayRequest::draw());
    }

    /// Post a request without blocking
    pub fn request(&self, request: DisplayRequest) {
        let merged = self.pending.lock(|slot| {
            let (next, merged) = match slot.take() {
                Some(pending) => (pending.coalesce(request), true),
                None => (request, false),
            };
            slot.set(Some(next));
            merged
        });

        self.stats.requests.fetch_add(1, Ordering::Relaxed);
        if merged {
            self.stats.coalesced.fetch_add(1, Ordering::Relaxed);
            trace!("Draw request coalesced");
        }
        self.wake.signal(());
    }

    /// Check if a request is waiting for the owning task
    pub fn has_pending(&self) -> bool {
        self.pending.lock(|slot| slot.get().is_some())
    }

    pub fn stats(&self) -> &DrawStats {
        &self.stats
    }

    /// Wait for and take the pending request
    pub(crate) async fn next_request(&self) -> DisplayRequest {
        loop {
            if let Some(request) = self.pending.lock(|slot| slot.take()) {
                return request;
            }
            self.wake.wait().await;
        }
    }

    /// Lock the buffer for a transfer, without a timeout
    pub(crate) async fn lock_for_transfer(&self) -> BufferGuard<'_, N> {
        self.buffer.lock().await
    }
}

impl<const N: usize> Default for DrawGate<N> {
    fn default() -> Self {
        Self::new()
    }
}
