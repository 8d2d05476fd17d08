//! Frame scheduling capability.
//!
//! The host owns the cadence ("run once before the next repaint"); the
//! controller only ever holds a single outstanding token. Whatever the host
//! fires is handed back to `ScreensaverController::on_frame` along with the
//! token, so a frame that raced a `stop()` is recognisably stale.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Request one frame callback. Supersedes any pending request.
    fn schedule(&mut self) -> FrameToken;

    /// Withdraw a pending request. Unknown or already-fired tokens are ignored.
    fn cancel(&mut self, token: FrameToken);
}

/// Scheduler driven by hand: tests and headless recording call `fire()`
/// whenever they want the next frame.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameToken>,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Take the pending token, as if the host had reached its repaint.
    pub fn fire(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }

    /// Number of cancellations that actually withdrew a pending request.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending = Some(token);
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Wall-clock scheduler: a request becomes due one frame interval after it
/// was made.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameToken, Instant)>,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next_id: 0,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How long the host may block on input before the pending frame is due.
    /// With nothing pending the host may wait a full interval.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.pending {
            Some((_, due)) => due.saturating_duration_since(now),
            None => self.interval,
        }
    }

    pub fn take_due(&mut self, now: Instant) -> Option<FrameToken> {
        match self.pending {
            Some((token, due)) if now >= due => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }
}

impl Scheduler for FrameClock {
    fn schedule(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending = Some((token, Instant::now() + self.interval));
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        if matches!(self.pending, Some((t, _)) if t == token) {
            self.pending = None;
        }
    }
}
