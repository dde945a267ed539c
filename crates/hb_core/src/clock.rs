//! Match Clock
//!
//! Logical elapsed time, decoupled from how often the caller samples it.
//! While running: `elapsed = base + (now - last_start)`; while paused:
//! `elapsed = base`. Wall time is pulled from a [`WallClock`] on demand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================
// Wall clock sources
// ============================================

/// Source of wall-clock instants.
pub trait WallClock {
    fn now(&self) -> Instant;
}

/// Real time via [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Ceiling of a [`ManualWallClock`] offset (about 100 years).
pub const MAX_MANUAL_OFFSET_SECS: u64 = 100 * 365 * 24 * 60 * 60;
const MAX_MANUAL_OFFSET_NANOS: u64 = MAX_MANUAL_OFFSET_SECS * 1_000_000_000;

/// Manually advanced wall clock for replays and tests.
///
/// Clones share the same time, so a driver can keep one handle while the
/// match owns another.
#[derive(Debug, Clone)]
pub struct ManualWallClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl Default for ManualWallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualWallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advance by `by`. The offset saturates at [`MAX_MANUAL_OFFSET_SECS`].
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self.offset_nanos.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            Some(current.saturating_add(by).min(MAX_MANUAL_OFFSET_NANOS))
        });
    }

    /// Advance by `secs`; negative or NaN values are ignored, values too
    /// large for a `Duration` saturate.
    pub fn advance_secs(&self, secs: f64) {
        if !(secs > 0.0) {
            return;
        }
        match Duration::try_from_secs_f64(secs) {
            Ok(by) => self.advance(by),
            Err(_) => self.advance(Duration::from_nanos(MAX_MANUAL_OFFSET_NANOS)),
        }
    }

    /// Seconds since the clock was created.
    pub fn offset_secs(&self) -> f64 {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst)).as_secs_f64()
    }

    /// Move forward to `secs` since creation. Never moves backwards.
    pub fn advance_to_secs(&self, secs: f64) {
        self.advance_secs(secs - self.offset_secs());
    }
}

impl WallClock for ManualWallClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

// ============================================
// MatchClock
// ============================================

#[derive(Debug, Clone)]
pub struct MatchClock<C: WallClock = SystemWallClock> {
    source: C,
    running: bool,
    base_elapsed_seconds: f64,
    /// Present only while running
    last_start: Option<Instant>,
}

impl Default for MatchClock<SystemWallClock> {
    fn default() -> Self {
        Self::new(SystemWallClock)
    }
}

impl<C: WallClock> MatchClock<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            running: false,
            base_elapsed_seconds: 0.0,
            last_start: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.last_start = Some(self.source.now());
        self.running = true;
    }

    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.base_elapsed_seconds += self.running_span();
        self.last_start = None;
        self.running = false;
    }

    /// Back to zero. A running clock keeps running from zero.
    pub fn reset(&mut self) {
        self.base_elapsed_seconds = 0.0;
        if self.running {
            self.last_start = Some(self.source.now());
        }
    }

    /// Logical elapsed seconds. Pure read.
    pub fn elapsed(&self) -> f64 {
        if self.running {
            self.base_elapsed_seconds + self.running_span()
        } else {
            self.base_elapsed_seconds
        }
    }

    fn running_span(&self) -> f64 {
        match self.last_start {
            Some(started) => self.source.now().saturating_duration_since(started).as_secs_f64(),
            None => 0.0,
        }
    }
}

// ============================================
// mm:ss helpers
// ============================================

/// `mm:ss` rendering of whole seconds, truncating fractions.
pub fn format_mmss(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds as u64 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Parses `mm:ss` into seconds. Seconds must be below 60.
pub fn parse_mmss(text: &str) -> Option<u32> {
    let (mm, ss) = text.trim().split_once(':')?;
    let m: u32 = mm.trim().parse().ok()?;
    let s: u32 = ss.trim().parse().ok()?;
    if s >= 60 {
        return None;
    }
    m.checked_mul(60)?.checked_add(s)
}
