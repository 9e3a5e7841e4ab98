//! Runtime time model.
//!
//! # Design
//!
//! Time is a signed millisecond offset from an arbitrary session epoch
//! (`TimeMs`).  Trip timestamps, simulation clocks, and lifecycle deadlines
//! all use the same unit, so playback arithmetic is exact integer math with
//! no floating-point drift.
//!
//! Wall-clock access goes through the [`Clock`] trait so every engine in the
//! workspace can be driven by a deterministic test clock.  Production code
//! uses [`SystemClock`]; tests use [`ManualClock`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

// ── TimeMs ────────────────────────────────────────────────────────────────────

/// A point in time, in milliseconds since the session epoch.
///
/// Signed so that deadline arithmetic (`deadline - now`) never underflows.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub const ZERO: TimeMs = TimeMs(0);

    /// Milliseconds elapsed from `earlier` to `self` (0 if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: TimeMs) -> i64 {
        (self.0 - earlier.0).max(0)
    }

    /// This instant expressed as fractional seconds.
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }
}

impl std::ops::Add<i64> for TimeMs {
    type Output = TimeMs;
    #[inline]
    fn add(self, rhs: i64) -> TimeMs {
        TimeMs(self.0 + rhs)
    }
}

impl std::ops::Sub for TimeMs {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: TimeMs) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for TimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Injectable time source.
///
/// The playback driver, simulation engine, and lifecycle machine never read
/// wall time directly — they ask their `Clock`.  Swapping in [`ManualClock`]
/// makes every tick-math path unit-testable without real time.
pub trait Clock {
    fn now(&self) -> TimeMs;
}

/// Monotonic wall clock anchored at construction time.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimeMs {
        TimeMs(self.origin.elapsed().as_millis() as i64)
    }
}

/// Hand-cranked clock for deterministic tests.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and give another to the engine under test:
///
/// ```
/// use rp_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(250);
/// assert_eq!(clock.now().0, 250);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: TimeMs) -> Self {
        Self { now: Rc::new(Cell::new(t.0)) }
    }

    /// Move the clock forward by `ms`.
    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, t: TimeMs) {
        self.now.set(t.0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeMs {
        TimeMs(self.now.get())
    }
}
