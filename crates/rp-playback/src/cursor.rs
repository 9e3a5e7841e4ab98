//! The `PlaybackCursor` — time advance and random access over one trip.

use std::collections::BTreeSet;
use std::sync::Arc;

use rp_core::{PlaybackSnapshot, TimeMs};
use rp_trip::TripData;

use crate::{PlaybackError, PlaybackResult};

/// Outcome of one [`PlaybackCursor::advance`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The cursor is not playing; nothing was committed.
    Idle,
    /// Time advanced normally.
    Stepped,
    /// The trip end was reached: time clamped to `end_time`, playback
    /// stopped.  A normal terminal condition, not an error.
    Finished,
}

/// Replay cursor over an immutable trip.
///
/// The cursor is the sole writer of its state; consumers read derived
/// queries or take a [`snapshot`][Self::snapshot].  Invariant maintained by
/// every mutation: `samples[index].at ≤ current_time`, and if `index` is not
/// last, `current_time < samples[index + 1].at`.
pub struct PlaybackCursor {
    trip: Arc<TripData>,
    playing: bool,
    time: TimeMs,
    speed: f64,
    index: usize,
    active_events: BTreeSet<String>,
}

impl PlaybackCursor {
    /// Create a paused cursor positioned at the trip start.
    pub fn new(trip: Arc<TripData>) -> Self {
        let time = trip.start_time();
        let active_events = trip.active_events_at(time);
        Self {
            trip,
            playing: false,
            time,
            speed: 1.0,
            index: 0,
            active_events,
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Set the speed multiplier applied to every subsequent advance.
    pub fn set_speed(&mut self, speed: f64) -> PlaybackResult<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Advance trip time by `delta_ms * speed`.  Only effective while
    /// playing; a paused cursor returns [`Advance::Idle`] untouched.
    ///
    /// `advance` only ever moves forward: a negative `delta_ms` (a wall
    /// clock stepping backwards) is treated as zero, since the forward-only
    /// index scan could not honour it.  Use [`scrub`][Self::scrub] to move
    /// backward in trip time.
    ///
    /// Reaching `end_time` clamps, recomputes the event window, and stops
    /// playback ([`Advance::Finished`]).
    pub fn advance(&mut self, delta_ms: i64) -> Advance {
        if !self.playing {
            return Advance::Idle;
        }

        let scaled = (delta_ms.max(0) as f64 * self.speed).round() as i64;
        let new_time = self.time + scaled;

        if new_time >= self.trip.end_time() {
            self.time = self.trip.end_time();
            self.index = self.trip.advance_index(self.index, self.time);
            self.active_events = self.trip.active_events_at(self.time);
            self.playing = false;
            return Advance::Finished;
        }

        self.time = new_time;
        self.index = self.trip.advance_index(self.index, new_time);
        self.active_events = self.trip.active_events_at(new_time);
        Advance::Stepped
    }

    /// Jump to an arbitrary trip time.
    ///
    /// **Implicitly pauses first** when called during playback, then clamps
    /// `t` into `[start_time, end_time]` and recomputes the sample index by
    /// binary search (any forward-scan position is invalidated by the jump).
    pub fn scrub(&mut self, t: TimeMs) {
        self.playing = false;
        let t = t.clamp(self.trip.start_time(), self.trip.end_time());
        self.time = t;
        self.index = self.trip.sample_index_at(t);
        self.active_events = self.trip.active_events_at(t);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_time(&self) -> TimeMs {
        self.time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Index of the active GPS sample (the one bracketing `current_time`
    /// from below).
    pub fn position_index(&self) -> usize {
        self.index
    }

    /// IDs of the trip events active at `current_time`.
    pub fn active_event_ids(&self) -> &BTreeSet<String> {
        &self.active_events
    }

    pub fn trip(&self) -> &TripData {
        &self.trip
    }

    /// Trip completion percentage in `[0, 100]`.
    ///
    /// A single-sample trip has no duration; its progress reports 100.
    pub fn progress(&self) -> f64 {
        let duration = self.trip.duration_ms();
        if duration == 0 {
            return 100.0;
        }
        let elapsed = (self.time - self.trip.start_time()) as f64;
        (elapsed / duration as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Recorded distance covered up to the active sample, metres.
    pub fn completed_distance_m(&self) -> f64 {
        self.trip.cumulative_m()[self.index]
    }

    /// One fully recomputed frame for the rendering collaborator.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let fix = self.trip.fix_at(self.index, self.time);
        PlaybackSnapshot {
            at: self.time,
            position: fix.point,
            bearing: fix.bearing,
            progress_pct: self.progress(),
            completed_m: self.completed_distance_m(),
            active_events: self.active_events.iter().cloned().collect(),
            playing: self.playing,
        }
    }
}
