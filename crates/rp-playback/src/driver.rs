//! Clock-driven pump around a `PlaybackCursor`.

use rp_core::{Clock, PlaybackSnapshot, RenderSink, TimeMs};

use crate::{Advance, PlaybackCursor, PlaybackResult};

/// Converts wall time into cursor advances and emits snapshots.
///
/// The host's frame loop calls [`pump`][Self::pump] once per frame; the
/// driver measures the wall delta since the previous pump, applies it to the
/// cursor (which scales by the speed multiplier), and pushes one snapshot to
/// the sink per committed tick.
///
/// All play/pause/scrub commands go through the driver so the delta anchor
/// stays consistent: pausing clears it, which is what guarantees that wall
/// time spent paused never leaks into trip time on resume.  Ticks cannot
/// overlap — `pump` takes `&mut self`, and the single-threaded cooperative
/// model has no second caller.
pub struct PlaybackDriver<C: Clock, S: RenderSink<PlaybackSnapshot>> {
    cursor: PlaybackCursor,
    clock: C,
    sink: S,
    /// Wall instant of the previous pump; `None` whenever playback is not
    /// actively consuming wall time.
    anchor: Option<TimeMs>,
}

impl<C: Clock, S: RenderSink<PlaybackSnapshot>> PlaybackDriver<C, S> {
    pub fn new(cursor: PlaybackCursor, clock: C, sink: S) -> Self {
        Self { cursor, clock, sink, anchor: None }
    }

    // ── Commands (delegated, anchor-aware) ────────────────────────────────

    pub fn play(&mut self) {
        self.cursor.play();
        self.anchor = Some(self.clock.now());
    }

    pub fn pause(&mut self) {
        self.cursor.pause();
        self.anchor = None;
    }

    /// Scrub to `t`.  The cursor pauses implicitly, so the anchor is cleared
    /// here for the same reason as in [`pause`][Self::pause].
    pub fn scrub(&mut self, t: TimeMs) {
        self.cursor.scrub(t);
        self.anchor = None;
        // A scrub is a user-visible reposition; surface it immediately.
        self.sink.update(&self.cursor.snapshot());
    }

    pub fn set_speed(&mut self, speed: f64) -> PlaybackResult<()> {
        self.cursor.set_speed(speed)
    }

    // ── Pump ──────────────────────────────────────────────────────────────

    /// Run one playback tick if playing.
    ///
    /// Advances by the wall time elapsed since the previous pump (or since
    /// `play`, whichever is later) and emits exactly one snapshot per
    /// committed tick.
    pub fn pump(&mut self) -> Advance {
        if !self.cursor.is_playing() {
            return Advance::Idle;
        }
        let now = self.clock.now();
        let Some(prev) = self.anchor else {
            self.anchor = Some(now);
            return Advance::Idle;
        };
        // `since` clamps at zero, so a wall clock stepping backwards between
        // pumps stalls playback for that frame instead of rewinding it.
        let delta = now.since(prev);
        self.anchor = Some(now);

        let outcome = self.cursor.advance(delta);
        match outcome {
            Advance::Idle => {}
            Advance::Stepped => self.sink.update(&self.cursor.snapshot()),
            Advance::Finished => {
                self.sink.update(&self.cursor.snapshot());
                self.anchor = None;
            }
        }
        outcome
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Tear the driver apart, recovering the cursor and sink.
    pub fn into_parts(self) -> (PlaybackCursor, S) {
        (self.cursor, self.sink)
    }
}
