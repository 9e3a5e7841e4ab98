//! Position-index search and interpolation between bracketing samples.
//!
//! Two search strategies, matching the two ways a cursor moves:
//!
//! - [`TripData::advance_index`] — incremental forward-only scan, amortized
//!   O(1) per tick under sequential playback.
//! - [`TripData::sample_index_at`] — O(log n) binary search for random-access
//!   scrubbing, which may jump arbitrarily far in either direction.
//!
//! Both return an index `i` upholding the bracketing invariant:
//! `samples[i].at ≤ t`, and `t < samples[i+1].at` unless `i` is the last
//! index (with `t` before the first sample clamping to `i = 0`).

use rp_core::geo::lerp_bearing;
use rp_core::{GeoPoint, TimeMs};

use crate::TripData;

/// An interpolated position/bearing pair.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    pub point: GeoPoint,
    /// Degrees `[0, 360)`.
    pub bearing: f64,
}

impl TripData {
    // ── Index search ──────────────────────────────────────────────────────

    /// Binary search for the active sample index at `t`.
    ///
    /// Times before the first sample clamp to index 0; times at or past the
    /// last sample clamp to the last index.
    pub fn sample_index_at(&self, t: TimeMs) -> usize {
        // First index whose timestamp is > t, minus one.
        let after = self.samples().partition_point(|s| s.at <= t);
        after.saturating_sub(1)
    }

    /// Advance `index` forward while the next sample's timestamp is ≤ `t`.
    ///
    /// The returned index never decreases; under forward play this touches
    /// at most the samples actually crossed, so a whole playback session
    /// costs O(n) total.  A scrub invalidates the caller's index — recompute
    /// via [`sample_index_at`][Self::sample_index_at] afterwards.
    pub fn advance_index(&self, index: usize, t: TimeMs) -> usize {
        let samples = self.samples();
        let mut i = index.min(samples.len() - 1);
        while i + 1 < samples.len() && samples[i + 1].at <= t {
            i += 1;
        }
        i
    }

    // ── Interpolation ─────────────────────────────────────────────────────

    /// Interpolated fix for time `t` inside the segment starting at `index`.
    ///
    /// The fraction `(t - t_i) / (t_{i+1} - t_i)` is clamped to `[0, 1]`, so
    /// a `t` outside the segment yields the nearer endpoint.  At the last
    /// index the sample is returned verbatim — no extrapolation past trip
    /// end.  Bearing uses the recorded values when both endpoints carry one
    /// (shortest-arc interpolation), else the course of the segment.
    pub fn fix_at(&self, index: usize, t: TimeMs) -> Fix {
        let samples = self.samples();
        let i = index.min(samples.len() - 1);
        let a = &samples[i];

        if i + 1 >= samples.len() {
            return Fix {
                point: a.point,
                bearing: a.bearing.unwrap_or_else(|| self.trailing_bearing(i)),
            };
        }
        let b = &samples[i + 1];

        let span = (b.at - a.at) as f64;
        let f = ((t - a.at) as f64 / span).clamp(0.0, 1.0);

        let bearing = match (a.bearing, b.bearing) {
            (Some(ba), Some(bb)) => lerp_bearing(ba, bb, f),
            _ => a.point.initial_bearing_to(b.point),
        };

        Fix { point: a.point.lerp(b.point, f), bearing }
    }

    /// Bearing to report at the final sample of a trip with no recorded
    /// heading there: the course of the last segment, or 0 for a
    /// single-sample trip.
    fn trailing_bearing(&self, i: usize) -> f64 {
        let samples = self.samples();
        if i == 0 {
            0.0
        } else {
            samples[i - 1].point.initial_bearing_to(samples[i].point)
        }
    }
}
