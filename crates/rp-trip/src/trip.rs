//! `TripData` and its load-time validation.

use rp_core::{GeoPoint, TimeMs};

use crate::{TripError, TripResult};

// ── GpsSample ─────────────────────────────────────────────────────────────────

/// One recorded GPS fix.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsSample {
    pub at: TimeMs,
    pub point: GeoPoint,
    /// Recorded heading, degrees `[0, 360)`.  When absent, the course is
    /// computed from the surrounding segment during interpolation.
    pub bearing: Option<f64>,
}

impl GpsSample {
    pub fn new(at: TimeMs, point: GeoPoint) -> Self {
        Self { at, point, bearing: None }
    }
}

// ── TripEvent ─────────────────────────────────────────────────────────────────

/// A discrete event recorded during the trip (a stop, an alert, a geofence
/// crossing).  `end: None` means open-ended: the event stays active for the
/// remainder of playback.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripEvent {
    pub id: String,
    pub start: TimeMs,
    pub end: Option<TimeMs>,
}

impl TripEvent {
    pub fn new(id: impl Into<String>, start: TimeMs, end: Option<TimeMs>) -> Self {
        Self { id: id.into(), start, end }
    }

    /// `start ≤ t ≤ end`, or `start ≤ t` for open-ended events.
    #[inline]
    pub fn is_active_at(&self, t: TimeMs) -> bool {
        self.start <= t && self.end.is_none_or(|end| t <= end)
    }
}

// ── TripData ──────────────────────────────────────────────────────────────────

/// An immutable recorded trip.
///
/// Fields are private: the validation performed by [`TripData::new`] is what
/// lets every downstream query (`sample_index_at`, `fix_at`, the event
/// window) skip re-checking its inputs.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripData {
    samples: Vec<GpsSample>,
    events: Vec<TripEvent>,
    /// Recorded distance up to each sample, metres.  Same length as
    /// `samples`, non-decreasing.
    cumulative_m: Vec<f64>,
}

impl TripData {
    /// Validate and construct a trip.
    ///
    /// # Errors
    ///
    /// - [`TripError::EmptyTrack`] — no samples.
    /// - [`TripError::NonMonotonicTimestamp`] — timestamps not strictly ascending.
    /// - [`TripError::DistanceLengthMismatch`] / [`TripError::DecreasingDistance`]
    ///   — malformed cumulative-distance vector.
    /// - [`TripError::UnsortedEvents`] / [`TripError::EventEndsBeforeStart`]
    ///   — malformed event list.
    pub fn new(
        samples: Vec<GpsSample>,
        events: Vec<TripEvent>,
        cumulative_m: Vec<f64>,
    ) -> TripResult<Self> {
        if samples.is_empty() {
            return Err(TripError::EmptyTrack);
        }
        for (i, pair) in samples.windows(2).enumerate() {
            if pair[1].at <= pair[0].at {
                return Err(TripError::NonMonotonicTimestamp { index: i + 1 });
            }
        }
        if cumulative_m.len() != samples.len() {
            return Err(TripError::DistanceLengthMismatch {
                samples: samples.len(),
                distances: cumulative_m.len(),
            });
        }
        for (i, pair) in cumulative_m.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(TripError::DecreasingDistance { index: i + 1 });
            }
        }
        for (i, pair) in events.windows(2).enumerate() {
            if pair[1].start < pair[0].start {
                return Err(TripError::UnsortedEvents { index: i + 1 });
            }
        }
        for event in &events {
            if let Some(end) = event.end
                && end < event.start
            {
                return Err(TripError::EventEndsBeforeStart { id: event.id.clone() });
            }
        }
        Ok(Self { samples, events, cumulative_m })
    }

    /// Construct a trip from raw samples, deriving cumulative distances by
    /// haversine.  For providers that ship positions without an odometer.
    pub fn from_samples(samples: Vec<GpsSample>, events: Vec<TripEvent>) -> TripResult<Self> {
        let mut cumulative_m = Vec::with_capacity(samples.len());
        let mut total = 0.0;
        for (i, s) in samples.iter().enumerate() {
            if i > 0 {
                total += samples[i - 1].point.distance_m(s.point);
            }
            cumulative_m.push(total);
        }
        Self::new(samples, events, cumulative_m)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn samples(&self) -> &[GpsSample] {
        &self.samples
    }

    pub fn events(&self) -> &[TripEvent] {
        &self.events
    }

    pub fn cumulative_m(&self) -> &[f64] {
        &self.cumulative_m
    }

    /// Timestamp of the first sample.
    pub fn start_time(&self) -> TimeMs {
        self.samples[0].at
    }

    /// Timestamp of the last sample.
    pub fn end_time(&self) -> TimeMs {
        self.samples[self.samples.len() - 1].at
    }

    /// Total trip duration; 0 for a single-sample trip.
    pub fn duration_ms(&self) -> i64 {
        self.end_time() - self.start_time()
    }
}
