//! Static route definitions: the read-only input a fleet is built from.

use rp_core::{GeoPoint, StopId};

use crate::{SimError, SimResult};

// ── StopPlan ──────────────────────────────────────────────────────────────────

/// A scheduled delivery stop along a route.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopPlan {
    pub id: StopId,
    pub name: String,
    /// Position of the stop as a distance along the route polyline, metres.
    pub route_offset_m: f64,
    /// How long the vehicle dwells at the stop, simulated seconds.
    pub dwell_secs: f64,
    /// Capacity units delivered at this stop.
    pub allocation: u32,
}

// ── RoutePlan ─────────────────────────────────────────────────────────────────

/// A precomputed vehicle route: polyline, base speed, ordered stops, and the
/// load the vehicle starts with.  Immutable once built.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePlan {
    pub name: String,
    waypoints: Vec<GeoPoint>,
    /// Haversine distance up to each waypoint, metres.  Same length as
    /// `waypoints`, non-decreasing, starts at 0.
    cumulative_m: Vec<f64>,
    pub base_speed_kmh: f64,
    /// Stops sorted by `route_offset_m`.
    pub stops: Vec<StopPlan>,
    /// Capacity units loaded at departure.
    pub initial_capacity: u32,
}

impl RoutePlan {
    /// Build a route, precomputing cumulative distances and validating the
    /// stop schedule against the polyline.
    pub fn new(
        name: impl Into<String>,
        waypoints: Vec<GeoPoint>,
        base_speed_kmh: f64,
        stops: Vec<StopPlan>,
        initial_capacity: u32,
    ) -> SimResult<Self> {
        let name = name.into();
        if waypoints.len() < 2 {
            return Err(SimError::RouteTooShort { name });
        }
        if !base_speed_kmh.is_finite() || base_speed_kmh <= 0.0 {
            return Err(SimError::InvalidSpeed { name });
        }

        let mut cumulative_m = Vec::with_capacity(waypoints.len());
        let mut total = 0.0;
        for (i, w) in waypoints.iter().enumerate() {
            if i > 0 {
                total += waypoints[i - 1].distance_m(*w);
            }
            cumulative_m.push(total);
        }

        for (i, pair) in stops.windows(2).enumerate() {
            if pair[1].route_offset_m < pair[0].route_offset_m {
                return Err(SimError::UnorderedStops { name, index: i + 1 });
            }
        }
        for (i, stop) in stops.iter().enumerate() {
            if stop.route_offset_m < 0.0 || stop.route_offset_m > total {
                return Err(SimError::StopOutOfRange { name, index: i });
            }
        }

        Ok(Self {
            name,
            waypoints,
            cumulative_m,
            base_speed_kmh,
            stops,
            initial_capacity,
        })
    }

    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    /// Total route length, metres.
    #[inline]
    pub fn total_m(&self) -> f64 {
        self.cumulative_m[self.cumulative_m.len() - 1]
    }

    /// Position and heading at `dist_m` along the polyline.
    ///
    /// `dist_m` is clamped into `[0, total_m]`.  The heading is the course
    /// of the segment containing the point (the final segment's course at
    /// the route end).
    pub fn fix_at(&self, dist_m: f64) -> (GeoPoint, f64) {
        let total = self.total_m();
        let d = dist_m.clamp(0.0, total);

        // Segment containing d: last waypoint whose cumulative distance ≤ d.
        let after = self.cumulative_m.partition_point(|&c| c <= d);
        let i = after.saturating_sub(1).min(self.waypoints.len() - 2);

        let a = self.waypoints[i];
        let b = self.waypoints[i + 1];
        let seg_len = self.cumulative_m[i + 1] - self.cumulative_m[i];
        let f = if seg_len > 0.0 {
            ((d - self.cumulative_m[i]) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };

        (a.lerp(b, f), a.initial_bearing_to(b))
    }
}
