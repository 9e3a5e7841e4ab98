//! Plain-data frames handed to the rendering collaborator.
//!
//! Snapshots carry everything a map layer needs to draw one frame — positions,
//! bearings, trails, active event IDs — and nothing about *how* to draw it.
//! They are produced once per tick, after position, event, and status
//! recomputation have all completed, so a consumer never observes a
//! half-updated frame.

use crate::{GeoPoint, TimeMs, VehicleId};

// ── Trip playback ─────────────────────────────────────────────────────────────

/// One frame of trip replay: the interpolated fix plus derived cursor state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackSnapshot {
    /// Trip time of this frame.
    pub at: TimeMs,
    /// Interpolated position between the bracketing GPS samples.
    pub position: GeoPoint,
    /// Interpolated bearing, degrees `[0, 360)`.
    pub bearing: f64,
    /// Trip completion percentage, clamped to `[0, 100]`.
    pub progress_pct: f64,
    /// Cumulative recorded distance up to the active sample, metres.
    pub completed_m: f64,
    /// IDs of the discrete trip events active at `at`, sorted.
    pub active_events: Vec<String>,
    /// Whether the cursor was still playing when the frame was emitted.
    pub playing: bool,
}

// ── Fleet simulation ──────────────────────────────────────────────────────────

/// A recent-position trail entry for fading-path rendering.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailPoint {
    pub point: GeoPoint,
    pub at: TimeMs,
}

/// Operational status of a simulated vehicle.
///
/// Always derived fresh from the active-delay set and dwell flag — never
/// stored — so it can not go stale.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleStatus {
    /// Moving along its route.
    Active,
    /// At least one delay event is in effect.
    Delayed,
    /// Dwelling at a delivery stop.
    Idle,
    /// Route complete; no longer updating.
    Offline,
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Delayed => "delayed",
            VehicleStatus::Idle => "idle",
            VehicleStatus::Offline => "offline",
        };
        f.write_str(s)
    }
}

/// Per-vehicle slice of a fleet frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSnapshot {
    pub vehicle: VehicleId,
    pub position: GeoPoint,
    /// Heading along the route, degrees `[0, 360)`.
    pub bearing: f64,
    /// Effective speed this tick (base speed scaled by active delays), km/h.
    pub speed_kmh: f64,
    pub status: VehicleStatus,
    /// Undelivered capacity units remaining on board.
    pub capacity: u32,
    /// Distance travelled along the route polyline, metres.
    pub route_pos_m: f64,
    /// Labels of active delay events (e.g. `"traffic"`), in injection order.
    pub active_delays: Vec<String>,
    /// Bounded recent-position history, oldest first.
    pub trail: Vec<TrailPoint>,
}

/// One frame of the fleet simulation: every vehicle at a common sim time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSnapshot {
    /// Simulated time of this frame.
    pub at: TimeMs,
    /// Per-vehicle state, ascending `VehicleId`.
    pub vehicles: Vec<VehicleSnapshot>,
}
