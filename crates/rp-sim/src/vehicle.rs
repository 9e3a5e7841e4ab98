//! Per-vehicle mutable simulation state.

use std::collections::VecDeque;

use rp_core::{GeoPoint, TimeMs, TrailPoint, VehicleId, VehicleStatus};

use crate::RoutePlan;

/// Trail ring capacity.  Once full, the oldest point is evicted strictly
/// FIFO, regardless of whether it corresponds to a significant moment.
pub const MAX_TRAIL_POINTS: usize = 30;

// ── Delay events ──────────────────────────────────────────────────────────────

/// Cause of a transient delay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelayReason {
    /// Full stop — speed multiplier 0.
    Breakdown,
    /// Slowdown — speed multiplier in (0, 1).
    Traffic,
}

impl std::fmt::Display for DelayReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DelayReason::Breakdown => "breakdown",
            DelayReason::Traffic => "traffic",
        })
    }
}

/// A transient delay currently affecting a vehicle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayEvent {
    pub reason: DelayReason,
    /// Original duration, minutes (as reported in the forensic log).
    pub duration_min: u32,
    /// Simulated seconds left before the delay clears.
    pub remaining_secs: f64,
    /// Factor applied to the base speed while active (0 for a breakdown).
    pub speed_multiplier: f64,
}

// ── Stop progress ─────────────────────────────────────────────────────────────

/// Arrival/departure bookkeeping for one scheduled stop.
///
/// Both timestamps start unset; the engine sets each exactly once.  The
/// unset→set transition is what emits the corresponding forensic event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopProgress {
    pub arrived_at: Option<TimeMs>,
    pub departed_at: Option<TimeMs>,
}

// ── Trail ─────────────────────────────────────────────────────────────────────

/// Bounded FIFO ring of recent positions for fading-path rendering.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point, evicting the oldest once past [`MAX_TRAIL_POINTS`].
    pub fn push(&mut self, point: GeoPoint, at: TimeMs) {
        if self.points.len() == MAX_TRAIL_POINTS {
            self.points.pop_front();
        }
        self.points.push_back(TrailPoint { point, at });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    /// Copy out oldest-first for snapshot emission.
    pub fn to_vec(&self) -> Vec<TrailPoint> {
        self.points.iter().copied().collect()
    }
}

// ── VehicleState ──────────────────────────────────────────────────────────────

/// All mutable state for one simulated vehicle.  The engine is the only
/// writer; consumers see copies via snapshots.
#[derive(Clone, Debug)]
pub struct VehicleState {
    pub id: VehicleId,
    pub position: GeoPoint,
    /// Heading along the route, degrees `[0, 360)`.
    pub bearing: f64,
    /// Distance travelled along the route polyline, metres.
    pub route_pos_m: f64,
    /// Undelivered capacity units on board.
    pub capacity: u32,
    /// Delays currently in effect, in injection order.
    pub active_delays: Vec<DelayEvent>,
    pub is_dwelling: bool,
    /// Simulated seconds of dwell left; meaningful while `is_dwelling`.
    pub dwell_remaining_secs: f64,
    /// Index of the next unserved stop in the route's stop list.
    pub next_stop: usize,
    /// Per-stop arrival/departure bookkeeping, parallel to `route.stops`.
    pub stops: Vec<StopProgress>,
    pub is_complete: bool,
    pub trail: Trail,
}

impl VehicleState {
    /// Initial state at the route origin, fully loaded.
    pub fn initial(id: VehicleId, route: &RoutePlan) -> Self {
        let (position, bearing) = route.fix_at(0.0);
        Self {
            id,
            position,
            bearing,
            route_pos_m: 0.0,
            capacity: route.initial_capacity,
            active_delays: Vec::new(),
            is_dwelling: false,
            dwell_remaining_secs: 0.0,
            next_stop: 0,
            stops: vec![StopProgress::default(); route.stops.len()],
            is_complete: false,
            trail: Trail::new(),
        }
    }

    /// Operational status, derived fresh from the active-delay set and dwell
    /// flag.  Never cached — deriving on read is what makes staleness
    /// impossible.  A delayed vehicle reports `Delayed` even while dwelling.
    pub fn status(&self) -> VehicleStatus {
        if self.is_complete {
            VehicleStatus::Offline
        } else if !self.active_delays.is_empty() {
            VehicleStatus::Delayed
        } else if self.is_dwelling {
            VehicleStatus::Idle
        } else {
            VehicleStatus::Active
        }
    }

    /// Base speed scaled by the most restrictive active delay, km/h.
    pub fn effective_speed_kmh(&self, base_kmh: f64) -> f64 {
        let factor = self
            .active_delays
            .iter()
            .map(|d| d.speed_multiplier)
            .fold(1.0, f64::min);
        base_kmh * factor
    }
}
