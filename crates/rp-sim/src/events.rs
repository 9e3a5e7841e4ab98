//! The forensic event log: the ground truth for later replay and analysis.

use rp_core::{StopId, TimeMs, VehicleId};

use crate::DelayReason;

/// What happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForensicKind {
    /// A transient delay was injected into the vehicle.
    DelayInjected {
        reason: DelayReason,
        duration_min: u32,
        speed_multiplier: f64,
    },
    /// The vehicle reached a scheduled stop and began dwelling.
    StopArrival { stop: StopId },
    /// The vehicle departed a stop with its delivery made.
    DeliveryComplete {
        stop: StopId,
        units: u32,
        remaining_capacity: u32,
    },
    /// The vehicle reached the end of its route.
    RouteComplete,
}

/// One discrete simulation event, stamped with the simulated time at which
/// it occurred.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForensicEvent {
    pub at: TimeMs,
    pub vehicle: VehicleId,
    pub kind: ForensicKind,
}

/// Append-only, time-ordered event record.
///
/// Entries are never mutated after append; analysis code may hold indices
/// into the log across ticks.
#[derive(Debug, Default, PartialEq)]
pub struct EventLog {
    events: Vec<ForensicEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.  Events must arrive in non-decreasing simulated
    /// time; the engine appends within its tick loop, which guarantees this.
    pub fn record(&mut self, event: ForensicEvent) {
        debug_assert!(
            self.events.last().is_none_or(|last| last.at <= event.at),
            "forensic log must stay time-ordered"
        );
        self.events.push(event);
    }

    pub fn events(&self) -> &[ForensicEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
