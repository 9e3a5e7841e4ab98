//! Active-event-window computation.
//!
//! The window is recomputed by a full linear scan on every query.  Event
//! lists on recorded trips are tens of entries, so O(events) per tick is
//! noise next to rendering; the load-time sort validation keeps a monotonic
//! start/end pointer optimization on the table if trips ever carry thousands
//! of events.

use std::collections::BTreeSet;

use rp_core::TimeMs;

use crate::{TripData, TripEvent};

/// IDs of every event whose `[start, end]` interval contains `t`
/// (open-ended events match whenever `start ≤ t`).
///
/// The result is a set: duplicate-free, order-irrelevant.  `BTreeSet` keeps
/// iteration deterministic for snapshot emission and tests.
pub fn active_event_ids(events: &[TripEvent], t: TimeMs) -> BTreeSet<String> {
    events
        .iter()
        .filter(|e| e.is_active_at(t))
        .map(|e| e.id.clone())
        .collect()
}

impl TripData {
    /// The active event window at `t`.  See [`active_event_ids`].
    pub fn active_events_at(&self, t: TimeMs) -> BTreeSet<String> {
        active_event_ids(self.events(), t)
    }
}
