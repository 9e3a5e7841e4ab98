//! `rp-sim` — seeded, deterministic fleet simulation.
//!
//! The engine generates synthetic telemetry (positions, delays, arrivals,
//! capacity depletion) for demo and forensic use.  Two runs built with the
//! same seed and fed the same tick sequence produce bit-identical positions
//! and forensic event logs — that property is what makes a recorded demo
//! replayable and a reported anomaly reproducible.
//!
//! # Per-tick order
//!
//! ```text
//! for each vehicle (ascending VehicleId):
//!   ① Delays    — age active delay events; maybe inject a new one (seeded RNG).
//!   ② Dwell     — count down a stop dwell; on departure decrement capacity.
//!   ③ Advance   — move by speed_effective * delta_secs along the route.
//!   ④ Arrivals  — unset→set stop-timestamp transitions emit forensic events.
//!   ⑤ Trail     — push the new position into the FIFO trail ring.
//! status is derived fresh from ① + ② when read; never stored.
//! ```
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`config`]  | `SimConfig`, `SimMode`, documented defaults             |
//! | [`route`]   | `RoutePlan`, `StopPlan` — static, read-only definitions |
//! | [`vehicle`] | `VehicleState`, delay events, the trail ring            |
//! | [`events`]  | `ForensicEvent`, append-only `EventLog`                 |
//! | [`engine`]  | `SimulationEngine` — tick loop and pacing               |
//! | [`error`]   | `SimError`, `SimResult<T>`                              |

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod route;
pub mod vehicle;


pub use config::{SimConfig, SimMode};
pub use engine::SimulationEngine;
pub use error::{SimError, SimResult};
pub use events::{EventLog, ForensicEvent, ForensicKind};
pub use route::{RoutePlan, StopPlan};
pub use vehicle::{DelayEvent, DelayReason, StopProgress, Trail, VehicleState, MAX_TRAIL_POINTS};
