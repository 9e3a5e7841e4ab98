//! `rp-core` — foundational types for the routeplay playback/simulation runtime.
//!
//! This crate is a dependency of every other `rp-*` crate.  It intentionally
//! has no `rp-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `VehicleId`, `StopId`                                  |
//! | [`geo`]      | `GeoPoint`, haversine distance, bearing interpolation  |
//! | [`time`]     | `TimeMs`, the `Clock` trait, `SystemClock`, `ManualClock` |
//! | [`rng`]      | `VehicleRng` — per-vehicle deterministic RNG           |
//! | [`snapshot`] | Plain-data frames handed to the rendering collaborator |
//! | [`sink`]     | `RenderSink` — the one-way rendering seam              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod sink;
pub mod snapshot;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::GeoPoint;
pub use ids::{StopId, VehicleId};
pub use rng::VehicleRng;
pub use sink::{NoopSink, RenderSink, VecSink};
pub use snapshot::{
    FleetSnapshot, PlaybackSnapshot, TrailPoint, VehicleSnapshot, VehicleStatus,
};
pub use time::{Clock, ManualClock, SystemClock, TimeMs};
