//! `rp-playback` — deterministic trip replay.
//!
//! [`PlaybackCursor`] owns the mutable replay state (time, speed, active
//! sample index, active event set) over an immutable
//! [`TripData`][rp_trip::TripData] and is its only writer.  It supports two
//! access patterns with different search strategies:
//!
//! - **Forward advance** while playing: incremental forward-only index scan,
//!   amortized O(1) per tick.
//! - **Scrub** while paused: O(log n) binary search, since a scrub may jump
//!   arbitrarily far in either direction.
//!
//! Scrubbing while playing **implicitly pauses first** — the scrub then
//! behaves identically whether the request arrived during playback or not,
//! and no in-flight advance can interleave with it.
//!
//! [`PlaybackDriver`] wires a cursor to an injected
//! [`Clock`][rp_core::Clock] and a [`RenderSink`][rp_core::RenderSink],
//! converting wall time into `advance` deltas and emitting one
//! [`PlaybackSnapshot`][rp_core::PlaybackSnapshot] per completed tick.

pub mod cursor;
pub mod driver;
pub mod error;

#[cfg(test)]
mod tests;

pub use cursor::{Advance, PlaybackCursor};
pub use driver::PlaybackDriver;
pub use error::{PlaybackError, PlaybackResult};
