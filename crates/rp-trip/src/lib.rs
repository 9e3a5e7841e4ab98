//! `rp-trip` — immutable recorded-trip data and the read-only queries over it.
//!
//! A [`TripData`] is loaded once per session and never mutated: GPS samples
//! with strictly ascending timestamps, discrete events (possibly open-ended),
//! and a cumulative-distance vector.  Malformed input is rejected at load —
//! an empty track or a non-monotonic timestamp fails fast with a descriptive
//! [`TripError`] instead of producing undefined interpolation downstream.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`trip`]   | `TripData`, `GpsSample`, `TripEvent`, load validation      |
//! | [`window`] | Active-event-window computation                            |
//! | [`interp`] | Index search (forward scan + binary search), interpolation |
//! | [`error`]  | `TripError`, `TripResult<T>`                               |

pub mod error;
pub mod interp;
pub mod trip;
pub mod window;


pub use error::{TripError, TripResult};
pub use interp::Fix;
pub use trip::{GpsSample, TripData, TripEvent};
pub use window::active_event_ids;
