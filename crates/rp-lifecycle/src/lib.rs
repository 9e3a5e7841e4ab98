//! `rp-lifecycle` — the map-surface lifecycle state machine.
//!
//! A map surface moves through an explicit set of states from mount to
//! teardown; layer updates are only safe in a subset of them.  The machine
//! here is the single authority on that question:
//!
//! ```text
//! UNINITIALIZED → INITIALIZING → LOADING_LAYERS → LAYERS_MOUNTED → READY
//!                      │               │                │            │
//!                      └───────────────┴── (timeout) ───┴──► DEGRADED ◄┘
//! ```
//!
//! Invalid transition requests **error** — they are never silently ignored,
//! because an out-of-table request is exactly how an initialization race
//! surfaces during development.
//!
//! The three async states (`Initializing`, `LoadingLayers`, `LayersMounted`)
//! carry timeout budgets.  The runtime is single-threaded cooperative, so a
//! budget is an armed *deadline* checked by [`LifecycleMachine::poll`]
//! against the injected [`Clock`][rp_core::Clock] rather than a timer thread;
//! an expired deadline degrades the surface exactly once, and recovery to
//! `Ready` is permitted when the stalled operation completes late.

pub mod error;
pub mod machine;

#[cfg(test)]
mod tests;

pub use error::{LifecycleError, LifecycleResult};
pub use machine::{LifecycleMachine, ListenerResult, RuntimeState, TransitionRecord};
