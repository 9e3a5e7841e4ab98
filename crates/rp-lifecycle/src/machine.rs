//! `RuntimeState`, the transition table, and `LifecycleMachine`.

use std::fmt;

use rp_core::{Clock, SystemClock, TimeMs};

use crate::{LifecycleError, LifecycleResult};

// ── RuntimeState ──────────────────────────────────────────────────────────────

/// Lifecycle state of a map surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuntimeState {
    Uninitialized,
    Initializing,
    LoadingLayers,
    LayersMounted,
    Ready,
    /// A guarded async state overran its budget, or an operation failed in a
    /// recoverable way.  Updates are still accepted; recovery to `Ready` is
    /// allowed once the stalled operation completes late.
    Degraded,
    /// The surface is unmounted but may be re-initialized.
    Detached,
    /// Terminal.  Only escape: an explicit transition to `Uninitialized`.
    Destroyed,
}

impl RuntimeState {
    /// States reachable from `self`.  This table is the single source of
    /// truth for transition validity.
    pub fn valid_targets(self) -> &'static [RuntimeState] {
        use RuntimeState::*;
        match self {
            Uninitialized => &[Initializing, Destroyed],
            Initializing => &[LoadingLayers, Degraded, Detached, Destroyed],
            LoadingLayers => &[LayersMounted, Degraded, Detached, Destroyed],
            LayersMounted => &[Ready, Degraded, Detached, Destroyed],
            Ready => &[Detached, Degraded, Destroyed],
            Degraded => &[Ready, Detached, Destroyed],
            Detached => &[Initializing, Destroyed],
            Destroyed => &[Uninitialized],
        }
    }

    /// Timeout budget for states that wait on an async operation.
    ///
    /// If the machine sits in such a state past its budget, [`poll`]
    /// auto-transitions to [`Degraded`] with reason `"timeout"`.
    ///
    /// [`poll`]: LifecycleMachine::poll
    /// [`Degraded`]: RuntimeState::Degraded
    pub fn timeout_budget_ms(self) -> Option<i64> {
        match self {
            RuntimeState::Initializing => Some(10_000),
            RuntimeState::LoadingLayers => Some(5_000),
            RuntimeState::LayersMounted => Some(2_000),
            _ => None,
        }
    }
}

impl fmt::Display for RuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuntimeState::Uninitialized => "UNINITIALIZED",
            RuntimeState::Initializing => "INITIALIZING",
            RuntimeState::LoadingLayers => "LOADING_LAYERS",
            RuntimeState::LayersMounted => "LAYERS_MOUNTED",
            RuntimeState::Ready => "READY",
            RuntimeState::Degraded => "DEGRADED",
            RuntimeState::Detached => "DETACHED",
            RuntimeState::Destroyed => "DESTROYED",
        };
        f.write_str(s)
    }
}

// ── TransitionRecord ──────────────────────────────────────────────────────────

/// One entry in the machine's transition history.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionRecord {
    pub from: RuntimeState,
    pub to: RuntimeState,
    pub reason: String,
    pub at: TimeMs,
}

/// Outcome of a single listener invocation.  An `Err` is logged and isolated;
/// it never aborts the transition or the remaining listeners.
pub type ListenerResult = Result<(), Box<dyn std::error::Error>>;

type Listener = Box<dyn FnMut(&TransitionRecord) -> ListenerResult>;

// ── LifecycleMachine ──────────────────────────────────────────────────────────

/// The lifecycle state machine for one map surface.
///
/// One instance is created per surface mount and destroyed on unmount.  All
/// mutation goes through [`set_state`], [`poll`], [`reset`], and [`destroy`];
/// there is no other writer.
///
/// [`set_state`]: LifecycleMachine::set_state
/// [`poll`]: LifecycleMachine::poll
/// [`reset`]: LifecycleMachine::reset
/// [`destroy`]: LifecycleMachine::destroy
pub struct LifecycleMachine<C: Clock = SystemClock> {
    clock: C,
    state: RuntimeState,
    history: Vec<TransitionRecord>,
    listeners: Vec<Listener>,
    /// Armed while the current state has an unexpired timeout budget.
    deadline: Option<TimeMs>,
}

impl LifecycleMachine<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for LifecycleMachine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> LifecycleMachine<C> {
    /// Create a machine in `Uninitialized` driven by the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: RuntimeState::Uninitialized,
            history: Vec::new(),
            listeners: Vec::new(),
            deadline: None,
        }
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    /// Full transition history, oldest first.
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// `true` only in `Ready` or `Degraded` — the states in which a map
    /// surface may safely receive layer updates.
    pub fn can_accept_updates(&self) -> bool {
        matches!(self.state, RuntimeState::Ready | RuntimeState::Degraded)
    }

    /// Register a transition listener.
    ///
    /// Listeners are notified synchronously, in registration order, after the
    /// state has changed and the history entry has been recorded.  A listener
    /// returning `Err` is logged and skipped over; the transition itself and
    /// the other listeners are unaffected.
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&TransitionRecord) -> ListenerResult + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Request a transition to `to`.
    ///
    /// Validates against the static table; an out-of-table request returns
    /// [`LifecycleError::InvalidTransition`] and leaves the machine
    /// untouched.  On success: the pending deadline (if any) is cancelled, a
    /// history entry is recorded, listeners are notified, and a new deadline
    /// is armed when `to` carries a timeout budget.
    pub fn set_state(&mut self, to: RuntimeState, reason: &str) -> LifecycleResult<()> {
        if !self.state.valid_targets().contains(&to) {
            return Err(LifecycleError::InvalidTransition { from: self.state, to });
        }
        self.transition(to, reason);
        Ok(())
    }

    /// Check the armed deadline against the clock.
    ///
    /// Call this from the host's frame loop.  If the current state's budget
    /// has expired, the machine transitions to `Degraded` with reason
    /// `"timeout"` and returns `true`.  The deadline is consumed first, so a
    /// given stall degrades the surface exactly once.
    pub fn poll(&mut self) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if self.clock.now() < deadline {
            return false;
        }
        self.deadline = None;
        tracing::warn!(
            state = %self.state,
            "lifecycle state overran its budget; degrading"
        );
        // Every state with a budget lists Degraded as a valid target.
        self.transition(RuntimeState::Degraded, "timeout");
        true
    }

    /// Clear history and return to `Uninitialized` for reinitialization.
    ///
    /// Allowed from any state, including `Destroyed`.  Listeners are kept;
    /// the pending deadline is cancelled and no transition is recorded (the
    /// history starts fresh).
    pub fn reset(&mut self) {
        self.deadline = None;
        self.history.clear();
        self.state = RuntimeState::Uninitialized;
    }

    /// Tear the machine down: clear listeners, cancel the pending deadline,
    /// and move to the terminal `Destroyed` state.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.deadline = None;
        if self.state != RuntimeState::Destroyed {
            let record = TransitionRecord {
                from: self.state,
                to: RuntimeState::Destroyed,
                reason: "destroy".to_owned(),
                at: self.clock.now(),
            };
            self.state = RuntimeState::Destroyed;
            self.history.push(record);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Commit a table-validated transition.
    fn transition(&mut self, to: RuntimeState, reason: &str) {
        self.deadline = None;

        let now = self.clock.now();
        let record = TransitionRecord {
            from: self.state,
            to,
            reason: reason.to_owned(),
            at: now,
        };
        self.state = to;
        self.history.push(record.clone());

        for listener in &mut self.listeners {
            if let Err(e) = listener(&record) {
                tracing::warn!(
                    from = %record.from,
                    to = %record.to,
                    error = %e,
                    "lifecycle listener failed; continuing"
                );
            }
        }

        if let Some(budget) = to.timeout_budget_ms() {
            self.deadline = Some(now + budget);
        }
    }
}
