//! Unit tests for the lifecycle state machine.

use std::cell::RefCell;
use std::rc::Rc;

use rp_core::ManualClock;

use crate::{LifecycleError, LifecycleMachine, RuntimeState};

use RuntimeState::*;

fn machine() -> (LifecycleMachine<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (LifecycleMachine::with_clock(clock.clone()), clock)
}

/// Drive a machine along the happy path to `Ready`.
fn ready_machine() -> (LifecycleMachine<ManualClock>, ManualClock) {
    let (mut m, clock) = machine();
    m.set_state(Initializing, "mount").unwrap();
    m.set_state(LoadingLayers, "init done").unwrap();
    m.set_state(LayersMounted, "layers loaded").unwrap();
    m.set_state(Ready, "mounted").unwrap();
    (m, clock)
}

#[cfg(test)]
mod transitions {
    use super::*;

    #[test]
    fn happy_path_reaches_ready() {
        let (m, _clock) = ready_machine();
        assert_eq!(m.state(), Ready);
        assert_eq!(m.history().len(), 4);
        assert!(m.can_accept_updates());
    }

    #[test]
    fn skipping_loading_states_errors() {
        // Scenario: UNINITIALIZED → INITIALIZING ok, then READY directly throws.
        let (mut m, _clock) = machine();
        m.set_state(Initializing, "mount").unwrap();
        let err = m.set_state(Ready, "eager").unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition { from: Initializing, to: Ready }
        );
        // The failed request leaves no trace.
        assert_eq!(m.state(), Initializing);
        assert_eq!(m.history().len(), 1);
    }

    #[test]
    fn every_out_of_table_pair_errors() {
        let all = [
            Uninitialized, Initializing, LoadingLayers, LayersMounted,
            Ready, Degraded, Detached, Destroyed,
        ];
        for from in all {
            for to in all {
                let clock = ManualClock::new();
                let mut m = LifecycleMachine::with_clock(clock);
                // Force the machine into `from` without going through the table.
                m.reset();
                force_state(&mut m, from);
                let result = m.set_state(to, "probe");
                if from.valid_targets().contains(&to) {
                    assert!(result.is_ok(), "{from} -> {to} should be valid");
                } else {
                    assert!(result.is_err(), "{from} -> {to} should be rejected");
                }
            }
        }
    }

    /// Walk the table to reach `target` from a fresh machine.
    fn force_state(m: &mut LifecycleMachine<ManualClock>, target: RuntimeState) {
        let path: &[RuntimeState] = match target {
            Uninitialized => &[],
            Initializing => &[Initializing],
            LoadingLayers => &[Initializing, LoadingLayers],
            LayersMounted => &[Initializing, LoadingLayers, LayersMounted],
            Ready => &[Initializing, LoadingLayers, LayersMounted, Ready],
            Degraded => &[Initializing, Degraded],
            Detached => &[Initializing, Detached],
            Destroyed => &[Destroyed],
        };
        for &s in path {
            m.set_state(s, "setup").unwrap();
        }
        assert_eq!(m.state(), target);
    }

    #[test]
    fn destroyed_only_escapes_to_uninitialized() {
        let (mut m, _clock) = machine();
        m.set_state(Destroyed, "teardown").unwrap();
        assert!(m.set_state(Initializing, "no").is_err());
        assert!(m.set_state(Ready, "no").is_err());
        m.set_state(Uninitialized, "revive").unwrap();
        assert_eq!(m.state(), Uninitialized);
    }

    #[test]
    fn history_records_from_to_reason() {
        let (mut m, _clock) = machine();
        m.set_state(Initializing, "mount").unwrap();
        let rec = &m.history()[0];
        assert_eq!(rec.from, Uninitialized);
        assert_eq!(rec.to, Initializing);
        assert_eq!(rec.reason, "mount");
    }

    #[test]
    fn can_accept_updates_only_ready_or_degraded() {
        let (mut m, _clock) = machine();
        assert!(!m.can_accept_updates());
        m.set_state(Initializing, "mount").unwrap();
        assert!(!m.can_accept_updates());
        m.set_state(Degraded, "fail").unwrap();
        assert!(m.can_accept_updates());
        m.set_state(Ready, "recovered").unwrap();
        assert!(m.can_accept_updates());
    }
}

#[cfg(test)]
mod timeouts {
    use super::*;

    #[test]
    fn initializing_degrades_after_budget() {
        let (mut m, clock) = machine();
        m.set_state(Initializing, "mount").unwrap();
        clock.advance(9_999);
        assert!(!m.poll());
        assert_eq!(m.state(), Initializing);
        clock.advance(1);
        assert!(m.poll());
        assert_eq!(m.state(), Degraded);
        assert_eq!(m.history().last().unwrap().reason, "timeout");
    }

    #[test]
    fn timeout_fires_exactly_once() {
        let (mut m, clock) = machine();
        m.set_state(Initializing, "mount").unwrap();
        clock.advance(60_000);
        assert!(m.poll());
        assert!(!m.poll());
        assert!(!m.poll());
        assert_eq!(m.state(), Degraded);
        // Exactly one timeout entry in the history.
        let timeouts = m.history().iter().filter(|r| r.reason == "timeout").count();
        assert_eq!(timeouts, 1);
    }

    #[test]
    fn transition_cancels_pending_deadline() {
        let (mut m, clock) = machine();
        m.set_state(Initializing, "mount").unwrap();
        clock.advance(9_000);
        m.set_state(LoadingLayers, "init done").unwrap();
        // The old 10 s deadline is gone; LoadingLayers armed a fresh 5 s one.
        clock.advance(4_999);
        assert!(!m.poll());
        clock.advance(1);
        assert!(m.poll());
        assert_eq!(m.state(), Degraded);
    }

    #[test]
    fn degraded_recovers_to_ready_when_stall_resolves() {
        let (mut m, clock) = machine();
        m.set_state(Initializing, "mount").unwrap();
        clock.advance(20_000);
        assert!(m.poll());
        // The stalled init completes late; the surface recovers.
        m.set_state(Ready, "late init completed").unwrap();
        assert_eq!(m.state(), Ready);
    }

    #[test]
    fn ready_has_no_deadline() {
        let (mut m, clock) = ready_machine();
        clock.advance(1_000_000);
        assert!(!m.poll());
        assert_eq!(m.state(), Ready);
    }
}

#[cfg(test)]
mod listeners {
    use super::*;

    #[test]
    fn listeners_notified_in_order() {
        let (mut m, _clock) = machine();
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();

        let s1 = seen.clone();
        m.add_listener(move |rec| {
            s1.borrow_mut().push(format!("first:{}", rec.to));
            Ok(())
        });
        let s2 = seen.clone();
        m.add_listener(move |rec| {
            s2.borrow_mut().push(format!("second:{}", rec.to));
            Ok(())
        });

        m.set_state(Initializing, "mount").unwrap();
        assert_eq!(
            *seen.borrow(),
            vec!["first:INITIALIZING".to_owned(), "second:INITIALIZING".to_owned()]
        );
    }

    #[test]
    fn failing_listener_does_not_abort_transition_or_peers() {
        let (mut m, _clock) = machine();
        let called: Rc<RefCell<u32>> = Rc::default();

        m.add_listener(|_rec| Err("listener exploded".into()));
        let c = called.clone();
        m.add_listener(move |_rec| {
            *c.borrow_mut() += 1;
            Ok(())
        });

        m.set_state(Initializing, "mount").unwrap();
        assert_eq!(m.state(), Initializing);
        assert_eq!(*called.borrow(), 1);
    }

    #[test]
    fn destroy_clears_listeners() {
        let (mut m, _clock) = machine();
        let called: Rc<RefCell<u32>> = Rc::default();
        let c = called.clone();
        m.add_listener(move |_rec| {
            *c.borrow_mut() += 1;
            Ok(())
        });

        m.destroy();
        assert_eq!(m.state(), Destroyed);
        m.set_state(Uninitialized, "revive").unwrap();
        // The listener registered before destroy() must not fire again.
        assert_eq!(*called.borrow(), 0);
    }
}

#[cfg(test)]
mod reset {
    use super::*;

    #[test]
    fn reset_clears_history_and_returns_to_uninitialized() {
        let (mut m, _clock) = ready_machine();
        m.reset();
        assert_eq!(m.state(), Uninitialized);
        assert!(m.history().is_empty());
        // The machine is fully reusable.
        m.set_state(Initializing, "remount").unwrap();
        assert_eq!(m.state(), Initializing);
    }

    #[test]
    fn reset_cancels_pending_deadline() {
        let (mut m, clock) = machine();
        m.set_state(Initializing, "mount").unwrap();
        m.reset();
        clock.advance(60_000);
        assert!(!m.poll());
        assert_eq!(m.state(), Uninitialized);
    }
}
