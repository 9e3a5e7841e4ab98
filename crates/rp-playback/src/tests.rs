//! Unit tests for the playback cursor and driver.

use std::sync::Arc;

use rp_core::{GeoPoint, ManualClock, PlaybackSnapshot, TimeMs, VecSink};
use rp_trip::{GpsSample, TripData, TripEvent};

use crate::{Advance, PlaybackCursor, PlaybackDriver, PlaybackError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sample(at_ms: i64, lat: f64, lng: f64) -> GpsSample {
    GpsSample::new(TimeMs(at_ms), GeoPoint::new(lat, lng))
}

/// Scenario A trip: two samples 60 s apart, one event active 10–50 s.
fn scenario_trip() -> Arc<TripData> {
    Arc::new(
        TripData::new(
            vec![sample(0, 0.0, 0.0), sample(60_000, 1.0, 1.0)],
            vec![TripEvent::new("e1", TimeMs(10_000), Some(TimeMs(50_000)))],
            vec![0.0, 157_000.0],
        )
        .unwrap(),
    )
}

fn long_trip() -> Arc<TripData> {
    Arc::new(
        TripData::from_samples(
            (0..10).map(|i| sample(i * 10_000, i as f64 * 0.1, 0.0)).collect(),
            vec![],
        )
        .unwrap(),
    )
}

#[cfg(test)]
mod cursor_tests {
    use super::*;

    #[test]
    fn scenario_a_forward_advance() {
        let mut cursor = PlaybackCursor::new(scenario_trip());
        cursor.play();

        assert_eq!(cursor.advance(30_000), Advance::Stepped);
        assert_eq!(cursor.current_time(), TimeMs(30_000));
        assert_eq!(cursor.position_index(), 0);
        let snap = cursor.snapshot();
        assert_eq!(snap.position, GeoPoint::new(0.5, 0.5));
        assert_eq!(snap.active_events, vec!["e1".to_owned()]);

        // Overshooting the end clamps, stops playback, and drops e1
        // (it ended at 50 000).
        assert_eq!(cursor.advance(40_000), Advance::Finished);
        assert_eq!(cursor.current_time(), TimeMs(60_000));
        assert!(!cursor.is_playing());
        assert!(cursor.active_event_ids().is_empty());
        assert_eq!(cursor.progress(), 100.0);
    }

    #[test]
    fn advance_while_paused_is_idle() {
        let mut cursor = PlaybackCursor::new(scenario_trip());
        assert_eq!(cursor.advance(10_000), Advance::Idle);
        assert_eq!(cursor.current_time(), TimeMs(0));
    }

    #[test]
    fn committed_deltas_sum_to_elapsed_time() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.play();
        let deltas = [1_000, 2_500, 7_000, 400, 11_000, 3_100];
        for d in deltas {
            assert_eq!(cursor.advance(d), Advance::Stepped);
        }
        let total: i64 = deltas.iter().sum();
        assert_eq!(cursor.current_time(), TimeMs(total));
    }

    #[test]
    fn index_monotone_under_forward_play() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.play();
        let mut last_index = 0;
        while cursor.advance(3_000) == Advance::Stepped {
            assert!(cursor.position_index() >= last_index);
            last_index = cursor.position_index();
        }
        assert_eq!(cursor.position_index(), 9);
    }

    #[test]
    fn speed_scales_committed_delta() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.set_speed(2.0).unwrap();
        cursor.play();
        cursor.advance(10_000);
        assert_eq!(cursor.current_time(), TimeMs(20_000));
        cursor.set_speed(0.5).unwrap();
        cursor.advance(10_000);
        assert_eq!(cursor.current_time(), TimeMs(25_000));
    }

    #[test]
    fn invalid_speeds_rejected() {
        let mut cursor = PlaybackCursor::new(long_trip());
        assert_eq!(cursor.set_speed(0.0), Err(PlaybackError::InvalidSpeed(0.0)));
        assert_eq!(cursor.set_speed(-1.0), Err(PlaybackError::InvalidSpeed(-1.0)));
        assert!(cursor.set_speed(f64::NAN).is_err());
        assert!(cursor.set_speed(f64::INFINITY).is_err());
        // Unaffected by the failed calls.
        assert_eq!(cursor.speed(), 1.0);
    }

    #[test]
    fn negative_delta_commits_nothing() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.play();
        cursor.advance(55_000);
        assert_eq!(cursor.position_index(), 5);

        // Moving backward is scrub's job; a negative delta is a stalled
        // frame, and the bracketing sample stays at or below current time.
        assert_eq!(cursor.advance(-50_000), Advance::Stepped);
        assert_eq!(cursor.current_time(), TimeMs(55_000));
        assert_eq!(cursor.position_index(), 5);
        let trip = cursor.trip();
        assert!(trip.samples()[cursor.position_index()].at <= cursor.current_time());
    }

    #[test]
    fn scrub_jumps_backward_and_recomputes() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.play();
        cursor.advance(55_000);
        assert_eq!(cursor.position_index(), 5);

        cursor.scrub(TimeMs(12_000));
        assert_eq!(cursor.current_time(), TimeMs(12_000));
        assert_eq!(cursor.position_index(), 1);
    }

    #[test]
    fn scrub_while_playing_pauses_first() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.play();
        cursor.scrub(TimeMs(30_000));
        assert!(!cursor.is_playing());
        // A subsequent advance commits nothing until play() is called again.
        assert_eq!(cursor.advance(5_000), Advance::Idle);
        assert_eq!(cursor.current_time(), TimeMs(30_000));
    }

    #[test]
    fn scrub_clamps_into_trip_bounds() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.scrub(TimeMs(-5_000));
        assert_eq!(cursor.current_time(), TimeMs(0));
        cursor.scrub(TimeMs(10_000_000));
        assert_eq!(cursor.current_time(), TimeMs(90_000));
        assert_eq!(cursor.position_index(), 9);
    }

    #[test]
    fn scrub_then_resume_restarts_forward_scan() {
        let mut cursor = PlaybackCursor::new(long_trip());
        cursor.play();
        cursor.advance(70_000);
        cursor.scrub(TimeMs(5_000));
        cursor.play();
        cursor.advance(10_000);
        // Index recomputed from the scrub point, not the stale scan position.
        assert_eq!(cursor.current_time(), TimeMs(15_000));
        assert_eq!(cursor.position_index(), 1);
    }

    #[test]
    fn open_ended_event_active_through_trip_end() {
        let trip = Arc::new(
            TripData::new(
                vec![sample(0, 0.0, 0.0), sample(60_000, 1.0, 1.0)],
                vec![TripEvent::new("open", TimeMs(20_000), None)],
                vec![0.0, 100.0],
            )
            .unwrap(),
        );
        let mut cursor = PlaybackCursor::new(trip);
        cursor.play();
        cursor.advance(100_000);
        assert!(cursor.active_event_ids().contains("open"));
    }

    #[test]
    fn progress_and_completed_distance() {
        let mut cursor = PlaybackCursor::new(scenario_trip());
        assert_eq!(cursor.progress(), 0.0);
        assert_eq!(cursor.completed_distance_m(), 0.0);
        cursor.play();
        cursor.advance(30_000);
        assert_eq!(cursor.progress(), 50.0);
        cursor.advance(40_000);
        assert_eq!(cursor.completed_distance_m(), 157_000.0);
    }

    #[test]
    fn single_sample_trip_constant() {
        let trip = Arc::new(
            TripData::new(vec![sample(0, 2.0, 3.0)], vec![], vec![0.0]).unwrap(),
        );
        let mut cursor = PlaybackCursor::new(trip);
        assert_eq!(cursor.progress(), 100.0);
        cursor.play();
        assert_eq!(cursor.advance(1_000), Advance::Finished);
        assert_eq!(cursor.snapshot().position, GeoPoint::new(2.0, 3.0));
    }
}

#[cfg(test)]
mod driver_tests {
    use super::*;

    fn driver() -> (
        PlaybackDriver<ManualClock, VecSink<PlaybackSnapshot>>,
        ManualClock,
    ) {
        let clock = ManualClock::new();
        let cursor = PlaybackCursor::new(long_trip());
        (PlaybackDriver::new(cursor, clock.clone(), VecSink::new()), clock)
    }

    #[test]
    fn pump_advances_by_wall_delta() {
        let (mut d, clock) = driver();
        d.play();
        clock.advance(4_000);
        assert_eq!(d.pump(), Advance::Stepped);
        assert_eq!(d.cursor().current_time(), TimeMs(4_000));
        clock.advance(6_000);
        d.pump();
        assert_eq!(d.cursor().current_time(), TimeMs(10_000));
        assert_eq!(d.sink().frames.len(), 2);
    }

    #[test]
    fn paused_wall_time_does_not_leak_into_trip_time() {
        let (mut d, clock) = driver();
        d.play();
        clock.advance(5_000);
        d.pump();
        d.pause();
        // A long pause...
        clock.advance(120_000);
        d.play();
        clock.advance(5_000);
        d.pump();
        assert_eq!(d.cursor().current_time(), TimeMs(10_000));
    }

    #[test]
    fn pump_while_paused_is_idle() {
        let (mut d, clock) = driver();
        clock.advance(10_000);
        assert_eq!(d.pump(), Advance::Idle);
        assert!(d.sink().frames.is_empty());
    }

    #[test]
    fn scrub_emits_immediate_frame_and_clears_anchor() {
        let (mut d, clock) = driver();
        d.play();
        clock.advance(3_000);
        d.pump();
        d.scrub(TimeMs(50_000));
        assert_eq!(d.sink().frames.last().unwrap().at, TimeMs(50_000));
        // Wall time passing after the scrub does not move the paused cursor.
        clock.advance(30_000);
        assert_eq!(d.pump(), Advance::Idle);
        assert_eq!(d.cursor().current_time(), TimeMs(50_000));
    }

    #[test]
    fn finish_emits_final_frame_and_stops() {
        let (mut d, clock) = driver();
        d.play();
        clock.advance(500_000);
        assert_eq!(d.pump(), Advance::Finished);
        let last = d.sink().frames.last().unwrap();
        assert_eq!(last.at, TimeMs(90_000));
        assert_eq!(last.progress_pct, 100.0);
        assert!(!last.playing);
    }

    #[test]
    fn backwards_wall_clock_stalls_instead_of_rewinding() {
        let (mut d, clock) = driver();
        d.play();
        clock.advance(40_000);
        d.pump();
        assert_eq!(d.cursor().current_time(), TimeMs(40_000));

        // Wall clock steps backwards (NTP correction, manual set).  The
        // frame stalls; the cursor never moves back.
        clock.set(TimeMs(10_000));
        assert_eq!(d.pump(), Advance::Stepped);
        assert_eq!(d.cursor().current_time(), TimeMs(40_000));

        // The anchor re-seats at the new wall instant, so forward motion
        // resumes with the next positive delta.
        clock.set(TimeMs(15_000));
        d.pump();
        assert_eq!(d.cursor().current_time(), TimeMs(45_000));
    }

    #[test]
    fn speed_applies_to_wall_delta() {
        let (mut d, clock) = driver();
        d.set_speed(4.0).unwrap();
        d.play();
        clock.advance(2_000);
        d.pump();
        assert_eq!(d.cursor().current_time(), TimeMs(8_000));
    }
}
