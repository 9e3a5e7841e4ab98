//! The `SimulationEngine` and its tick loop.

use rp_core::{
    FleetSnapshot, RenderSink, TimeMs, VehicleId, VehicleRng, VehicleSnapshot,
};

use crate::{
    DelayEvent, DelayReason, EventLog, ForensicEvent, ForensicKind, RoutePlan, SimConfig,
    SimError, SimResult, VehicleState,
};

// Delay-injection model.  A breakdown is rarer than a slowdown but halts the
// vehicle outright.
const BREAKDOWN_SHARE: f64 = 0.2;
const BREAKDOWN_DURATION_MIN: std::ops::RangeInclusive<u32> = 5..=15;
const TRAFFIC_DURATION_MIN: std::ops::RangeInclusive<u32> = 2..=10;
const TRAFFIC_MULTIPLIER: std::ops::Range<f64> = 0.3..0.7;

/// Deterministic multi-vehicle movement simulator.
///
/// One vehicle per [`RoutePlan`], stepped in ascending [`VehicleId`] order
/// every tick.  The engine owns all mutable vehicle state and the forensic
/// log exclusively; consumers receive plain-data [`FleetSnapshot`]s.
///
/// Pacing is cooperative: the host's frame loop calls
/// [`pump`][Self::pump] with the current wall time and the engine runs
/// however many fixed-interval ticks have come due.  `pump` takes
/// `&mut self`, so overlapping in-flight ticks cannot exist.
#[derive(Debug)]
pub struct SimulationEngine {
    config: SimConfig,
    routes: Vec<RoutePlan>,
    vehicles: Vec<VehicleState>,
    rngs: Vec<VehicleRng>,
    log: EventLog,
    /// Simulated time; advances by `tick_interval_ms` per tick.
    sim_time: TimeMs,
    running: bool,
    /// Wall deadline of the next due tick; `None` when stopped or when
    /// pacing must be re-armed (after `reset` or a speed change).
    next_tick_at: Option<TimeMs>,
}

impl SimulationEngine {
    /// Build an engine with one vehicle per route, all at their origins.
    pub fn new(config: SimConfig, routes: Vec<RoutePlan>) -> SimResult<Self> {
        config.validate()?;
        if routes.is_empty() {
            return Err(SimError::NoRoutes);
        }

        let vehicles = Self::build_vehicles(&routes);
        let rngs = Self::build_rngs(config.seed, routes.len());

        Ok(Self {
            config,
            routes,
            vehicles,
            rngs,
            log: EventLog::new(),
            sim_time: TimeMs::ZERO,
            running: false,
            next_tick_at: None,
        })
    }

    fn build_vehicles(routes: &[RoutePlan]) -> Vec<VehicleState> {
        routes
            .iter()
            .enumerate()
            .map(|(i, route)| VehicleState::initial(VehicleId(i as u32), route))
            .collect()
    }

    fn build_rngs(seed: u64, count: usize) -> Vec<VehicleRng> {
        (0..count)
            .map(|i| VehicleRng::new(seed, VehicleId(i as u32)))
            .collect()
    }

    // ── Lifecycle commands ────────────────────────────────────────────────

    /// Begin periodic ticking.  Idempotent: calling while already running
    /// logs a warning and changes nothing.
    pub fn start(&mut self, now: TimeMs) {
        if self.running {
            tracing::warn!("simulation engine already running; start() ignored");
            return;
        }
        self.running = true;
        self.next_tick_at = Some(now + self.config.wall_interval_ms());
    }

    /// Cancel periodic ticking.  State is retained; `start` resumes.
    pub fn stop(&mut self) {
        self.running = false;
        self.next_tick_at = None;
    }

    /// Restore every vehicle to its initial state, clear the forensic log,
    /// and re-seed the RNGs identically.
    ///
    /// A run after `reset()` reproduces the original run's output exactly,
    /// given the same tick count.  Pacing is re-armed on the next pump.
    pub fn reset(&mut self) {
        self.vehicles = Self::build_vehicles(&self.routes);
        self.rngs = Self::build_rngs(self.config.seed, self.routes.len());
        self.log = EventLog::new();
        self.sim_time = TimeMs::ZERO;
        self.next_tick_at = None;
    }

    /// Change the wall-time acceleration.
    ///
    /// Cancels the pending tick deadline before the next one is armed, so a
    /// speed change can never produce duplicate or overlapping advances.
    pub fn set_playback_speed(&mut self, speed: f64) -> SimResult<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SimError::Config(format!(
                "playback_speed must be finite and > 0 (got {speed})"
            )));
        }
        self.config.playback_speed = speed;
        self.next_tick_at = None;
        Ok(())
    }

    /// Force a delay onto a vehicle (demo "simulate breakdown" control and
    /// forensic reproduction).  Recorded in the log like an injected one.
    pub fn inject_delay(
        &mut self,
        vehicle: VehicleId,
        reason: DelayReason,
        duration_min: u32,
        speed_multiplier: f64,
    ) -> SimResult<()> {
        let state = self
            .vehicles
            .get_mut(vehicle.index())
            .ok_or(SimError::UnknownVehicle(vehicle))?;
        state.active_delays.push(DelayEvent {
            reason,
            duration_min,
            remaining_secs: duration_min as f64 * 60.0,
            speed_multiplier,
        });
        self.log.record(ForensicEvent {
            at: self.sim_time,
            vehicle,
            kind: ForensicKind::DelayInjected { reason, duration_min, speed_multiplier },
        });
        Ok(())
    }

    // ── Pacing ────────────────────────────────────────────────────────────

    /// Run every tick that has come due by wall time `now`, emitting one
    /// snapshot per executed tick.  Returns the number of ticks run.
    ///
    /// The first pump after `start`/`reset`/a speed change arms the deadline
    /// without ticking.
    pub fn pump<S: RenderSink<FleetSnapshot>>(&mut self, now: TimeMs, sink: &mut S) -> usize {
        if !self.running {
            return 0;
        }
        let interval = self.config.wall_interval_ms();
        let Some(mut next) = self.next_tick_at else {
            self.next_tick_at = Some(now + interval);
            return 0;
        };

        let mut ran = 0;
        while now >= next {
            self.tick();
            sink.update(&self.snapshot());
            next = next + interval;
            ran += 1;
        }
        self.next_tick_at = Some(next);
        ran
    }

    /// Run exactly `n` ticks regardless of pacing.
    ///
    /// The forensic replay path and the test suite drive the engine through
    /// this: determinism is defined over tick sequences, not wall time.
    pub fn run_ticks<S: RenderSink<FleetSnapshot>>(&mut self, n: u64, sink: &mut S) {
        for _ in 0..n {
            self.tick();
            sink.update(&self.snapshot());
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance simulated time by one interval and step every vehicle.
    ///
    /// A tick fully completes position, event, and status recomputation for
    /// the whole fleet before any snapshot is taken from it.
    fn tick(&mut self) {
        self.sim_time = self.sim_time + self.config.tick_interval_ms as i64;
        let now = self.sim_time;
        let delta_secs = self.config.tick_delta_secs();
        let delay_p = self.config.delay_probability();

        for (i, vehicle) in self.vehicles.iter_mut().enumerate() {
            step_vehicle(
                &self.routes[i],
                vehicle,
                &mut self.rngs[i],
                &mut self.log,
                now,
                delta_secs,
                delay_p,
            );
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sim_time(&self) -> TimeMs {
        self.sim_time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn routes(&self) -> &[RoutePlan] {
        &self.routes
    }

    pub fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    /// The append-only forensic event log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// One fully recomputed frame of the whole fleet.
    pub fn snapshot(&self) -> FleetSnapshot {
        let vehicles = self
            .vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| VehicleSnapshot {
                vehicle: v.id,
                position: v.position,
                bearing: v.bearing,
                speed_kmh: v.effective_speed_kmh(self.routes[i].base_speed_kmh),
                status: v.status(),
                capacity: v.capacity,
                route_pos_m: v.route_pos_m,
                active_delays: v.active_delays.iter().map(|d| d.reason.to_string()).collect(),
                trail: v.trail.to_vec(),
            })
            .collect();
        FleetSnapshot { at: self.sim_time, vehicles }
    }
}

// ── Per-vehicle step ──────────────────────────────────────────────────────────

/// Advance one vehicle by one tick.
///
/// Order within the step is fixed (delays → dwell → movement → arrival
/// detection → trail); determinism depends on it and on the per-vehicle RNG
/// being consumed in exactly this sequence.
fn step_vehicle(
    route: &RoutePlan,
    v: &mut VehicleState,
    rng: &mut VehicleRng,
    log: &mut EventLog,
    now: TimeMs,
    delta_secs: f64,
    delay_p: f64,
) {
    if v.is_complete {
        return;
    }

    // ── ① Delays: age active ones, maybe inject a new one ────────────────
    for delay in &mut v.active_delays {
        delay.remaining_secs -= delta_secs;
    }
    v.active_delays.retain(|d| d.remaining_secs > 0.0);

    if v.active_delays.is_empty() && rng.gen_bool(delay_p) {
        let (reason, duration_min, speed_multiplier) = if rng.gen_bool(BREAKDOWN_SHARE) {
            (DelayReason::Breakdown, rng.gen_range(BREAKDOWN_DURATION_MIN), 0.0)
        } else {
            (
                DelayReason::Traffic,
                rng.gen_range(TRAFFIC_DURATION_MIN),
                rng.gen_range(TRAFFIC_MULTIPLIER),
            )
        };
        v.active_delays.push(DelayEvent {
            reason,
            duration_min,
            remaining_secs: duration_min as f64 * 60.0,
            speed_multiplier,
        });
        log.record(ForensicEvent {
            at: now,
            vehicle: v.id,
            kind: ForensicKind::DelayInjected { reason, duration_min, speed_multiplier },
        });
    }

    // Stop bookkeeping before mutation; the unset→set diff below is what
    // emits arrival/departure events exactly once.
    let watched_stop = v.next_stop;
    let before = v.stops.get(watched_stop).cloned();

    // ── ② Dwell / ③ movement ─────────────────────────────────────────────
    if v.is_dwelling {
        // Position frozen; the dwell timer counts down.
        v.dwell_remaining_secs -= delta_secs;
        if v.dwell_remaining_secs <= 0.0 {
            v.is_dwelling = false;
            v.dwell_remaining_secs = 0.0;
            v.stops[watched_stop].departed_at = Some(now);
            v.capacity = v.capacity.saturating_sub(route.stops[watched_stop].allocation);
            v.next_stop += 1;
        }
    } else {
        let speed = v.effective_speed_kmh(route.base_speed_kmh);
        v.route_pos_m += speed / 3.6 * delta_secs;

        if let Some(stop) = route.stops.get(watched_stop)
            && v.route_pos_m >= stop.route_offset_m
        {
            // Snap to the stop and begin dwelling there.
            v.route_pos_m = stop.route_offset_m;
            v.stops[watched_stop].arrived_at = Some(now);
            v.is_dwelling = true;
            v.dwell_remaining_secs = stop.dwell_secs;
        } else if watched_stop >= route.stops.len() && v.route_pos_m >= route.total_m() {
            v.route_pos_m = route.total_m();
            v.is_complete = true;
            log.record(ForensicEvent {
                at: now,
                vehicle: v.id,
                kind: ForensicKind::RouteComplete,
            });
        }
    }

    let (position, bearing) = route.fix_at(v.route_pos_m);
    v.position = position;
    v.bearing = bearing;

    // ── ④ Arrival/departure detection by timestamp transition ─────────────
    if let (Some(before), Some(after)) = (before, v.stops.get(watched_stop)) {
        let stop_id = route.stops[watched_stop].id;
        if before.arrived_at.is_none() && after.arrived_at.is_some() {
            log.record(ForensicEvent {
                at: now,
                vehicle: v.id,
                kind: ForensicKind::StopArrival { stop: stop_id },
            });
        }
        if before.departed_at.is_none() && after.departed_at.is_some() {
            log.record(ForensicEvent {
                at: now,
                vehicle: v.id,
                kind: ForensicKind::DeliveryComplete {
                    stop: stop_id,
                    units: route.stops[watched_stop].allocation,
                    remaining_capacity: v.capacity,
                },
            });
        }
    }

    // ── ⑤ Trail ───────────────────────────────────────────────────────────
    v.trail.push(v.position, now);
}
