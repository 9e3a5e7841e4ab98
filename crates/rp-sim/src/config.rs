//! Engine configuration.

use crate::{SimError, SimResult};

/// What the synthetic fleet is being generated for.
///
/// The mode selects the delay-injection probability profile; everything else
/// about the tick loop is identical across modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimMode {
    /// Showcase traffic: occasional delays, mostly smooth movement.
    #[default]
    Demo,
    /// Heavily perturbed traffic for exercising degraded-mode UI paths.
    Stress,
}

/// Top-level simulation configuration.
///
/// | Field              | Default |
/// |--------------------|---------|
/// | `mode`             | `Demo`  |
/// | `seed`             | 42      |
/// | `tick_interval_ms` | 2000    |
/// | `playback_speed`   | 1.0     |
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    pub mode: SimMode,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Simulated milliseconds per tick.  Also the wall interval between
    /// ticks at `playback_speed` 1.
    pub tick_interval_ms: u64,

    /// Wall-time acceleration.  Affects *pacing only*: each tick still
    /// advances simulated time by `tick_interval_ms`, so an identical tick
    /// count yields identical output at any speed.
    pub playback_speed: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::Demo,
            seed: 42,
            tick_interval_ms: 2_000,
            playback_speed: 1.0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(SimError::Config("tick_interval_ms must be > 0".into()));
        }
        if !self.playback_speed.is_finite() || self.playback_speed <= 0.0 {
            return Err(SimError::Config(format!(
                "playback_speed must be finite and > 0 (got {})",
                self.playback_speed
            )));
        }
        Ok(())
    }

    /// Simulated seconds each tick represents.
    #[inline]
    pub fn tick_delta_secs(&self) -> f64 {
        self.tick_interval_ms as f64 / 1_000.0
    }

    /// Wall milliseconds between ticks at the current playback speed.
    #[inline]
    pub fn wall_interval_ms(&self) -> i64 {
        ((self.tick_interval_ms as f64 / self.playback_speed).round() as i64).max(1)
    }

    /// Per-tick probability of injecting a delay into an undelayed vehicle.
    #[inline]
    pub fn delay_probability(&self) -> f64 {
        match self.mode {
            SimMode::Demo => 0.05,
            SimMode::Stress => 0.18,
        }
    }
}
