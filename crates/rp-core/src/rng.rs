//! Deterministic per-vehicle RNG.
//!
//! # Determinism strategy
//!
//! Each simulated vehicle gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (vehicle_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive vehicle IDs uniformly across the seed space.
//! This means:
//!
//! - Vehicles never share RNG state, so per-vehicle draws are independent of
//!   fleet iteration order.
//! - Adding a route at the end of the fleet does not disturb the streams of
//!   existing vehicles — recorded demo runs stay reproducible as fleets grow.
//! - `SimulationEngine::reset()` reconstructs every `VehicleRng` from the
//!   same `(seed, id)` pair, reproducing the original output bit-for-bit.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::VehicleId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-vehicle deterministic RNG.
///
/// Create one per vehicle at engine init; store in a `Vec<VehicleRng>`
/// parallel to the vehicle state vector.
#[derive(Debug)]
pub struct VehicleRng(SmallRng);

impl VehicleRng {
    /// Seed deterministically from the run's global seed and a vehicle ID.
    pub fn new(global_seed: u64, vehicle: VehicleId) -> Self {
        let seed = global_seed ^ (vehicle.0 as u64).wrapping_mul(MIXING_CONSTANT);
        VehicleRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
