//! Stochastic vehicle arrivals
//!
//! Each generator tick emits `arrivals_per_tick` vehicles. The class and lane
//! are uniform; the direction is drawn from a cumulative threshold table so
//! unequal direction weights work the same way as the default equal split.

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::types::{Direction, VehicleClass, LANES_PER_APPROACH};

/// A vehicle the generator wants placed at the tail of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub direction: Direction,
    pub lane: usize,
    pub class: VehicleClass,
}

/// Emits new vehicles on every generator tick
#[derive(Debug, Clone)]
pub struct VehicleGenerator {
    /// Cumulative upper bounds, one per direction in round-robin order
    thresholds: [u32; 4],
    arrivals_per_tick: u32,
    /// Optional seeded RNG for reproducible episodes
    rng: Option<StdRng>,
}

impl VehicleGenerator {
    pub fn new(direction_weights: [u32; 4], arrivals_per_tick: u32, seed: Option<u64>) -> Self {
        let mut thresholds = [0; 4];
        let mut total = 0u32;
        for (threshold, weight) in thresholds.iter_mut().zip(direction_weights) {
            total = total.saturating_add(weight);
            *threshold = total;
        }

        Self {
            thresholds,
            arrivals_per_tick,
            rng: seed.map(StdRng::seed_from_u64),
        }
    }

    /// Cumulative direction thresholds, e.g. `[25, 50, 75, 100]` for an even split
    pub fn thresholds(&self) -> &[u32; 4] {
        &self.thresholds
    }

    /// Get a random value in `0..upper`, using the seeded RNG if available
    fn random_below(&mut self, upper: u32) -> u32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(0..upper),
            None => rand::rng().random_range(0..upper),
        }
    }

    /// Map a roll in `0..total` onto the first direction whose threshold exceeds it
    pub fn direction_for_roll(&self, roll: u32) -> Direction {
        self.thresholds
            .iter()
            .position(|threshold| roll < *threshold)
            .and_then(Direction::from_index)
            .unwrap_or(Direction::North)
    }

    fn sample(&mut self) -> Arrival {
        let class = VehicleClass::ALL[self.random_below(VehicleClass::ALL.len() as u32) as usize];
        let lane = self.random_below(LANES_PER_APPROACH as u32) as usize;
        let total = self.thresholds[3].max(1);
        let roll = self.random_below(total);
        let direction = self.direction_for_roll(roll);

        debug!(
            "generating vehicle: type {}, lane {}, direction {}",
            class, lane, direction
        );

        Arrival {
            direction,
            lane,
            class,
        }
    }

    /// Run one generator tick
    pub fn tick(&mut self) -> Vec<Arrival> {
        (0..self.arrivals_per_tick).map(|_| self.sample()).collect()
    }
}
