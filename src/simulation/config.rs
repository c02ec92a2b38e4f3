//! Static configuration for the intersection
//!
//! The defaults describe the reference four-way intersection drawn on a
//! 1400x800 canvas. All coordinates are canvas coordinates with y growing
//! downwards.

use anyhow::{ensure, Result};

use super::types::{Direction, VehicleClass, LANES_PER_APPROACH};

/// Signal timing, in simulated seconds
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTiming {
    /// Green duration per direction before any adjustment
    pub default_green: [u32; 4],
    pub default_red: u32,
    pub default_yellow: u32,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            default_green: [10; 4],
            default_red: 150,
            default_yellow: 5,
        }
    }
}

/// Layout of one approach leg
#[derive(Debug, Clone, PartialEq)]
pub struct ApproachGeometry {
    /// Coordinate along the travel axis where vehicles enter
    pub spawn: f32,
    /// Cross-axis coordinate of each lane
    pub lanes: [f32; LANES_PER_APPROACH],
    /// A vehicle whose leading edge passes this line has crossed
    pub stop_line: f32,
    /// Where the first queued vehicle halts
    pub default_stop: f32,
    /// Canvas edge beyond which crossed vehicles are evicted
    pub exit: f32,
}

/// Per-class kinematics and body size
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProfile {
    /// Distance units per frame
    pub speed: f32,
    /// Body extent along the travel axis
    pub length: f32,
    /// Body extent across the travel axis
    pub width: f32,
}

/// Everything the environment needs to build an intersection
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionConfig {
    pub timing: SignalTiming,
    /// Indexed by `Direction::index`
    pub approaches: [ApproachGeometry; 4],
    /// Indexed by `VehicleClass::index`
    pub classes: [ClassProfile; 4],
    /// Minimum gap between queued vehicles' stop bounds
    pub stopping_gap: f32,
    /// Minimum gap kept behind the vehicle ahead while moving
    pub moving_gap: f32,
    /// Motion frames per simulated second
    pub frames_per_second: u32,
    /// Vehicles emitted on each generator tick; zero disables arrivals
    pub arrivals_per_tick: u32,
    /// Relative arrival weight per direction
    pub direction_weights: [u32; 4],
    /// Full rotations every direction must finish before the episode ends
    pub cycles_per_episode: u32,
    /// Seed for the vehicle generator; `None` draws from the thread RNG
    pub seed: Option<u64>,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            timing: SignalTiming::default(),
            approaches: [
                ApproachGeometry {
                    spawn: 0.0,
                    lanes: [348.0, 370.0, 398.0],
                    stop_line: 590.0,
                    default_stop: 580.0,
                    exit: 1400.0,
                },
                ApproachGeometry {
                    spawn: 0.0,
                    lanes: [755.0, 727.0, 697.0],
                    stop_line: 330.0,
                    default_stop: 320.0,
                    exit: 800.0,
                },
                ApproachGeometry {
                    spawn: 1400.0,
                    lanes: [498.0, 466.0, 436.0],
                    stop_line: 800.0,
                    default_stop: 810.0,
                    exit: 0.0,
                },
                ApproachGeometry {
                    spawn: 800.0,
                    lanes: [602.0, 627.0, 657.0],
                    stop_line: 535.0,
                    default_stop: 545.0,
                    exit: 0.0,
                },
            ],
            classes: [
                ClassProfile {
                    speed: 2.25,
                    length: 40.0,
                    width: 20.0,
                },
                ClassProfile {
                    speed: 1.8,
                    length: 70.0,
                    width: 26.0,
                },
                ClassProfile {
                    speed: 1.8,
                    length: 60.0,
                    width: 26.0,
                },
                ClassProfile {
                    speed: 2.5,
                    length: 22.0,
                    width: 12.0,
                },
            ],
            stopping_gap: 15.0,
            moving_gap: 15.0,
            frames_per_second: 60,
            arrivals_per_tick: 1,
            direction_weights: [25; 4],
            cycles_per_episode: 1,
            seed: None,
        }
    }
}

impl IntersectionConfig {
    /// Default configuration with a fixed generator seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn approach(&self, direction: Direction) -> &ApproachGeometry {
        &self.approaches[direction.index()]
    }

    pub fn class(&self, class: VehicleClass) -> &ClassProfile {
        &self.classes[class.index()]
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        ensure!(self.frames_per_second > 0, "frames_per_second must be positive");
        ensure!(
            self.timing.default_yellow > 0,
            "default_yellow must be at least one second"
        );
        ensure!(
            self.direction_weights.iter().any(|w| *w > 0),
            "at least one direction weight must be positive"
        );
        ensure!(self.cycles_per_episode > 0, "cycles_per_episode must be positive");
        ensure!(
            self.stopping_gap >= 0.0 && self.moving_gap >= 0.0,
            "gaps must not be negative"
        );
        for (class, profile) in VehicleClass::ALL.iter().zip(&self.classes) {
            ensure!(
                profile.speed > 0.0 && profile.length > 0.0 && profile.width > 0.0,
                "{} profile needs positive speed and size",
                class
            );
        }
        for direction in Direction::ALL {
            let approach = self.approach(direction);
            ensure!(
                direction.is_beyond(approach.stop_line, approach.spawn),
                "{} stop line must lie ahead of the spawn point",
                direction
            );
            ensure!(
                direction.is_beyond(approach.exit, approach.stop_line),
                "{} exit edge must lie ahead of the stop line",
                direction
            );
        }
        Ok(())
    }
}
