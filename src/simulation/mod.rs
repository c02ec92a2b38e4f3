//! Standalone intersection simulation module
//!
//! This module contains the signal scheduler, vehicle generator, car-following
//! motion and the episode controller. It runs headless and can be tested
//! without booting up any rendering.

mod cadence;
mod config;
mod env;
mod frame;
mod generator;
mod lane;
mod scheduler;
mod signal;
mod types;
mod vehicle;
mod world;

pub use cadence::Cadence;
pub use config::{ApproachGeometry, ClassProfile, IntersectionConfig, SignalTiming};
pub use env::{EpisodeState, EpisodeStats, StepResult, TrafficEnv};
pub use frame::{Frame, FrameSink, NullSink, SignalView, VehicleView};
pub use generator::{Arrival, VehicleGenerator};
pub use lane::{AdmissionRules, LaneQueue};
pub use scheduler::{PhaseEvent, SignalScheduler};
pub use signal::Signal;
pub use types::{
    Action, Direction, Observation, Phase, VehicleClass, VehicleId, LANES_PER_APPROACH,
};
pub use vehicle::{MotionRules, Vehicle, VehicleUpdateResult};
pub use world::{FrameReport, IntersectionWorld};
