//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;

use crate::simulation::{Action, Direction, TrafficEnv, VehicleId};

/// Canvas size the simulation coordinates are laid out on
pub const CANVAS_WIDTH: f32 = 1400.0;
pub const CANVAS_HEIGHT: f32 = 800.0;

/// Canvas position of each direction's signal lamp, in round-robin order
pub const SIGNAL_LAMPS: [(f32, f32); 4] = [
    (530.0, 230.0),
    (810.0, 230.0),
    (810.0, 570.0),
    (530.0, 570.0),
];

/// Canvas position of each direction's countdown text
pub const SIGNAL_TIMERS: [(f32, f32); 4] = [
    (530.0, 205.0),
    (810.0, 205.0),
    (810.0, 545.0),
    (530.0, 545.0),
];

/// Convert a canvas point (origin top-left, y down) to Bevy world space
pub fn canvas_to_world(x: f32, y: f32) -> Vec2 {
    Vec2::new(x - CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0 - y)
}

/// Resource wrapper for the environment and the episode schedule
#[derive(Resource)]
pub struct EnvResource {
    pub env: TrafficEnv,
    pub action: Action,
    /// Episodes started so far, including the running one
    pub episode: u32,
    pub episodes: u32,
    pub last_reward: Option<i64>,
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Links a Bevy entity to a simulated vehicle
#[derive(Component)]
pub struct VehicleLink(pub VehicleId);

/// Lamp showing a direction's phase colour
#[derive(Component)]
pub struct SignalLamp(pub Direction);

/// Countdown text next to a lamp
#[derive(Component)]
pub struct SignalTimerText(pub Direction);

/// Text showing queue, crossing and reward figures
#[derive(Component)]
pub struct EpisodeText;
