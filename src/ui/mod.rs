//! UI module that draws the intersection using Bevy
//!
//! This module is purely a frame sink - all simulation logic is in the
//! `simulation` module. The UI drives the environment one frame per fixed
//! update and reads back plain snapshots to draw.

mod components;
mod input;
mod sync;
mod world;

use bevy::log::LogPlugin;
use bevy::prelude::*;

pub use components::EnvResource;

use crate::simulation::{Action, IntersectionConfig, TrafficEnv};
use input::handle_input;
use sync::{sync_signals, sync_vehicles, tick_environment, update_episode_text};
use world::setup_world;

/// Plugin to register all UI systems
pub struct TrafficEnvUIPlugin;

impl Plugin for TrafficEnvUIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_world)
            .add_systems(FixedUpdate, tick_environment)
            .add_systems(
                Update,
                (
                    sync_vehicles,
                    sync_signals,
                    update_episode_text,
                    handle_input,
                ),
            );
    }
}

/// Run `episodes` episodes of `action` in a window
pub fn run(config: IntersectionConfig, action: Action, episodes: u32) {
    let fps = config.frames_per_second.max(1);

    let mut env = match TrafficEnv::new(config) {
        Ok(env) => env,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    };
    let mut episode = 0;
    if episodes > 0 {
        if let Err(err) = env.begin(action) {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
        episode = 1;
    }

    println!("Starting Traffic Signal Env UI...");
    println!("  ESC - Exit");

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,traffic_signal_env=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Traffic Signal Env".into(),
                        resolution: (1400, 800).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(Time::<Fixed>::from_hz(f64::from(fps)))
        .insert_resource(EnvResource {
            env,
            action,
            episode,
            episodes,
            last_reward: None,
        })
        .add_plugins(TrafficEnvUIPlugin)
        .run();
}
