//! Systems for driving the environment and syncing Bevy entities with it

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::{
    canvas_to_world, EnvResource, EpisodeText, SignalLamp, SignalTimerText, VehicleLink,
};
use crate::simulation::{EpisodeState, Phase, VehicleClass, VehicleId};

/// System to run one motion frame, starting the next episode when one ends
pub fn tick_environment(mut res: ResMut<EnvResource>) {
    let res = &mut *res;
    if res.env.state() != EpisodeState::Running {
        return;
    }

    match res.env.advance_frame() {
        Ok(Some(result)) => {
            info!(
                "episode {} finished: reward {}, observation {:?}",
                res.episode, result.reward, result.observation
            );
            res.last_reward = Some(result.reward);

            if res.episode < res.episodes {
                let mut config = res.env.config().clone();
                config.seed = config.seed.map(|seed| seed.wrapping_add(1));
                let started = res
                    .env
                    .reset_with(config)
                    .and_then(|_| res.env.begin(res.action));
                match started {
                    Ok(()) => res.episode += 1,
                    Err(err) => error!("could not start next episode: {:#}", err),
                }
            }
        }
        Ok(None) => {}
        Err(err) => error!("frame failed: {:#}", err),
    }
}

/// System to sync vehicle sprites from simulation state
pub fn sync_vehicles(
    mut commands: Commands,
    res: Res<EnvResource>,
    mut vehicle_query: Query<(Entity, &VehicleLink, &mut Transform)>,
) {
    let frame = res.env.world().snapshot();

    // Update existing vehicles and track which ones still exist
    let mut existing: HashSet<VehicleId> = HashSet::new();

    for (entity, link, mut transform) in vehicle_query.iter_mut() {
        match frame.vehicles.iter().find(|v| v.id == link.0) {
            Some(vehicle) => {
                existing.insert(link.0);
                let center = canvas_to_world(
                    vehicle.x + vehicle.width / 2.0,
                    vehicle.y + vehicle.height / 2.0,
                );
                transform.translation = Vec3::new(center.x, center.y, 3.0);
            }
            None => {
                // Vehicle was evicted or the episode was reset
                commands.entity(entity).despawn();
            }
        }
    }

    // Spawn sprites for vehicles that entered since the last frame
    for vehicle in frame.vehicles.iter().filter(|v| !existing.contains(&v.id)) {
        let color = match vehicle.class {
            VehicleClass::Car => Color::srgb(0.85, 0.2, 0.2),
            VehicleClass::Bus => Color::srgb(0.95, 0.75, 0.1),
            VehicleClass::Truck => Color::srgb(0.2, 0.4, 0.85),
            VehicleClass::Bike => Color::srgb(0.2, 0.8, 0.3),
        };
        let center = canvas_to_world(
            vehicle.x + vehicle.width / 2.0,
            vehicle.y + vehicle.height / 2.0,
        );
        commands.spawn((
            VehicleLink(vehicle.id),
            Sprite::from_color(color, Vec2::new(vehicle.width, vehicle.height)),
            Transform::from_xyz(center.x, center.y, 3.0),
        ));
    }
}

/// System to colour the lamps and update the countdown text
pub fn sync_signals(
    res: Res<EnvResource>,
    mut lamp_query: Query<(&SignalLamp, &mut Sprite)>,
    mut timer_query: Query<(&SignalTimerText, &mut Text2d)>,
) {
    let frame = res.env.world().snapshot();

    for (lamp, mut sprite) in lamp_query.iter_mut() {
        let view = &frame.signals[lamp.0.index()];
        sprite.color = match view.phase {
            Phase::Red => Color::srgb(0.8, 0.1, 0.1),
            Phase::Yellow => Color::srgb(0.95, 0.8, 0.1),
            Phase::Green => Color::srgb(0.1, 0.8, 0.2),
        };
    }

    for (timer, mut text) in timer_query.iter_mut() {
        text.0 = frame.signals[timer.0.index()].display_text();
    }
}

/// System to show queue lengths, crossings and the last reward
pub fn update_episode_text(
    res: Res<EnvResource>,
    mut query: Query<&mut Text2d, With<EpisodeText>>,
) {
    let observation = res.env.observation();
    let reward = res
        .last_reward
        .map_or_else(|| "-".to_string(), |reward| reward.to_string());

    for mut text in query.iter_mut() {
        text.0 = format!(
            "Episode {}/{}  t={:.1}s\nQueued {:?}\nCrossed {:?}\nLast reward {}",
            res.episode,
            res.episodes,
            res.env.world().seconds(),
            &observation[..4],
            &observation[4..],
            reward
        );
    }
}
