//! Scene setup: camera, roads, stop lines, signal lamps and text

use bevy::prelude::*;

use super::components::{
    canvas_to_world, EnvResource, EpisodeText, MainCamera, SignalLamp, SignalTimerText,
    CANVAS_HEIGHT, CANVAS_WIDTH, SIGNAL_LAMPS, SIGNAL_TIMERS,
};
use crate::simulation::Direction;

/// System to draw the static parts of the intersection
pub fn setup_world(mut commands: Commands, env: Res<EnvResource>) {
    commands.spawn((MainCamera, Camera2d));

    let config = env.env.config();
    let asphalt = Color::srgb(0.25, 0.25, 0.27);

    // Road bands spanning each pair of opposing approaches
    let east = config.approach(Direction::East);
    let west = config.approach(Direction::West);
    let top = east.lanes.iter().chain(&west.lanes).fold(f32::MAX, |a, b| a.min(*b)) - 10.0;
    let bottom = east.lanes.iter().chain(&west.lanes).fold(f32::MIN, |a, b| a.max(*b)) + 40.0;
    let horizontal = canvas_to_world(CANVAS_WIDTH / 2.0, (top + bottom) / 2.0);
    commands.spawn((
        Sprite::from_color(asphalt, Vec2::new(CANVAS_WIDTH, bottom - top)),
        Transform::from_xyz(horizontal.x, horizontal.y, 0.0),
    ));

    let south = config.approach(Direction::South);
    let north = config.approach(Direction::North);
    let left = south.lanes.iter().chain(&north.lanes).fold(f32::MAX, |a, b| a.min(*b)) - 10.0;
    let right = south.lanes.iter().chain(&north.lanes).fold(f32::MIN, |a, b| a.max(*b)) + 40.0;
    let vertical = canvas_to_world((left + right) / 2.0, CANVAS_HEIGHT / 2.0);
    commands.spawn((
        Sprite::from_color(asphalt, Vec2::new(right - left, CANVAS_HEIGHT)),
        Transform::from_xyz(vertical.x, vertical.y, 0.0),
    ));

    // Stop lines
    for direction in Direction::ALL {
        let approach = config.approach(direction);
        let low = approach.lanes.iter().fold(f32::MAX, |a, b| a.min(*b));
        let high = approach.lanes.iter().fold(f32::MIN, |a, b| a.max(*b)) + 30.0;
        let (center, size) = if direction.is_horizontal() {
            (
                canvas_to_world(approach.stop_line, (low + high) / 2.0),
                Vec2::new(3.0, high - low),
            )
        } else {
            (
                canvas_to_world((low + high) / 2.0, approach.stop_line),
                Vec2::new(high - low, 3.0),
            )
        };
        commands.spawn((
            Sprite::from_color(Color::WHITE, size),
            Transform::from_xyz(center.x, center.y, 1.0),
        ));
    }

    for direction in Direction::ALL {
        let (lamp_x, lamp_y) = SIGNAL_LAMPS[direction.index()];
        let lamp = canvas_to_world(lamp_x, lamp_y);
        commands.spawn((
            SignalLamp(direction),
            Sprite::from_color(Color::srgb(0.8, 0.1, 0.1), Vec2::splat(22.0)),
            Transform::from_xyz(lamp.x, lamp.y, 2.0),
        ));

        let (timer_x, timer_y) = SIGNAL_TIMERS[direction.index()];
        let timer = canvas_to_world(timer_x, timer_y);
        commands.spawn((
            SignalTimerText(direction),
            Text2d::new("---"),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Transform::from_xyz(timer.x, timer.y, 2.0),
        ));
    }

    let hud = canvas_to_world(200.0, 40.0);
    commands.spawn((
        EpisodeText,
        Text2d::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(hud.x, hud.y, 2.0),
    ));
}
