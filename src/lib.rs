//! Traffic Signal Environment Library
//!
//! A four-way intersection with a round-robin signal scheduler, usable as a
//! reinforcement-learning environment headless or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
