//! Read-only per-frame view handed to rendering collaborators
//!
//! A frame sink only ever sees plain numbers; it cannot reach back into the
//! simulation.

use anyhow::Result;

use super::types::{Direction, Phase, VehicleClass, VehicleId};

/// One signal as a sink should draw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalView {
    pub direction: Direction,
    pub phase: Phase,
    pub remaining_seconds: u32,
}

impl SignalView {
    /// Countdown text: always shown for green and yellow, for red only in
    /// its last ten seconds
    pub fn display_text(&self) -> String {
        match self.phase {
            Phase::Red if self.remaining_seconds > 10 => "---".to_string(),
            _ => self.remaining_seconds.to_string(),
        }
    }
}

/// One vehicle as a sink should draw it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub class: VehicleClass,
    pub direction: Direction,
    /// Top-left corner on the canvas
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub crossed: bool,
}

/// Everything a sink needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub seconds: f32,
    pub signals: [SignalView; 4],
    pub vehicles: Vec<VehicleView>,
}

/// Consumer of frames, e.g. a window or a terminal printer
pub trait FrameSink {
    /// Called once per motion frame after all vehicles have moved
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Whether frames should be built for this sink at all
    fn wants_frames(&self) -> bool {
        true
    }

    /// Release any resources; may be called more than once
    fn close(&mut self) {}
}

/// Sink for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }

    fn wants_frames(&self) -> bool {
        false
    }
}
