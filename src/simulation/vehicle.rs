//! Vehicle motion for the intersection simulation
//!
//! Motion is constant speed with a binary go/stop decision per frame.
//! Positions are measured along the vehicle's travel axis (x for east and
//! west, y for south and north) and always refer to the leading edge.

use super::scheduler::SignalScheduler;
use super::types::{Direction, VehicleClass, VehicleId};

/// Result of a vehicle update for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// Held at its stop bound or behind the vehicle ahead
    Waiting,
    /// Moved forward this frame
    Moving,
    /// Passed the stop line this frame (it may also have moved)
    Crossed,
}

/// Lane-level constants the motion rule needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionRules {
    pub stop_line: f32,
    pub moving_gap: f32,
}

/// A vehicle on one approach lane
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub class: VehicleClass,
    pub direction: Direction,
    pub lane: usize,
    /// Leading edge coordinate along the travel axis
    pub position: f32,
    /// Lane coordinate across the travel axis
    pub lane_offset: f32,
    pub length: f32,
    pub width: f32,
    pub speed: f32,
    pub crossed: bool,
    /// Coordinate the leading edge may not pass while the light is against it
    pub stop_bound: f32,
    /// Order of arrival within the lane, starting at zero
    pub arrival_index: u64,
}

impl Vehicle {
    pub fn leading_edge(&self) -> f32 {
        self.position
    }

    pub fn trailing_edge(&self) -> f32 {
        self.position - self.direction.sign() * self.length
    }

    /// Top-left corner on the canvas, for frame sinks
    pub fn corner(&self) -> (f32, f32) {
        let (along, across) = match self.direction {
            Direction::East | Direction::South => (self.trailing_edge(), self.lane_offset),
            Direction::West | Direction::North => (self.leading_edge(), self.lane_offset),
        };
        if self.direction.is_horizontal() {
            (along, across)
        } else {
            (across, along)
        }
    }

    /// Canvas extent as (width, height)
    pub fn extent(&self) -> (f32, f32) {
        if self.direction.is_horizontal() {
            (self.length, self.width)
        } else {
            (self.width, self.length)
        }
    }

    /// True while the leading edge has not yet reached the stop bound
    fn short_of_stop_bound(&self) -> bool {
        self.direction
            .distance_ahead(self.position, self.stop_bound)
            >= 0.0
    }

    /// Whether moving `speed` this frame keeps the moving gap behind the
    /// trailing edge of the vehicle ahead
    fn clear_of(&self, ahead_trailing_edge: f32, moving_gap: f32) -> bool {
        let next = self.position + self.direction.sign() * self.speed;
        self.direction.distance_ahead(next, ahead_trailing_edge) >= moving_gap
    }

    /// Run crossing detection and the go/stop rule for one frame
    ///
    /// `ahead_trailing_edge` is the trailing edge of the previous arrival in
    /// the same lane, already moved this frame, or `None` for the first
    /// vehicle in the lane.
    pub fn advance(
        &mut self,
        scheduler: &SignalScheduler,
        ahead_trailing_edge: Option<f32>,
        rules: &MotionRules,
    ) -> VehicleUpdateResult {
        let mut result = VehicleUpdateResult::Waiting;

        if !self.crossed && self.direction.is_beyond(self.position, rules.stop_line) {
            self.crossed = true;
            result = VehicleUpdateResult::Crossed;
        }

        let signal_allows =
            self.crossed || self.short_of_stop_bound() || scheduler.is_green(self.direction);
        let gap_allows = ahead_trailing_edge
            .map_or(true, |trailing| self.clear_of(trailing, rules.moving_gap));

        if signal_allows && gap_allows {
            self.position += self.direction.sign() * self.speed;
            if result == VehicleUpdateResult::Waiting {
                result = VehicleUpdateResult::Moving;
            }
        }

        result
    }
}
