//! Per-lane vehicle queues
//!
//! Vehicles are kept in arrival order, front of the lane first. Arrival
//! indices are never reused, so the previous arrival of any vehicle still in
//! the lane is found by offsetting from the index of the front vehicle.

use std::collections::VecDeque;

use super::config::{ApproachGeometry, ClassProfile};
use super::scheduler::SignalScheduler;
use super::types::{Direction, VehicleClass, VehicleId};
use super::vehicle::{MotionRules, Vehicle, VehicleUpdateResult};

/// Spacing rules applied when a vehicle joins a lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissionRules {
    pub stopping_gap: f32,
    pub moving_gap: f32,
}

/// FIFO of vehicles on one (direction, lane) pair
#[derive(Debug, Clone)]
pub struct LaneQueue {
    direction: Direction,
    lane: usize,
    lane_offset: f32,
    spawn: f32,
    default_stop: f32,
    vehicles: VecDeque<Vehicle>,
    next_arrival: u64,
    crossed: u32,
}

impl LaneQueue {
    pub fn new(direction: Direction, lane: usize, approach: &ApproachGeometry) -> Self {
        Self {
            direction,
            lane,
            lane_offset: approach.lanes[lane],
            spawn: approach.spawn,
            default_stop: approach.default_stop,
            vehicles: VecDeque::new(),
            next_arrival: 0,
            crossed: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    /// Append a new vehicle at the tail of the lane
    ///
    /// The stop bound chains off the previous arrival while that vehicle is
    /// still waiting to cross; otherwise it is the lane's default stop. The
    /// vehicle enters `stopping_gap` behind the spawn point, or further back
    /// if the previous arrival has not yet cleared the entry.
    pub fn admit(
        &mut self,
        id: VehicleId,
        class: VehicleClass,
        profile: &ClassProfile,
        rules: &AdmissionRules,
    ) -> &Vehicle {
        let sign = self.direction.sign();
        let previous = self.vehicles.back();

        let stop_bound = match previous {
            Some(ahead) if !ahead.crossed => {
                ahead.stop_bound - sign * (ahead.length + rules.stopping_gap)
            }
            _ => self.default_stop,
        };

        let mut position = self.spawn - sign * rules.stopping_gap;
        if let Some(ahead) = previous {
            let limit = ahead.trailing_edge() - sign * rules.moving_gap;
            if self.direction.is_beyond(position, limit) {
                position = limit;
            }
        }

        let vehicle = Vehicle {
            id,
            class,
            direction: self.direction,
            lane: self.lane,
            position,
            lane_offset: self.lane_offset,
            length: profile.length,
            width: profile.width,
            speed: profile.speed,
            crossed: false,
            stop_bound,
            arrival_index: self.next_arrival,
        };
        self.next_arrival += 1;
        self.vehicles.push_back(vehicle);
        &self.vehicles[self.vehicles.len() - 1]
    }

    /// Look up a vehicle still in the lane by its arrival index
    pub fn get(&self, arrival_index: u64) -> Option<&Vehicle> {
        let front = self.vehicles.front()?.arrival_index;
        let slot = arrival_index.checked_sub(front)?;
        self.vehicles.get(usize::try_from(slot).ok()?)
    }

    /// The previous arrival of `arrival_index`, if it is still in the lane
    pub fn ahead_of(&self, arrival_index: u64) -> Option<&Vehicle> {
        self.get(arrival_index.checked_sub(1)?)
    }

    /// Move every vehicle one frame, front to back
    ///
    /// Returns how many vehicles crossed the stop line this frame.
    pub fn advance(&mut self, scheduler: &SignalScheduler, rules: &MotionRules) -> u32 {
        let mut crossed_now = 0;
        let mut ahead_trailing_edge = None;

        for vehicle in self.vehicles.iter_mut() {
            if vehicle.advance(scheduler, ahead_trailing_edge, rules)
                == VehicleUpdateResult::Crossed
            {
                crossed_now += 1;
            }
            ahead_trailing_edge = Some(vehicle.trailing_edge());
        }

        self.crossed += crossed_now;
        crossed_now
    }

    /// Drop the chained stop bounds so every waiting vehicle halts at the
    /// default stop instead
    pub fn release_stop_bounds(&mut self) {
        for vehicle in self.vehicles.iter_mut().filter(|v| !v.crossed) {
            vehicle.stop_bound = self.default_stop;
        }
    }

    /// Evict crossed vehicles at the front whose trailing edge has left the
    /// canvas past `exit`
    pub fn evict_departed(&mut self, exit: f32) -> usize {
        let mut evicted = 0;
        while let Some(front) = self.vehicles.front() {
            if !(front.crossed && self.direction.is_beyond(front.trailing_edge(), exit)) {
                break;
            }
            self.vehicles.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Vehicles that have not crossed the stop line yet
    pub fn queued(&self) -> u32 {
        self.vehicles.iter().filter(|v| !v.crossed).count() as u32
    }

    /// Vehicles that have crossed the stop line since the lane was created
    pub fn crossed(&self) -> u32 {
        self.crossed
    }

    /// Vehicles currently held by the lane, crossed or not
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicles in arrival order, front of the lane first
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    /// Total arrivals admitted to this lane
    pub fn arrivals(&self) -> u64 {
        self.next_arrival
    }
}
