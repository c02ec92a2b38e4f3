//! Core types for the intersection simulation
//!
//! These are standalone types that don't depend on Bevy.

use std::fmt;

/// A unique identifier for a vehicle, assigned in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

/// One of the four approach legs of the intersection
///
/// The discriminant order is the fixed round-robin order of the signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Travelling towards +x
    East,
    /// Travelling towards +y (screen coordinates, y grows downwards)
    South,
    /// Travelling towards -x
    West,
    /// Travelling towards -y
    North,
}

impl Direction {
    /// All directions in round-robin order
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::East => 0,
            Direction::South => 1,
            Direction::West => 2,
            Direction::North => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    /// The direction that receives the green after this one
    pub fn next(self) -> Direction {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Sign of travel along the direction's axis
    pub fn sign(self) -> f32 {
        match self {
            Direction::East | Direction::South => 1.0,
            Direction::West | Direction::North => -1.0,
        }
    }

    /// True when travel runs along the x axis
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// Whether coordinate `a` lies strictly beyond `b` in the direction of travel
    pub fn is_beyond(self, a: f32, b: f32) -> bool {
        self.sign() * (a - b) > 0.0
    }

    /// Signed distance from `from` forward to `to` in the direction of travel
    pub fn distance_ahead(self, from: f32, to: f32) -> f32 {
        self.sign() * (to - from)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
            Direction::North => "north",
        };
        f.pad(name)
    }
}

/// Phase shown by one direction's signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Red,
    Yellow,
    Green,
}

impl Phase {
    /// Single character used by the text map
    pub fn glyph(self) -> char {
        match self {
            Phase::Red => 'R',
            Phase::Yellow => 'Y',
            Phase::Green => 'G',
        }
    }
}

/// Type of vehicle in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Car,
    Bus,
    Truck,
    Bike,
}

impl VehicleClass {
    /// All classes, in the order the generator samples them
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Car,
        VehicleClass::Bus,
        VehicleClass::Truck,
        VehicleClass::Bike,
    ];

    pub fn index(self) -> usize {
        match self {
            VehicleClass::Car => 0,
            VehicleClass::Bus => 1,
            VehicleClass::Truck => 2,
            VehicleClass::Bike => 3,
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleClass::Car => "car",
            VehicleClass::Bus => "bus",
            VehicleClass::Truck => "truck",
            VehicleClass::Bike => "bike",
        };
        f.pad(name)
    }
}

/// Number of lanes on every approach
pub const LANES_PER_APPROACH: usize = 3;

/// Observation vector: queued vehicles per direction, then cumulative
/// crossed vehicles per direction, both in round-robin order
pub type Observation = [u32; 8];

/// Per-direction reduction of green time, in seconds
pub type Action = [i32; 4];
