//! Countdown counters for a single direction's signal

/// Remaining red, yellow and green seconds for one direction
///
/// Only the counter matching the direction's current phase is meaningful;
/// the scheduler decides which one that is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

impl Signal {
    pub fn new(red: u32, yellow: u32, green: u32) -> Self {
        Self { red, yellow, green }
    }

    /// Count down the green counter, returning true once it is exhausted
    pub fn tick_green(&mut self) -> bool {
        self.green = self.green.saturating_sub(1);
        self.green == 0
    }

    /// Count down the yellow counter, returning true once it is exhausted
    pub fn tick_yellow(&mut self) -> bool {
        self.yellow = self.yellow.saturating_sub(1);
        self.yellow == 0
    }

    pub fn tick_red(&mut self) {
        self.red = self.red.saturating_sub(1);
    }
}
