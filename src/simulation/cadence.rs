//! Frame-counted rate groups
//!
//! The scheduler and the generator run once per simulated second while
//! motion runs every frame. Each slower group owns a `Cadence` that fires
//! on every `period`-th frame.

/// Fires once every `period` frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period: u32,
    countdown: u32,
}

impl Cadence {
    /// Fires on the very first frame, then every `period` frames
    pub fn immediate(period: u32) -> Self {
        Self {
            period: period.max(1),
            countdown: 0,
        }
    }

    /// First fires after a full period has elapsed
    pub fn delayed(period: u32) -> Self {
        let period = period.max(1);
        Self {
            period,
            countdown: period,
        }
    }

    /// Account for one frame, returning true if the group is due
    pub fn on_frame(&mut self) -> bool {
        if self.countdown == 0 {
            self.countdown = self.period - 1;
            true
        } else {
            self.countdown -= 1;
            false
        }
    }
}
