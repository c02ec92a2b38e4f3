//! Round-robin signal scheduler
//!
//! Exactly one direction is active at a time. The active direction runs
//! green then yellow; every other direction counts down red. When the
//! active yellow runs out the next direction in `Direction::ALL` order takes
//! over, and the direction after that gets a red countdown equal to the new
//! active direction's green plus yellow so its red expires on the handoff.

use log::{debug, warn};

use super::config::SignalTiming;
use super::signal::Signal;
use super::types::{Action, Direction, Phase};

/// Transition reported by the scheduler so the owner of the lanes can react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The direction left green; its queued vehicles fall back to the default stop
    YellowStarted(Direction),
    /// The direction finished a full green, yellow, red rotation
    CycleCompleted(Direction),
    /// The direction became the active direction
    GreenStarted(Direction),
}

/// Owns the four signals and the round-robin pointer
#[derive(Debug, Clone)]
pub struct SignalScheduler {
    signals: [Signal; 4],
    active: Direction,
    yellow: bool,
    timing: SignalTiming,
    adjustment: Action,
    cycles: [u32; 4],
}

impl SignalScheduler {
    /// Build the initial signal state for one episode
    ///
    /// East starts active. South's red is set to expire exactly when East
    /// finishes yellow; West and North start from the default red.
    pub fn new(timing: SignalTiming, adjustment: Action) -> Self {
        let yellow = timing.default_yellow;
        let red = timing.default_red;
        let mut scheduler = Self {
            signals: [Signal::new(red, yellow, 0); 4],
            active: Direction::East,
            yellow: false,
            timing,
            adjustment,
            cycles: [0; 4],
        };

        for direction in Direction::ALL {
            let green = scheduler.effective_green(direction);
            if green == 0 {
                warn!(
                    "adjustment {} removes all green time for {}; it will skip straight to yellow",
                    adjustment[direction.index()],
                    direction
                );
            }
            scheduler.signals[direction.index()].green = green;
        }

        let upcoming = scheduler.active.next();
        scheduler.signals[upcoming.index()].red =
            scheduler.signals[scheduler.active.index()].green + yellow;

        scheduler
    }

    /// Green duration for `direction` after the episode's adjustment,
    /// clamped at zero
    pub fn effective_green(&self, direction: Direction) -> u32 {
        let base = i64::from(self.timing.default_green[direction.index()]);
        let adjusted = base - i64::from(self.adjustment[direction.index()]);
        adjusted.clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Settle the starting state; an active direction with no green goes
    /// straight to yellow
    pub fn start(&mut self) -> Vec<PhaseEvent> {
        let mut events = vec![PhaseEvent::GreenStarted(self.active)];
        self.settle(&mut events);
        events
    }

    /// Advance every counter by one simulated second
    pub fn tick(&mut self) -> Vec<PhaseEvent> {
        for direction in Direction::ALL {
            let signal = &mut self.signals[direction.index()];
            if direction == self.active {
                if self.yellow {
                    signal.tick_yellow();
                } else {
                    signal.tick_green();
                }
            } else {
                signal.tick_red();
            }
        }

        let mut events = Vec::new();
        self.settle(&mut events);
        events
    }

    /// Apply every transition whose counter has already run out
    ///
    /// A handoff can land on a direction with zero green, so this keeps
    /// going until the active counter is non-zero. With a zero yellow and
    /// no green anywhere nothing would ever be non-zero, so one rotation is
    /// the most a single call will apply.
    fn settle(&mut self, events: &mut Vec<PhaseEvent>) {
        for _ in 0..=2 * Direction::ALL.len() {
            let active = self.active;
            let signal = self.signals[active.index()];

            if !self.yellow {
                if signal.green > 0 {
                    return;
                }
                self.yellow = true;
                self.signals[active.index()].yellow = self.timing.default_yellow;
                debug!("{} signal turns yellow", active);
                events.push(PhaseEvent::YellowStarted(active));
                if self.timing.default_yellow > 0 {
                    return;
                }
                continue;
            }

            if signal.yellow > 0 {
                return;
            }

            self.complete_cycle(events);
        }
    }

    fn complete_cycle(&mut self, events: &mut Vec<PhaseEvent>) {
        let finished = self.active;
        let green = self.effective_green(finished);
        self.signals[finished.index()] = Signal::new(
            self.timing.default_red,
            self.timing.default_yellow,
            green,
        );
        self.cycles[finished.index()] += 1;
        events.push(PhaseEvent::CycleCompleted(finished));

        self.active = finished.next();
        self.yellow = false;

        let active_signal = self.signals[self.active.index()];
        let upcoming = self.active.next();
        self.signals[upcoming.index()].red = active_signal.green + active_signal.yellow;

        debug!(
            "{} completed cycle {}, {} turns green for {}s",
            finished,
            self.cycles[finished.index()],
            self.active,
            active_signal.green
        );
        events.push(PhaseEvent::GreenStarted(self.active));
    }

    pub fn active(&self) -> Direction {
        self.active
    }

    pub fn is_yellow(&self) -> bool {
        self.yellow
    }

    /// True only while `direction` holds a green (not yellow) light
    pub fn is_green(&self, direction: Direction) -> bool {
        direction == self.active && !self.yellow
    }

    pub fn phase(&self, direction: Direction) -> Phase {
        if direction != self.active {
            Phase::Red
        } else if self.yellow {
            Phase::Yellow
        } else {
            Phase::Green
        }
    }

    /// Seconds left in the direction's current phase
    pub fn remaining(&self, direction: Direction) -> u32 {
        let signal = &self.signals[direction.index()];
        match self.phase(direction) {
            Phase::Green => signal.green,
            Phase::Yellow => signal.yellow,
            Phase::Red => signal.red,
        }
    }

    pub fn signal(&self, direction: Direction) -> &Signal {
        &self.signals[direction.index()]
    }

    pub fn cycles_completed(&self, direction: Direction) -> u32 {
        self.cycles[direction.index()]
    }

    /// True once every direction has finished at least `required` rotations
    pub fn all_cycles_complete(&self, required: u32) -> bool {
        self.cycles.iter().all(|count| *count >= required)
    }

    pub fn adjustment(&self) -> &Action {
        &self.adjustment
    }
}
