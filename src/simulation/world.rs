//! Main simulation world that ties everything together
//!
//! `IntersectionWorld` is the single owner of the signals, the lanes and the
//! generator. Each call to `frame` runs the three rate groups in a fixed
//! order: the scheduler when its second is due, then the generator when its
//! second is due, then motion for every lane. Nothing else holds a mutable
//! handle to any of them, so the groups cannot race.

use anyhow::{ensure, Result};
use log::debug;

use super::cadence::Cadence;
use super::config::IntersectionConfig;
use super::frame::{Frame, SignalView, VehicleView};
use super::generator::VehicleGenerator;
use super::lane::{AdmissionRules, LaneQueue};
use super::scheduler::{PhaseEvent, SignalScheduler};
use super::types::{
    Action, Direction, Observation, VehicleClass, VehicleId, LANES_PER_APPROACH,
};
use super::vehicle::MotionRules;

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Scheduler transitions applied this frame
    pub phase_events: Vec<PhaseEvent>,
    /// Vehicles spawned by the generator this frame
    pub spawned: Vec<VehicleId>,
    /// Vehicles that crossed their stop line this frame
    pub crossed: u32,
    /// Vehicles evicted after leaving the canvas
    pub evicted: usize,
    /// True when the scheduler ticked this frame
    pub second_elapsed: bool,
}

/// The intersection and everything on it
pub struct IntersectionWorld {
    config: IntersectionConfig,
    scheduler: SignalScheduler,
    generator: VehicleGenerator,
    /// Indexed by `Direction::index`, then by lane
    lanes: Vec<Vec<LaneQueue>>,
    scheduler_cadence: Cadence,
    generator_cadence: Cadence,
    /// Next ID to assign
    next_id: u64,
    frames: u64,
    scheduler_ticks: u64,
}

impl IntersectionWorld {
    /// Build an empty intersection; the signals hold their initial state
    /// until `start` is called
    pub fn new(config: IntersectionConfig) -> Result<Self> {
        config.validate()?;

        let lanes: Vec<Vec<LaneQueue>> = Direction::ALL
            .iter()
            .map(|direction| {
                let approach = config.approach(*direction);
                (0..LANES_PER_APPROACH)
                    .map(|lane| LaneQueue::new(*direction, lane, approach))
                    .collect::<Vec<_>>()
            })
            .collect();

        let generator = VehicleGenerator::new(
            config.direction_weights,
            config.arrivals_per_tick,
            config.seed,
        );
        let scheduler = SignalScheduler::new(config.timing.clone(), [0; 4]);
        let fps = config.frames_per_second;

        Ok(Self {
            config,
            scheduler,
            generator,
            lanes,
            scheduler_cadence: Cadence::delayed(fps),
            generator_cadence: Cadence::immediate(fps),
            next_id: 0,
            frames: 0,
            scheduler_ticks: 0,
        })
    }

    /// Install the episode's green adjustment and start the signal rotation
    pub fn start(&mut self, adjustment: Action) -> Vec<PhaseEvent> {
        self.scheduler = SignalScheduler::new(self.config.timing.clone(), adjustment);
        self.scheduler_cadence = Cadence::delayed(self.config.frames_per_second);
        self.generator_cadence = Cadence::immediate(self.config.frames_per_second);
        let events = self.scheduler.start();
        self.apply_phase_events(&events);
        events
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place a vehicle at the tail of a lane
    pub fn spawn_vehicle(
        &mut self,
        direction: Direction,
        lane: usize,
        class: VehicleClass,
    ) -> Result<VehicleId> {
        ensure!(
            lane < LANES_PER_APPROACH,
            "lane {} out of range for {} approach",
            lane,
            direction
        );

        let id = self.next_vehicle_id();
        let rules = AdmissionRules {
            stopping_gap: self.config.stopping_gap,
            moving_gap: self.config.moving_gap,
        };
        let profile = self.config.class(class).clone();
        let vehicle = self.lanes[direction.index()][lane].admit(id, class, &profile, &rules);
        debug!(
            "{} {:?} entered {} lane {} at {:.1}, stop bound {:.1}",
            class, id, direction, lane, vehicle.position, vehicle.stop_bound
        );
        Ok(id)
    }

    fn apply_phase_events(&mut self, events: &[PhaseEvent]) {
        for event in events {
            if let PhaseEvent::YellowStarted(direction) = event {
                for lane in &mut self.lanes[direction.index()] {
                    lane.release_stop_bounds();
                }
            }
        }
    }

    /// Run one motion frame, ticking the once-per-second groups when due
    pub fn frame(&mut self) -> Result<FrameReport> {
        let mut report = FrameReport::default();

        if self.scheduler_cadence.on_frame() {
            let events = self.scheduler.tick();
            self.apply_phase_events(&events);
            self.scheduler_ticks += 1;
            report.second_elapsed = true;
            report.phase_events = events;
        }

        if self.generator_cadence.on_frame() {
            for arrival in self.generator.tick() {
                let id = self.spawn_vehicle(arrival.direction, arrival.lane, arrival.class)?;
                report.spawned.push(id);
            }
        }

        for direction in Direction::ALL {
            let approach = self.config.approach(direction);
            let rules = MotionRules {
                stop_line: approach.stop_line,
                moving_gap: self.config.moving_gap,
            };
            let exit = approach.exit;
            for lane in &mut self.lanes[direction.index()] {
                report.crossed += lane.advance(&self.scheduler, &rules);
                report.evicted += lane.evict_departed(exit);
            }
        }

        self.frames += 1;
        Ok(report)
    }

    /// True once every direction has completed the configured number of rotations
    pub fn rotation_complete(&self) -> bool {
        self.scheduler
            .all_cycles_complete(self.config.cycles_per_episode)
    }

    /// Vehicles waiting to cross on `direction`
    pub fn queued(&self, direction: Direction) -> u32 {
        self.lanes[direction.index()]
            .iter()
            .map(LaneQueue::queued)
            .sum()
    }

    /// Vehicles that have crossed on `direction` since the world was built
    pub fn crossed(&self, direction: Direction) -> u32 {
        self.lanes[direction.index()]
            .iter()
            .map(LaneQueue::crossed)
            .sum()
    }

    pub fn observation(&self) -> Observation {
        let mut observation = [0; 8];
        for direction in Direction::ALL {
            observation[direction.index()] = self.queued(direction);
            observation[direction.index() + 4] = self.crossed(direction);
        }
        observation
    }

    pub fn scheduler(&self) -> &SignalScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &IntersectionConfig {
        &self.config
    }

    /// The three lanes of `direction`
    pub fn lanes(&self, direction: Direction) -> &[LaneQueue] {
        &self.lanes[direction.index()]
    }

    /// Total vehicles spawned since the world was built
    pub fn spawned(&self) -> u64 {
        self.next_id
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler_ticks(&self) -> u64 {
        self.scheduler_ticks
    }

    /// Simulated time in seconds
    pub fn seconds(&self) -> f32 {
        self.frames as f32 / self.config.frames_per_second as f32
    }

    /// Plain-number view of the current state for a frame sink
    pub fn snapshot(&self) -> Frame {
        let signals = Direction::ALL.map(|direction| SignalView {
            direction,
            phase: self.scheduler.phase(direction),
            remaining_seconds: self.scheduler.remaining(direction),
        });

        let vehicles = self
            .lanes
            .iter()
            .flatten()
            .flat_map(|lane| lane.iter())
            .map(|vehicle| {
                let (x, y) = vehicle.corner();
                let (width, height) = vehicle.extent();
                VehicleView {
                    id: vehicle.id,
                    class: vehicle.class,
                    direction: vehicle.direction,
                    x,
                    y,
                    width,
                    height,
                    crossed: vehicle.crossed,
                }
            })
            .collect();

        Frame {
            index: self.frames,
            seconds: self.seconds(),
            signals,
            vehicles,
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Intersection Summary ===");
        println!("Time: {:.2}s ({} frames)", self.seconds(), self.frames);
        println!("Vehicles spawned: {}", self.spawned());
        println!();

        println!("--- Signals ---");
        let frame = self.snapshot();
        for view in &frame.signals {
            let direction = view.direction;
            let signal = self.scheduler.signal(direction);
            println!(
                "  {:<5} {:<6} {:>3}  (red={}, yellow={}, green={}, cycles={})",
                direction,
                format!("{:?}", view.phase),
                view.display_text(),
                signal.red,
                signal.yellow,
                signal.green,
                self.scheduler.cycles_completed(direction)
            );
        }

        println!("--- Lanes ---");
        for direction in Direction::ALL {
            let per_lane: Vec<String> = self.lanes[direction.index()]
                .iter()
                .map(|lane| format!("{}/{}", lane.queued(), lane.crossed()))
                .collect();
            let queued = self.queued(direction);
            println!(
                "  {:<5} {:<20} queued={:<3} crossed={:<3} lanes(queued/crossed)=[{}]",
                direction,
                "#".repeat(queued.min(20) as usize),
                queued,
                self.crossed(direction),
                per_lane.join(", ")
            );
        }
    }

    /// Draw a coarse map of the canvas in the terminal
    pub fn draw_map(&self) {
        const CELL: f32 = 20.0;
        const WIDTH: usize = 70;
        const HEIGHT: usize = 40;

        let mut grid = vec![vec![' '; WIDTH]; HEIGHT];
        let to_grid = |x: f32, y: f32| -> Option<(usize, usize)> {
            if x < 0.0 || y < 0.0 {
                return None;
            }
            let col = (x / CELL) as usize;
            let row = (y / CELL) as usize;
            (row < HEIGHT && col < WIDTH).then_some((row, col))
        };

        // Lanes
        for direction in Direction::ALL {
            for offset in self.config.approach(direction).lanes {
                for step in 0..WIDTH.max(HEIGHT) {
                    let along = step as f32 * CELL;
                    let (x, y) = if direction.is_horizontal() {
                        (along, offset)
                    } else {
                        (offset, along)
                    };
                    if let Some((row, col)) = to_grid(x, y) {
                        grid[row][col] = if direction.is_horizontal() { '-' } else { '|' };
                    }
                }
            }
        }

        // Vehicles
        for lane in self.lanes.iter().flatten() {
            for vehicle in lane.iter() {
                let (x, y) = vehicle.corner();
                if let Some((row, col)) = to_grid(x, y) {
                    grid[row][col] = match vehicle.class {
                        VehicleClass::Car => 'c',
                        VehicleClass::Bus => 'b',
                        VehicleClass::Truck => 't',
                        VehicleClass::Bike => 'k',
                    };
                }
            }
        }

        // Signals sit on each approach's stop line, next to its first lane
        for direction in Direction::ALL {
            let approach = self.config.approach(direction);
            let (x, y) = if direction.is_horizontal() {
                (approach.stop_line, approach.lanes[0])
            } else {
                (approach.lanes[0], approach.stop_line)
            };
            if let Some((row, col)) = to_grid(x, y) {
                grid[row][col] = self.scheduler.phase(direction).glyph();
            }
        }

        println!("\n=== Intersection Map ===");
        println!("Legend: c=Car, b=Bus, t=Truck, k=Bike, R/Y/G=Signal phase");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
