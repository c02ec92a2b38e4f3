//! Reinforcement-learning environment around the intersection
//!
//! One episode is one `step`: the action is stored as the per-direction
//! green adjustment, then frames run until every direction has finished its
//! rotation. The reward is sparse and only reported on that last frame.

use std::collections::HashMap;

use anyhow::{bail, Result};
use log::{info, warn};

use super::config::IntersectionConfig;
use super::frame::{FrameSink, NullSink};
use super::types::{Action, Direction, Observation, VehicleClass, VehicleId};
use super::world::IntersectionWorld;

/// Lifecycle of one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeState {
    /// Reset, waiting for the first step
    Pending,
    /// Frames are being run for the current action
    Running,
    /// Every direction has finished its rotation; reset before stepping again
    Done,
    /// The environment was closed
    Closed,
}

/// What `step` hands back to the agent
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: i64,
    pub done: bool,
    pub info: HashMap<String, String>,
}

/// Totals for the current episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStats {
    pub spawned: u64,
    pub crossed: u32,
    pub queued: u32,
    pub frames: u64,
    pub seconds: f32,
}

/// Episode controller exposing `reset`, `step` and `close`
pub struct TrafficEnv {
    config: IntersectionConfig,
    world: IntersectionWorld,
    state: EpisodeState,
    observation: Observation,
    sink: Box<dyn FrameSink + Send + Sync>,
}

impl TrafficEnv {
    /// Create a headless environment, already reset
    pub fn new(config: IntersectionConfig) -> Result<Self> {
        Self::with_sink(config, Box::new(NullSink))
    }

    /// Create an environment that presents every frame to `sink`
    pub fn with_sink(
        config: IntersectionConfig,
        sink: Box<dyn FrameSink + Send + Sync>,
    ) -> Result<Self> {
        let world = IntersectionWorld::new(config.clone())?;
        Ok(Self {
            config,
            world,
            state: EpisodeState::Pending,
            observation: [0; 8],
            sink,
        })
    }

    /// Rebuild the intersection from the current configuration
    pub fn reset(&mut self) -> Result<Observation> {
        self.reset_with(self.config.clone())
    }

    /// Rebuild the intersection from a new configuration
    pub fn reset_with(&mut self, config: IntersectionConfig) -> Result<Observation> {
        if self.state == EpisodeState::Closed {
            bail!("environment is closed");
        }
        self.world = IntersectionWorld::new(config.clone())?;
        self.config = config;
        self.state = EpisodeState::Pending;
        self.observation = [0; 8];
        Ok(self.observation)
    }

    /// Place a specific vehicle at the tail of a lane
    pub fn spawn_vehicle(
        &mut self,
        direction: Direction,
        lane: usize,
        class: VehicleClass,
    ) -> Result<VehicleId> {
        match self.state {
            EpisodeState::Pending | EpisodeState::Running => {}
            state => bail!("cannot spawn vehicles while the episode is {:?}", state),
        }
        let id = self.world.spawn_vehicle(direction, lane, class)?;
        self.observation = self.world.observation();
        Ok(id)
    }

    /// Store `action` as the green adjustment and start the signal rotation
    pub fn begin(&mut self, action: Action) -> Result<()> {
        match self.state {
            EpisodeState::Pending => {}
            EpisodeState::Running => bail!("episode already running"),
            EpisodeState::Done => bail!("episode finished; call reset before stepping again"),
            EpisodeState::Closed => bail!("environment is closed"),
        }

        for (direction, adjustment) in Direction::ALL.iter().zip(action) {
            let default_green = self.config.timing.default_green[direction.index()];
            if i64::from(adjustment) > i64::from(default_green) {
                warn!(
                    "adjustment {} exceeds the {}s default green for {}; clamping green to zero",
                    adjustment, default_green, direction
                );
            }
        }

        self.world.start(action);
        self.state = EpisodeState::Running;
        Ok(())
    }

    /// Run one frame of the running episode
    ///
    /// Returns the step result on the frame the episode finishes and `None`
    /// on every frame before it.
    pub fn advance_frame(&mut self) -> Result<Option<StepResult>> {
        if self.state != EpisodeState::Running {
            bail!("no running episode (state {:?})", self.state);
        }

        self.world.frame()?;
        self.observation = self.world.observation();
        self.present();

        if !self.world.rotation_complete() {
            return Ok(None);
        }

        self.state = EpisodeState::Done;
        let reward = self.reward();
        let stats = self.stats();
        info!(
            "episode done after {:.1}s: reward {}, observation {:?}",
            stats.seconds, reward, self.observation
        );

        Ok(Some(StepResult {
            observation: self.observation,
            reward,
            done: true,
            info: HashMap::new(),
        }))
    }

    /// Run a whole episode for `action`
    pub fn step(&mut self, action: Action) -> Result<StepResult> {
        self.begin(action)?;
        loop {
            if let Some(result) = self.advance_frame()? {
                return Ok(result);
            }
        }
    }

    /// Hand the current frame to the sink; a failing sink is dropped so the
    /// episode carries on headless
    fn present(&mut self) {
        if !self.sink.wants_frames() {
            return;
        }
        let frame = self.world.snapshot();
        if let Err(err) = self.sink.present(&frame) {
            warn!("frame sink failed, continuing headless: {:#}", err);
            self.sink.close();
            self.sink = Box::new(NullSink);
        }
    }

    /// Release the frame sink; further calls are no-ops
    pub fn close(&mut self) {
        if self.state == EpisodeState::Closed {
            return;
        }
        self.sink.close();
        self.sink = Box::new(NullSink);
        self.state = EpisodeState::Closed;
    }

    /// Crossed vehicles minus vehicles still queued
    pub fn reward(&self) -> i64 {
        let (queued, crossed) = self.observation.split_at(4);
        let queued: i64 = queued.iter().map(|n| i64::from(*n)).sum();
        let crossed: i64 = crossed.iter().map(|n| i64::from(*n)).sum();
        crossed - queued
    }

    pub fn observation(&self) -> Observation {
        self.observation
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn world(&self) -> &IntersectionWorld {
        &self.world
    }

    pub fn config(&self) -> &IntersectionConfig {
        &self.config
    }

    pub fn stats(&self) -> EpisodeStats {
        EpisodeStats {
            spawned: self.world.spawned(),
            crossed: Direction::ALL.iter().map(|d| self.world.crossed(*d)).sum(),
            queued: Direction::ALL.iter().map(|d| self.world.queued(*d)).sum(),
            frames: self.world.frames(),
            seconds: self.world.seconds(),
        }
    }
}

impl Drop for TrafficEnv {
    fn drop(&mut self) {
        self.close();
    }
}
