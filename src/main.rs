use anyhow::{ensure, Result};
use clap::Parser;
use log::{debug, info};

use traffic_signal_env::simulation::{
    Action, Frame, FrameSink, IntersectionConfig, TrafficEnv,
};

#[derive(Parser)]
#[command(name = "traffic_signal_env")]
#[command(about = "Signalised four-way intersection environment with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Run without graphics (the default)
    #[arg(long, conflicts_with = "ui")]
    headless: bool,

    /// Number of episodes to run
    #[arg(long, default_value = "1")]
    episodes: u32,

    /// Seconds of green removed per direction (east,south,west,north)
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_values_t = [0, 0, 0, 0]
    )]
    action: Vec<i32>,

    /// Seed for the vehicle generator; episode N uses seed + N
    #[arg(long)]
    seed: Option<u64>,

    /// Motion frames per simulated second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Vehicles generated per simulated second
    #[arg(long, default_value = "1")]
    arrivals: u32,

    /// Pace frames to wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Print the intersection after every simulated second
    #[arg(long)]
    draw: bool,
}

impl Cli {
    fn parsed_action(&self) -> Result<Action> {
        ensure!(
            self.action.len() == 4,
            "--action needs exactly four comma-separated values, got {}",
            self.action.len()
        );
        Ok([self.action[0], self.action[1], self.action[2], self.action[3]])
    }

    fn config_for_episode(&self, episode: u32) -> IntersectionConfig {
        IntersectionConfig {
            frames_per_second: self.fps,
            arrivals_per_tick: self.arrivals,
            seed: self.seed.map(|seed| seed.wrapping_add(u64::from(episode))),
            ..IntersectionConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let action = cli.parsed_action()?;

    if cli.ui && !cli.headless {
        #[cfg(feature = "ui")]
        {
            traffic_signal_env::ui::run(cli.config_for_episode(0), action, cli.episodes);
            return Ok(());
        }
        #[cfg(not(feature = "ui"))]
        {
            eprintln!("Error: UI feature is not enabled. Rebuild with --features ui");
            std::process::exit(1);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run_headless(&cli, action)
}

/// Sleeps between frames in real-time mode and logs the signal board once
/// per simulated second
struct PacedSink {
    fps: u32,
    realtime: bool,
}

impl FrameSink for PacedSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        if frame.index % u64::from(self.fps) == 0 {
            let board: Vec<String> = frame
                .signals
                .iter()
                .map(|s| format!("{}:{:?}:{}", s.direction, s.phase, s.display_text()))
                .collect();
            debug!(
                "t={:.0}s vehicles={} [{}]",
                frame.seconds,
                frame.vehicles.len(),
                board.join(" ")
            );
        }
        if self.realtime {
            std::thread::sleep(std::time::Duration::from_secs_f64(1.0 / f64::from(self.fps)));
        }
        Ok(())
    }

    fn wants_frames(&self) -> bool {
        self.realtime || log::log_enabled!(log::Level::Debug)
    }
}

/// Run the environment in headless mode (no graphics)
fn run_headless(cli: &Cli, action: Action) -> Result<()> {
    info!("Running intersection environment in headless mode...");
    info!(
        "Episodes: {}, action: {:?}, fps: {}, arrivals/s: {}",
        cli.episodes, action, cli.fps, cli.arrivals
    );

    let sink = PacedSink {
        fps: cli.fps.max(1),
        realtime: cli.realtime,
    };
    let mut env = TrafficEnv::with_sink(cli.config_for_episode(0), Box::new(sink))?;
    let mut total_reward = 0i64;

    for episode in 0..cli.episodes {
        env.reset_with(cli.config_for_episode(episode))?;
        env.begin(action)?;

        let result = loop {
            if let Some(result) = env.advance_frame()? {
                break result;
            }
            if cli.draw && env.world().frames() % u64::from(cli.fps) == 0 {
                env.world().print_summary();
                env.world().draw_map();
            }
        };

        let stats = env.stats();
        total_reward += result.reward;

        info!("=== EPISODE COMPLETE ===");
        info!("Episode: {}", episode + 1);
        info!("Simulated seconds: {:.1}", stats.seconds);
        info!("Total vehicles spawned: {}", stats.spawned);
        info!("Total vehicles crossed: {}", stats.crossed);
        info!("Queued vehicles: {}", stats.queued);
        info!("Observation: {:?}", result.observation);
        info!("Reward: {}", result.reward);
    }

    if cli.draw {
        env.world().print_summary();
        env.world().draw_map();
    }

    if cli.episodes > 0 {
        info!(
            "Mean reward over {} episodes: {:.2}",
            cli.episodes,
            total_reward as f64 / f64::from(cli.episodes)
        );
    }

    env.close();
    Ok(())
}
