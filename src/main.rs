//! Asteroids RL entry point
//!
//! Headless harness: runs complete episodes with a built-in agent and a
//! deterministic edge spawner, logging the score and reward totals a
//! training backend would consume.

use std::path::PathBuf;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use asteroids_rl::agent::{Agent, HeuristicAgent, RandomAgent};
use asteroids_rl::consts::{MAX_SUBSTEPS, SIM_DT};
use asteroids_rl::sim::bounds::Edge;
use asteroids_rl::sim::{World, tick};
use asteroids_rl::tuning::Tuning;

/// Presentation frame rate for the headless loop (the physics rate is
/// `1 / SIM_DT` and independent of this).
const FRAME_DT: f32 = 1.0 / 60.0;

/// Command line options, parsed by hand.
struct Options {
    seed: u64,
    episodes: u64,
    tuning_path: Option<PathBuf>,
    heuristic: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 42,
            episodes: 10,
            tuning_path: None,
            heuristic: false,
        }
    }
}

fn parse_options() -> Options {
    let mut opts = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                if let Some(v) = args.next().and_then(|v| v.parse().ok()) {
                    opts.seed = v;
                }
            }
            "--episodes" => {
                if let Some(v) = args.next().and_then(|v| v.parse().ok()) {
                    opts.episodes = v;
                }
            }
            "--tuning" => {
                opts.tuning_path = args.next().map(PathBuf::from);
            }
            "--heuristic" => {
                opts.heuristic = true;
            }
            other => {
                log::warn!("ignoring unknown argument: {other}");
            }
        }
    }
    opts
}

/// Deterministic hazard source: drops an asteroid in from a random play-area
/// edge on a fixed cadence, aimed through the interior.
struct EdgeSpawner {
    rng: Pcg32,
    interval_ticks: u64,
    next_spawn_tick: u64,
}

impl EdgeSpawner {
    fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            interval_ticks: Tuning::secs_to_ticks(tuning.spawn_interval).max(1),
            next_spawn_tick: 0,
        }
    }

    fn update(&mut self, world: &mut World) {
        if world.time_ticks < self.next_spawn_tick {
            return;
        }
        self.next_spawn_tick = world.time_ticks + self.interval_ticks;

        let edge = Edge::ALL[self.rng.random_range(0..Edge::ALL.len())];
        let pos = world.play_area.edge_point(edge, self.rng.random_range(0.0..1.0));
        let size = self.rng.random_range(0.5..2.0);

        // Aim at a jittered point near the center so trajectories vary
        let target = world.play_area.center()
            + Vec2::new(
                self.rng.random_range(-2.0..2.0),
                self.rng.random_range(-2.0..2.0),
            );
        let speed = self.rng.random_range(0.8..2.0);
        let vel = (target - pos).normalize_or_zero() * speed;

        world.spawn_hazard(pos, vel, size);
    }
}

fn run(opts: Options) {
    let tuning = match &opts.tuning_path {
        Some(path) => Tuning::load(path).unwrap_or_else(|e| {
            log::error!("{e}; falling back to default tuning");
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let mut spawner = EdgeSpawner::new(opts.seed, &tuning);
    let mut world = World::new(tuning);
    let mut agent: Box<dyn Agent> = if opts.heuristic {
        // Scripted stand-in for manual play: thrust and fire, no steering
        let mut heuristic = HeuristicAgent::new();
        heuristic.keys.forward = true;
        heuristic.keys.fire = true;
        Box::new(heuristic)
    } else {
        Box::new(RandomAgent::new(opts.seed))
    };

    let mut episodes_done = 0;
    let mut prev_generation = world.episode.generation;
    let mut accumulator = 0.0f32;

    while episodes_done < opts.episodes {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            spawner.update(&mut world);
            tick(&mut world, agent.as_mut(), SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        world.frame_update();
        // Headless run: explosions are logged at push time, nothing renders them
        world.feedback.clear();

        if world.episode.generation != prev_generation {
            episodes_done += 1;
            log::info!(
                "episode {episodes_done}/{}: max score {}, reward {:.4}",
                opts.episodes,
                world.episode.max_score,
                agent.cumulative_reward()
            );
            prev_generation = world.episode.generation;
        }
    }

    log::info!(
        "done: {} episodes, best score {}",
        episodes_done,
        world.episode.max_score
    );
}

fn main() {
    env_logger::init();
    let opts = parse_options();
    log::info!(
        "Asteroids RL starting (seed {}, {} episodes, {} agent)",
        opts.seed,
        opts.episodes,
        if opts.heuristic { "heuristic" } else { "random" }
    );
    run(opts);
}
