//! Agent interface: observations in, discrete actions out, rewards accumulated
//!
//! The simulation is agnostic about who is playing. Anything implementing
//! [`Agent`] can drive the ship: the scripted [`HeuristicAgent`], the
//! [`RandomAgent`] used for smoke testing, or an external training backend.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// What the agent sees each decision step: 5 scalars in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub pos: Vec2,
    pub rotation: f32,
    pub vel: Vec2,
}

impl Observation {
    /// Flatten to the wire order `[posX, posY, rotationZ, velX, velY]`.
    pub fn to_array(&self) -> [f32; 5] {
        [self.pos.x, self.pos.y, self.rotation, self.vel.x, self.vel.y]
    }
}

/// Turn channel of the action space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnDirection {
    #[default]
    None,
    Left,
    Right,
}

impl TurnDirection {
    /// Signed torque multiplier: left is the positive (counterclockwise) direction.
    pub fn sign(self) -> f32 {
        match self {
            TurnDirection::None => 0.0,
            TurnDirection::Left => 1.0,
            TurnDirection::Right => -1.0,
        }
    }
}

/// One decision: consumed every physics tick until replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Action {
    pub thrust: bool,
    pub turn: TurnDirection,
    pub fire: bool,
}

impl Action {
    /// Decode the raw discrete channels `[0|1 thrust, 0|1|2 turn, 0|1 fire]`.
    ///
    /// Out-of-range values are a contract fault by the backend: they are
    /// clamped to the nearest valid value and logged, never propagated into
    /// the tick.
    pub fn from_discrete(channels: [i64; 3]) -> Self {
        let [thrust, turn, fire] = channels;
        if !(0..=1).contains(&thrust) || !(0..=2).contains(&turn) || !(0..=1).contains(&fire) {
            log::warn!("action outside discrete space, clamping: {channels:?}");
        }
        Self {
            thrust: thrust >= 1,
            turn: match turn.clamp(0, 2) {
                1 => TurnDirection::Left,
                2 => TurnDirection::Right,
                _ => TurnDirection::None,
            },
            fire: fire >= 1,
        }
    }
}

/// The boundary to the training backend.
///
/// Calls arrive in a strict pattern: `begin_episode`, then any number of
/// `act`/`add_reward`, then `end_episode`. Rewards sent after `end_episode`
/// and before the next `begin_episode` belong to no trajectory and must be
/// dropped.
pub trait Agent {
    /// Choose the next action. Called once per decision step.
    fn act(&mut self, obs: &Observation) -> Action;

    /// Accumulate a shaped reward delta into the current trajectory.
    fn add_reward(&mut self, delta: f32);

    /// Finalize the current trajectory.
    fn end_episode(&mut self);

    /// Open a fresh trajectory.
    fn begin_episode(&mut self);

    /// Running reward total for the current trajectory, for display.
    fn cumulative_reward(&self) -> f32;
}

/// Reward bookkeeping shared by the built-in agents.
///
/// Tracks whether a trajectory is open so that rewards arriving between
/// `end_episode` and the next `begin_episode` can be rejected.
#[derive(Debug, Clone)]
pub struct RewardLedger {
    cumulative: f32,
    episode_open: bool,
    episodes_completed: u64,
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self {
            cumulative: 0.0,
            episode_open: true,
            episodes_completed: 0,
        }
    }
}

impl RewardLedger {
    pub fn add(&mut self, delta: f32) {
        if !self.episode_open {
            log::warn!("reward {delta} arrived after end_episode, dropping");
            return;
        }
        self.cumulative += delta;
    }

    pub fn end_episode(&mut self) {
        if self.episode_open {
            self.episodes_completed += 1;
        }
        self.episode_open = false;
    }

    pub fn begin_episode(&mut self) {
        self.cumulative = 0.0;
        self.episode_open = true;
    }

    pub fn cumulative(&self) -> f32 {
        self.cumulative
    }

    pub fn episodes_completed(&self) -> u64 {
        self.episodes_completed
    }
}

/// Key state consumed by the heuristic agent, sampled by the embedder.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub forward: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Manual control: maps held keys straight onto the discrete action space.
#[derive(Debug, Default)]
pub struct HeuristicAgent {
    pub keys: KeyState,
    ledger: RewardLedger,
}

impl HeuristicAgent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Agent for HeuristicAgent {
    fn act(&mut self, _obs: &Observation) -> Action {
        Action {
            thrust: self.keys.forward,
            turn: if self.keys.left {
                TurnDirection::Left
            } else if self.keys.right {
                TurnDirection::Right
            } else {
                TurnDirection::None
            },
            fire: self.keys.fire,
        }
    }

    fn add_reward(&mut self, delta: f32) {
        self.ledger.add(delta);
    }

    fn end_episode(&mut self) {
        self.ledger.end_episode();
    }

    fn begin_episode(&mut self) {
        self.ledger.begin_episode();
    }

    fn cumulative_reward(&self) -> f32 {
        self.ledger.cumulative()
    }
}

/// Uniform-random policy for smoke tests and reward-plumbing checks.
#[derive(Debug)]
pub struct RandomAgent {
    rng: Pcg32,
    ledger: RewardLedger,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            rng: Pcg32::seed_from_u64(seed),
            ledger: RewardLedger::default(),
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _obs: &Observation) -> Action {
        Action::from_discrete([
            self.rng.random_range(0..2),
            self.rng.random_range(0..3),
            self.rng.random_range(0..2),
        ])
    }

    fn add_reward(&mut self, delta: f32) {
        self.ledger.add(delta);
    }

    fn end_episode(&mut self) {
        self.ledger.end_episode();
    }

    fn begin_episode(&mut self) {
        self.ledger.begin_episode();
    }

    fn cumulative_reward(&self) -> f32 {
        self.ledger.cumulative()
    }
}
