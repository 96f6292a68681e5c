//! Game state and core simulation types
//!
//! Everything that must be persisted for determinism lives here. Behavior
//! that spans components (collision response, episode transitions) lives in
//! `tick.rs` and `episode.rs`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::PlayArea;
use super::episode::{EpisodeManager, RewardEvent};
use super::timer::TimerQueue;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{TurnDirection, heading};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (covers both vulnerable and invulnerable ship states)
    Playing,
    /// Terminal state, only entered when a game-over screen is configured
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Rotation angle in radians; 0 points along +Y
    pub rotation: f32,
    pub vel: Vec2,
    pub angular_vel: f32,
    /// Latched from the last action, applied every physics tick
    pub thrusting: bool,
    pub turn: TurnDirection,
    /// Edge-trigger latch: true while the fire channel is held
    pub fire_held: bool,
    /// False during the post-respawn invulnerability window
    pub collisions_enabled: bool,
    /// False once the terminal death deactivates the ship
    pub active: bool,
    /// True while not in contact with anything (earns the survival reward)
    pub safe: bool,
    /// Contact bookkeeping for the boundary enter/stay/exit penalties
    pub touching_boundary: bool,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            rotation: 0.0,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            thrusting: false,
            turn: TurnDirection::None,
            fire_held: false,
            collisions_enabled: false,
            active: true,
            safe: true,
            touching_boundary: false,
        }
    }
}

impl Ship {
    /// Forward unit vector for the current rotation
    pub fn heading(&self) -> Vec2 {
        heading(self.rotation)
    }

    /// Park the ship far outside the play area while dead
    pub fn park_dormant(&mut self) {
        self.pos = Vec2::splat(DORMANT_POSITION);
        self.vel = Vec2::ZERO;
        self.angular_vel = 0.0;
    }

    /// Place the ship at the origin with all motion cleared
    pub fn place_at_origin(&mut self) {
        self.pos = Vec2::ZERO;
        self.rotation = 0.0;
        self.vel = Vec2::ZERO;
        self.angular_vel = 0.0;
    }

    /// Integrate thrust, torque and damping for one timestep
    pub fn integrate(&mut self, tuning: &Tuning, dt: f32) {
        if self.thrusting {
            self.vel += self.heading() * tuning.thrust_speed * dt;
        }
        if self.turn != TurnDirection::None {
            self.angular_vel += tuning.rotation_speed * self.turn.sign() * dt;
        }

        self.vel *= 1.0 - (tuning.linear_damping * dt).min(1.0);
        self.angular_vel *= 1.0 - (tuning.angular_damping * dt).min(1.0);

        self.pos += self.vel * dt;
        self.rotation = crate::normalize_angle(self.rotation + self.angular_vel * dt);
    }
}

/// Hazard size class, derived from the continuous size value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardClass {
    Small,
    Medium,
    Large,
}

impl HazardClass {
    pub fn from_size(size: f32) -> Self {
        if size < SMALL_HAZARD_MAX_SIZE {
            HazardClass::Small
        } else if size < MEDIUM_HAZARD_MAX_SIZE {
            HazardClass::Medium
        } else {
            HazardClass::Large
        }
    }

    /// Score awarded when a hazard of this class is destroyed
    pub fn score_value(self) -> u32 {
        match self {
            HazardClass::Small => 100,
            HazardClass::Medium => 50,
            HazardClass::Large => 25,
        }
    }
}

/// A destructible asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Continuous size; determines class, score value and radius
    pub size: f32,
}

impl Hazard {
    pub fn class(&self) -> HazardClass {
        HazardClass::from_size(self.size)
    }

    pub fn radius(&self) -> f32 {
        self.size * HAZARD_RADIUS_PER_SIZE
    }
}

/// A ship-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Unit travel direction, fixed at spawn
    pub dir: Vec2,
    /// Speed multiplier relative to the tuned bullet speed
    pub speed_scale: f32,
    /// Remaining lifetime in physics ticks
    pub ttl_ticks: u64,
}

/// Feedback the embedder may render (explosions, etc.); gameplay-inert
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Feedback {
    Explosion { pos: Vec2 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Gameplay tunables for this run
    pub tuning: Tuning,
    /// Rectangular play area (stands in for the camera bounds)
    pub play_area: PlayArea,
    /// Physics tick counter, the monotonic clock for all timers
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub ship: Ship,
    /// Active hazards (sorted by id for determinism)
    pub hazards: Vec<Hazard>,
    /// Active bullets (sorted by id for determinism)
    pub bullets: Vec<Bullet>,
    /// Episode score/lives state machine
    pub episode: EpisodeManager,
    /// Generation the agent last opened a trajectory for
    pub agent_generation: u64,
    /// Pending deferred transitions (respawn, invulnerability end)
    pub timers: TimerQueue,
    /// Reward deltas emitted this tick, drained to the agent once per tick
    #[serde(skip)]
    pub pending_rewards: Vec<RewardEvent>,
    /// Set when the current trajectory must be finalized
    #[serde(skip)]
    pub episode_ended: bool,
    /// Visual feedback queue, drained by the embedder
    #[serde(skip)]
    pub feedback: Vec<Feedback>,
    /// Next entity ID
    next_id: u32,
}

impl World {
    pub fn new(tuning: Tuning) -> Self {
        let mut world = Self {
            tuning,
            play_area: PlayArea::default(),
            time_ticks: 0,
            phase: GamePhase::Playing,
            ship: Ship::default(),
            hazards: Vec::new(),
            bullets: Vec::new(),
            episode: EpisodeManager::default(),
            agent_generation: 0,
            timers: TimerQueue::default(),
            pending_rewards: Vec::new(),
            episode_ended: false,
            feedback: Vec::new(),
            next_id: 1,
        };
        world.new_game();
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a hazard; the caller (external spawner) decides placement
    pub fn spawn_hazard(&mut self, pos: Vec2, vel: Vec2, size: f32) -> u32 {
        debug_assert!(size > 0.0);
        let id = self.next_entity_id();
        self.hazards.push(Hazard { id, pos, vel, size });
        id
    }

    /// Spawn a bullet at the ship's position
    pub fn spawn_bullet(&mut self, dir: Vec2, speed_scale: f32) -> u32 {
        let id = self.next_entity_id();
        let ttl = crate::tuning::Tuning::secs_to_ticks(self.tuning.bullet_lifetime);
        self.bullets.push(Bullet {
            id,
            pos: self.ship.pos,
            dir: dir.normalize_or_zero(),
            speed_scale,
            ttl_ticks: ttl,
        });
        id
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.hazards.sort_by_key(|h| h.id);
        self.bullets.sort_by_key(|b| b.id);
    }

    /// Queue a reward delta for the agent; drained once per tick
    pub fn push_reward(&mut self, event: RewardEvent) {
        self.pending_rewards.push(event);
    }

    /// Queue visual feedback for the embedder
    pub fn push_feedback(&mut self, feedback: Feedback) {
        log::debug!("feedback: {feedback:?}");
        self.feedback.push(feedback);
    }

    /// What the agent observes this decision step
    pub fn observe(&self) -> crate::Observation {
        crate::Observation {
            pos: self.ship.pos,
            rotation: self.ship.rotation,
            vel: self.ship.vel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_class_thresholds() {
        assert_eq!(HazardClass::from_size(0.5), HazardClass::Small);
        assert_eq!(HazardClass::from_size(0.7), HazardClass::Medium);
        assert_eq!(HazardClass::from_size(1.0), HazardClass::Medium);
        assert_eq!(HazardClass::from_size(1.4), HazardClass::Large);
        assert_eq!(HazardClass::from_size(2.0), HazardClass::Large);
    }

    #[test]
    fn test_hazard_score_values() {
        assert_eq!(HazardClass::Small.score_value(), 100);
        assert_eq!(HazardClass::Medium.score_value(), 50);
        assert_eq!(HazardClass::Large.score_value(), 25);
    }

    #[test]
    fn test_ship_thrust_moves_along_heading() {
        let tuning = Tuning::default();
        let mut ship = Ship {
            thrusting: true,
            ..Ship::default()
        };
        for _ in 0..50 {
            ship.integrate(&tuning, crate::consts::SIM_DT);
        }
        // Heading is +Y at rotation 0
        assert!(ship.pos.y > 0.0);
        assert!(ship.pos.x.abs() < 1e-4);
    }

    #[test]
    fn test_ship_turn_changes_rotation() {
        let tuning = Tuning::default();
        let mut ship = Ship {
            turn: TurnDirection::Left,
            ..Ship::default()
        };
        for _ in 0..50 {
            ship.integrate(&tuning, crate::consts::SIM_DT);
        }
        assert!(ship.rotation > 0.0);
    }

    #[test]
    fn test_world_new_starts_fresh_episode() {
        let world = World::new(Tuning::default());
        assert_eq!(world.episode.score, 0);
        assert_eq!(world.episode.lives, 3);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.ship.pos, Vec2::ZERO);
        assert!(world.hazards.is_empty());
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut world = World::new(Tuning::default());
        let a = world.spawn_hazard(Vec2::ZERO, Vec2::ZERO, 1.0);
        let b = world.spawn_hazard(Vec2::ONE, Vec2::ZERO, 1.0);
        assert!(b > a);
    }
}
