//! Asteroids RL - an episodic survival sim driven by a learning agent
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, episode state)
//! - `agent`: Observation/action protocol and built-in agents
//! - `tuning`: Data-driven game balance

pub mod agent;
pub mod sim;
pub mod tuning;

pub use agent::{Action, Agent, Observation, TurnDirection};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area half-extents (world units)
    pub const PLAY_HALF_WIDTH: f32 = 9.0;
    pub const PLAY_HALF_HEIGHT: f32 = 5.0;
    /// Margin past a play-area edge before a wrap teleport triggers
    pub const WRAP_MARGIN: f32 = 0.5;

    /// Ship collision radius
    pub const SHIP_RADIUS: f32 = 0.4;
    /// Hazard collision radius per unit of size
    pub const HAZARD_RADIUS_PER_SIZE: f32 = 0.5;
    /// Bullet collision radius
    pub const BULLET_RADIUS: f32 = 0.1;

    /// Where a dead ship is parked while waiting for respawn or game over
    pub const DORMANT_POSITION: f32 = 10_000.0;

    /// Hazard size-class boundaries
    pub const SMALL_HAZARD_MAX_SIZE: f32 = 0.7;
    pub const MEDIUM_HAZARD_MAX_SIZE: f32 = 1.4;

    /// Score tiers that upgrade the fire pattern
    pub const DOUBLE_SHOT_SCORE: u32 = 5_000;
    pub const TRIPLE_SHOT_SCORE: u32 = 15_000;
    /// Fan half-angle for the triple-shot pattern (radians, 30 degrees)
    pub const FAN_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Forward offset factor for the second shot of the double pattern
    pub const DOUBLE_SHOT_OFFSET: f32 = 0.75;
}

/// Heading unit vector for a rotation angle (0 = +Y, positive = counterclockwise)
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::new(-rotation.sin(), rotation.cos())
}

/// Rotate a vector by an angle (radians, counterclockwise)
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
