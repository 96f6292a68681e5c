//! Data-driven game balance
//!
//! Everything that differs between deployment variants (reward constants,
//! restart policy, timers) lives here instead of being hardcoded, so a
//! training run and an arcade build share one binary.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gameplay tunables, serialized as JSON alongside a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // === Ship handling ===
    /// Forward force per tick while thrusting
    pub thrust_speed: f32,
    /// Torque per tick while turning
    pub rotation_speed: f32,
    /// Linear velocity damping per second
    pub linear_damping: f32,
    /// Angular velocity damping per second
    pub angular_damping: f32,

    // === Bullets ===
    /// Bullet travel speed (units/sec)
    pub bullet_speed: f32,
    /// Bullet lifetime before despawn (seconds)
    pub bullet_lifetime: f32,

    // === Episode timing ===
    /// Delay between a non-terminal death and the respawn (seconds)
    pub respawn_delay: f32,
    /// Invulnerability window after a respawn (seconds)
    pub respawn_invulnerability: f32,
    /// Physics ticks between agent decision steps
    pub decision_interval: u32,

    // === World ===
    /// Teleport across the play area instead of colliding with its edges
    pub screen_wrapping: bool,
    /// Seconds between spawner waves in the demo harness
    pub spawn_interval: f32,

    // === Restart policy ===
    /// Hold in a terminal GameOver phase instead of restarting silently
    pub has_game_over_screen: bool,
    /// Start a fresh game automatically once lives hit zero
    pub auto_restart: bool,

    // === Reward shaping ===
    /// Per-kill reward (0.0002 in the training variant, 0.0001 in the arcade one)
    pub kill_reward: f32,
    /// Per-tick reward while not in contact with anything
    pub survival_reward: f32,
    /// One-time penalty when the ship first touches a boundary
    pub boundary_enter_penalty: f32,
    /// Per-tick penalty while the ship stays on a boundary
    pub boundary_contact_penalty: f32,
    /// Penalty for a death that leaves lives remaining
    pub death_penalty: f32,
    /// Penalty for the death that ends the episode
    pub terminal_penalty: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            thrust_speed: 1.0,
            rotation_speed: 5.0,
            linear_damping: 0.5,
            angular_damping: 3.0,

            bullet_speed: 12.0,
            bullet_lifetime: 1.5,

            respawn_delay: 3.0,
            respawn_invulnerability: 3.0,
            decision_interval: 5,

            screen_wrapping: true,
            spawn_interval: 2.0,

            has_game_over_screen: false,
            auto_restart: true,

            kill_reward: 0.0002,
            survival_reward: 0.0002,
            boundary_enter_penalty: -0.1,
            boundary_contact_penalty: -0.001,
            death_penalty: -0.3,
            terminal_penalty: -1.0,
        }
    }
}

/// Failure loading or saving a tuning file.
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "tuning file I/O error: {e}"),
            TuningError::Parse(e) => write!(f, "tuning file parse error: {e}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Load tuning from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = serde_json::from_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Save tuning to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), TuningError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Tuning saved to {}", path.display());
        Ok(())
    }

    /// Seconds to whole physics ticks, rounding up so a timer never fires early.
    pub fn secs_to_ticks(secs: f32) -> u64 {
        (secs / crate::consts::SIM_DT).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reward_constants() {
        let t = Tuning::default();
        assert_eq!(t.kill_reward, 0.0002);
        assert_eq!(t.terminal_penalty, -1.0);
        assert_eq!(t.death_penalty, -0.3);
        assert!(!t.has_game_over_screen);
        assert!(t.auto_restart);
    }

    #[test]
    fn test_json_round_trip() {
        let mut t = Tuning::default();
        t.kill_reward = 0.0001;
        t.has_game_over_screen = true;

        let json = serde_json::to_string(&t).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kill_reward, 0.0001);
        assert!(back.has_game_over_screen);
    }

    #[test]
    fn test_secs_to_ticks_rounds_up() {
        // 3 seconds at 50 Hz is exactly 150 ticks
        assert_eq!(Tuning::secs_to_ticks(3.0), 150);
        // Fractional remainders round up
        assert_eq!(Tuning::secs_to_ticks(0.001), 1);
        assert_eq!(Tuning::secs_to_ticks(0.0), 0);
    }
}
