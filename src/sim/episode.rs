//! Episode state machine: score, lives, respawn and restart policy
//!
//! `EpisodeManager` is the sole authority for game-outcome rewards (kills,
//! deaths, survival of the episode). All operations are total: they mutate
//! process-local state and delegate side effects to the feedback queue.

use serde::{Deserialize, Serialize};

use super::state::{Feedback, GamePhase, Hazard, World};
use super::timer::TimerTask;
use crate::tuning::Tuning;

/// Score/lives bookkeeping for the current episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeManager {
    pub score: u32,
    /// Best score seen this process; monotonically non-decreasing
    pub max_score: u32,
    /// Remaining lives, 0..=3; 0 is terminal for the episode
    pub lives: u8,
    /// Episode counter; timers from older generations are stale
    pub generation: u64,
}

impl Default for EpisodeManager {
    fn default() -> Self {
        Self {
            score: 0,
            max_score: 0,
            lives: 0,
            generation: 0,
        }
    }
}

/// A causal game event carrying a reward delta for the agent.
///
/// Events are queued on the world and drained to the agent exactly once per
/// tick, so a single collision can never be double-counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardEvent {
    /// A hazard was destroyed by a bullet or the ship
    HazardDestroyed,
    /// One physics tick passed without the ship touching anything
    Survival,
    /// The ship entered contact with a play-area boundary
    BoundaryEnter,
    /// The ship stayed in contact with a boundary for a tick
    BoundaryContact,
    /// The ship died with lives remaining
    Death,
    /// The ship died on its last life, ending the episode
    TerminalDeath,
}

impl RewardEvent {
    /// Shaped reward delta for this event under the given tuning.
    pub fn value(self, tuning: &Tuning) -> f32 {
        match self {
            RewardEvent::HazardDestroyed => tuning.kill_reward,
            RewardEvent::Survival => tuning.survival_reward,
            RewardEvent::BoundaryEnter => tuning.boundary_enter_penalty,
            RewardEvent::BoundaryContact => tuning.boundary_contact_penalty,
            RewardEvent::Death => tuning.death_penalty,
            RewardEvent::TerminalDeath => tuning.terminal_penalty,
        }
    }
}

impl World {
    /// Start a fresh episode: clear the field, reset score and lives, respawn.
    ///
    /// Bumping the generation implicitly cancels every pending timer from the
    /// previous episode. Safe to call repeatedly; a second call observes an
    /// already-clean world and resets it to the same state.
    pub fn new_game(&mut self) {
        self.episode.generation += 1;
        self.hazards.clear();
        self.bullets.clear();

        self.ship.active = true;
        self.ship.safe = true;
        self.ship.fire_held = false;

        self.episode.score = 0;
        self.episode.lives = 3;
        self.phase = GamePhase::Playing;

        log::info!(
            "new game (gen {}), max score so far {}",
            self.episode.generation,
            self.episode.max_score
        );
        self.respawn();
    }

    /// Place the ship at the origin, invulnerable until the timer elapses.
    pub fn respawn(&mut self) {
        self.ship.place_at_origin();
        self.ship.collisions_enabled = false;
        self.ship.safe = true;
        self.ship.touching_boundary = false;
        let delay = Tuning::secs_to_ticks(self.tuning.respawn_invulnerability);
        self.timers.schedule(
            self.time_ticks,
            delay,
            self.episode.generation,
            TimerTask::EnableCollisions,
        );
    }

    /// A hazard was destroyed: award score by size class and reward the agent.
    pub fn on_hazard_destroyed(&mut self, hazard: &Hazard) {
        self.push_feedback(Feedback::Explosion { pos: hazard.pos });

        let value = hazard.class().score_value();
        self.episode.score += value;
        self.push_reward(RewardEvent::HazardDestroyed);
        log::debug!(
            "hazard {} destroyed ({:?}, +{value}), score {}",
            hazard.id,
            hazard.class(),
            self.episode.score
        );
    }

    /// The ship collided with a hazard.
    ///
    /// Terminal path (last life): penalize, deactivate, end the episode.
    /// Otherwise: penalize, drop collisions, and schedule a respawn.
    pub fn on_player_death(&mut self) {
        self.push_feedback(Feedback::Explosion { pos: self.ship.pos });
        self.ship.park_dormant();
        self.episode.lives = self.episode.lives.saturating_sub(1);

        if self.episode.lives == 0 {
            self.push_reward(RewardEvent::TerminalDeath);
            self.ship.active = false;
            self.episode_ended = true;
            if self.tuning.has_game_over_screen {
                self.phase = GamePhase::GameOver;
            }
            log::info!(
                "episode over at score {} (gen {})",
                self.episode.score,
                self.episode.generation
            );
        } else {
            self.push_reward(RewardEvent::Death);
            self.ship.collisions_enabled = false;
            let delay = Tuning::secs_to_ticks(self.tuning.respawn_delay);
            self.timers.schedule(
                self.time_ticks,
                delay,
                self.episode.generation,
                TimerTask::Respawn,
            );
            log::debug!("death, {} lives left", self.episode.lives);
        }
    }

    /// Presentation-rate update: clamp the max score and apply the restart
    /// policy. Runs every frame while lives is 0, so `new_game` must tolerate
    /// repeated calls.
    pub fn frame_update(&mut self) {
        if self.episode.score > self.episode.max_score {
            self.episode.max_score = self.episode.score;
        }

        if self.episode.lives == 0
            && self.tuning.auto_restart
            && self.phase == GamePhase::Playing
        {
            self.new_game();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn world() -> World {
        World::new(Tuning::default())
    }

    fn hazard_of_size(size: f32) -> Hazard {
        Hazard {
            id: 99,
            pos: Vec2::new(1.0, 2.0),
            vel: Vec2::ZERO,
            size,
        }
    }

    #[test]
    fn test_score_by_size_class() {
        let mut w = world();
        w.on_hazard_destroyed(&hazard_of_size(0.5));
        assert_eq!(w.episode.score, 100);
        w.on_hazard_destroyed(&hazard_of_size(1.0));
        assert_eq!(w.episode.score, 150);
        w.on_hazard_destroyed(&hazard_of_size(2.0));
        assert_eq!(w.episode.score, 175);
    }

    #[test]
    fn test_kill_emits_reward_and_feedback() {
        let mut w = world();
        w.on_hazard_destroyed(&hazard_of_size(0.5));
        assert_eq!(w.pending_rewards, vec![RewardEvent::HazardDestroyed]);
        assert_eq!(
            w.feedback,
            vec![Feedback::Explosion {
                pos: Vec2::new(1.0, 2.0)
            }]
        );
    }

    #[test]
    fn test_nonterminal_death() {
        let mut w = world();
        assert_eq!(w.episode.lives, 3);
        w.pending_rewards.clear();

        w.on_player_death();
        assert_eq!(w.episode.lives, 2);
        assert_eq!(w.pending_rewards, vec![RewardEvent::Death]);
        assert!(!w.ship.collisions_enabled);
        assert!(w.ship.active);
        assert!(!w.episode_ended);
        assert!(w.timers.has_pending(w.episode.generation, TimerTask::Respawn));
        // Parked outside the play area while dead
        assert!(w.ship.pos.x > w.play_area.max.x);
    }

    #[test]
    fn test_terminal_death_on_last_life() {
        let mut w = world();
        w.episode.lives = 1;
        w.pending_rewards.clear();

        w.on_player_death();
        assert_eq!(w.episode.lives, 0);
        assert_eq!(w.pending_rewards, vec![RewardEvent::TerminalDeath]);
        assert!(!w.ship.active);
        assert!(w.episode_ended);
        // No respawn scheduled on the terminal path
        assert!(!w.timers.has_pending(w.episode.generation, TimerTask::Respawn));
    }

    #[test]
    fn test_game_over_screen_variant() {
        let mut w = World::new(Tuning {
            has_game_over_screen: true,
            auto_restart: false,
            ..Tuning::default()
        });
        w.episode.lives = 1;
        w.on_player_death();
        assert_eq!(w.phase, GamePhase::GameOver);

        // Held in GameOver: frame updates do not restart
        w.frame_update();
        w.frame_update();
        assert_eq!(w.phase, GamePhase::GameOver);
        assert_eq!(w.episode.lives, 0);
    }

    #[test]
    fn test_auto_restart_from_zero_lives() {
        let mut w = world();
        w.episode.lives = 1;
        w.on_player_death();
        assert_eq!(w.episode.lives, 0);

        w.frame_update();
        assert_eq!(w.episode.lives, 3);
        assert_eq!(w.episode.score, 0);
        assert!(w.ship.active);
        assert_eq!(w.ship.pos, Vec2::ZERO);
    }

    #[test]
    fn test_new_game_idempotent() {
        let mut w = world();
        w.spawn_hazard(Vec2::ONE, Vec2::ZERO, 1.0);
        w.episode.score = 500;

        w.new_game();
        w.new_game();
        assert_eq!(w.episode.lives, 3);
        assert_eq!(w.episode.score, 0);
        assert!(w.hazards.is_empty());
    }

    #[test]
    fn test_max_score_survives_new_game() {
        let mut w = world();
        w.episode.score = 700;
        w.frame_update();
        assert_eq!(w.episode.max_score, 700);

        w.new_game();
        w.frame_update();
        assert_eq!(w.episode.max_score, 700);
        assert_eq!(w.episode.score, 0);
    }

    #[test]
    fn test_max_score_monotonic() {
        let mut w = world();
        w.episode.score = 300;
        w.frame_update();
        w.episode.score = 100;
        w.frame_update();
        assert_eq!(w.episode.max_score, 300);
        assert!(w.episode.max_score >= w.episode.score);
    }

    #[test]
    fn test_new_game_cancels_prior_timers() {
        let mut w = world();
        w.on_player_death();
        let old_gen = w.episode.generation;
        assert!(w.timers.has_pending(old_gen, TimerTask::Respawn));

        w.new_game();
        assert!(w.episode.generation > old_gen);
        // The old respawn never fires into the new episode; only the new
        // invulnerability timer remains
        let due = w.timers.drain_due(u64::MAX, w.episode.generation);
        assert_eq!(due, vec![TimerTask::EnableCollisions]);
    }
}
