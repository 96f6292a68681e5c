//! Property tests for the simulation invariants that must hold for any
//! input: wrap teleports, score accounting, and reward bookkeeping.

use glam::Vec2;
use proptest::prelude::*;

use asteroids_rl::agent::{Action, Agent, Observation};
use asteroids_rl::consts::SIM_DT;
use asteroids_rl::sim::bounds::PlayArea;
use asteroids_rl::sim::{HazardClass, World, tick};
use asteroids_rl::tuning::Tuning;

/// Reward-counting agent that always coasts.
struct CountingAgent {
    rewards: Vec<f32>,
}

impl Agent for CountingAgent {
    fn act(&mut self, _obs: &Observation) -> Action {
        Action::default()
    }
    fn add_reward(&mut self, delta: f32) {
        self.rewards.push(delta);
    }
    fn end_episode(&mut self) {}
    fn begin_episode(&mut self) {}
    fn cumulative_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }
}

proptest! {
    /// Wrapping never moves the untouched axis and always lands the wrapped
    /// axis exactly one margin outside the opposite edge.
    #[test]
    fn wrap_lands_on_opposite_edge(x in -30.0f32..30.0, y in -30.0f32..30.0) {
        let area = PlayArea::from_half_extents(9.0, 5.0);
        let pos = Vec2::new(x, y);
        if let Some(wrapped) = area.wrap(pos) {
            let x_wrapped = wrapped.x != pos.x;
            let y_wrapped = wrapped.y != pos.y;
            // Exactly one axis teleports per call
            prop_assert!(x_wrapped ^ y_wrapped);
            if x_wrapped {
                prop_assert!(
                    (wrapped.x.abs() - (area.max.x + 0.5)).abs() < 1e-5
                );
                prop_assert_eq!(wrapped.y, pos.y);
            } else {
                prop_assert!(
                    (wrapped.y.abs() - (area.max.y + 0.5)).abs() < 1e-5
                );
                prop_assert_eq!(wrapped.x, pos.x);
            }
        } else {
            // No teleport while within the margin on both axes
            prop_assert!(pos.x <= area.max.x + 0.5 && pos.x >= area.min.x - 0.5);
            prop_assert!(pos.y <= area.max.y + 0.5 && pos.y >= area.min.y - 0.5);
        }
    }

    /// A wrapped position is stable when only one axis was out of bounds:
    /// wrapping it again does nothing.
    #[test]
    fn wrap_is_idempotent_per_axis(x in -30.0f32..30.0, y in -5.4f32..5.4) {
        let area = PlayArea::from_half_extents(9.0, 5.0);
        if let Some(wrapped) = area.wrap(Vec2::new(x, y)) {
            prop_assert!(area.wrap(wrapped).is_none());
        }
    }

    /// Size-class boundaries: score value is a step function of size.
    #[test]
    fn hazard_value_matches_class(size in 0.01f32..10.0) {
        let value = HazardClass::from_size(size).score_value();
        if size < 0.7 {
            prop_assert_eq!(value, 100);
        } else if size < 1.4 {
            prop_assert_eq!(value, 50);
        } else {
            prop_assert_eq!(value, 25);
        }
    }

    /// Max score never decreases, whatever sequence of kills and deaths
    /// the sim goes through.
    #[test]
    fn max_score_monotonic(sizes in prop::collection::vec(0.3f32..3.0, 0..40)) {
        let mut world = World::new(Tuning::default());
        let mut agent = CountingAgent { rewards: Vec::new() };
        let mut prev_max = 0;

        for (i, size) in sizes.iter().enumerate() {
            // Drop a hazard onto a bullet so it gets destroyed
            world.spawn_hazard(Vec2::new(0.0, 1.0), Vec2::ZERO, *size);
            world.spawn_bullet(Vec2::new(0.0, 1.0), 1.0);
            for _ in 0..30 {
                tick(&mut world, &mut agent, SIM_DT);
            }
            world.frame_update();

            prop_assert!(world.episode.max_score >= world.episode.score);
            prop_assert!(world.episode.max_score >= prev_max);
            prev_max = world.episode.max_score;

            // Periodically reset mid-run; max score must survive
            if i % 7 == 6 {
                world.new_game();
            }
        }
    }

    /// Lives stay within 0..=3 under arbitrary death sequences.
    #[test]
    fn lives_bounded(deaths in 0usize..10) {
        let mut world = World::new(Tuning::default());
        for _ in 0..deaths {
            world.on_player_death();
            assert!(world.episode.lives <= 3);
            world.frame_update();
            assert!((1..=3).contains(&world.episode.lives) || !world.tuning.auto_restart);
        }
    }
}
