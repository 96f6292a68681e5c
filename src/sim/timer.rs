//! Generation-keyed one-shot timers
//!
//! Respawn and invulnerability transitions are deferred state changes:
//! "do X, N ticks from now, unless a new episode starts first." Each task
//! carries the episode generation it was scheduled in; a task whose
//! generation no longer matches is stale and is dropped instead of firing
//! into a fresh episode's state.

use serde::{Deserialize, Serialize};

/// Deferred state transitions the episode manager can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerTask {
    /// Put the ship back at the origin after a non-terminal death.
    Respawn,
    /// End the post-respawn invulnerability window.
    EnableCollisions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    fire_at_tick: u64,
    generation: u64,
    task: TimerTask,
}

/// One-shot timer queue driven by the physics tick counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    entries: Vec<Entry>,
}

impl TimerQueue {
    /// Schedule `task` to fire `delay_ticks` from `now`, bound to `generation`.
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, generation: u64, task: TimerTask) {
        self.entries.push(Entry {
            fire_at_tick: now + delay_ticks,
            generation,
            task,
        });
        log::debug!(
            "scheduled {task:?} for tick {} (gen {generation})",
            now + delay_ticks
        );
    }

    /// Remove and return every task due at or before `now` that still belongs
    /// to `current_generation`. Stale-generation entries are silently dropped.
    pub fn drain_due(&mut self, now: u64, current_generation: u64) -> Vec<TimerTask> {
        let mut due = Vec::new();
        self.entries.retain(|e| {
            if e.generation != current_generation {
                log::debug!("dropping stale {:?} from gen {}", e.task, e.generation);
                return false;
            }
            if e.fire_at_tick <= now {
                due.push((e.fire_at_tick, e.task));
                return false;
            }
            true
        });
        // Fire in deadline order when several are due on the same drain
        due.sort_by_key(|(tick, _)| *tick);
        due.into_iter().map(|(_, task)| task).collect()
    }

    /// Whether any pending task of this kind exists for the generation.
    pub fn has_pending(&self, generation: u64, task: TimerTask) -> bool {
        self.entries
            .iter()
            .any(|e| e.generation == generation && e.task == task)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
