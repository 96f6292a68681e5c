//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (the sim itself holds no RNG; spawners pass one in)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod episode;
pub mod state;
pub mod tick;
pub mod timer;

pub use bounds::{Edge, PlayArea};
pub use collision::{ContactPhase, EntityKind, Reaction, circles_overlap, reaction};
pub use episode::{EpisodeManager, RewardEvent};
pub use state::{Bullet, Feedback, GamePhase, Hazard, HazardClass, Ship, World};
pub use tick::tick;
pub use timer::{TimerQueue, TimerTask};
