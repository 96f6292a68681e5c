//! Play-area rectangle and the screen-wrap policy
//!
//! The play area stands in for the camera frustum of the original game.
//! With wrapping enabled an entity leaving one edge teleports to the
//! opposite edge; with wrapping disabled the edges act as physical
//! boundary colliders instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::WRAP_MARGIN;

/// Axis-aligned rectangular play area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for PlayArea {
    fn default() -> Self {
        use crate::consts::{PLAY_HALF_HEIGHT, PLAY_HALF_WIDTH};
        Self::from_half_extents(PLAY_HALF_WIDTH, PLAY_HALF_HEIGHT)
    }
}

impl PlayArea {
    pub fn from_half_extents(half_width: f32, half_height: f32) -> Self {
        Self {
            min: Vec2::new(-half_width, -half_height),
            max: Vec2::new(half_width, half_height),
        }
    }

    /// Wrap a position to the opposite edge once it exceeds a bound by more
    /// than [`WRAP_MARGIN`]. At most one axis wraps per call; the teleport is
    /// discrete and carries the same margin offset on the far side.
    ///
    /// Returns `None` when the position is within bounds (no teleport).
    pub fn wrap(&self, pos: Vec2) -> Option<Vec2> {
        if pos.x > self.max.x + WRAP_MARGIN {
            Some(Vec2::new(self.min.x - WRAP_MARGIN, pos.y))
        } else if pos.x < self.min.x - WRAP_MARGIN {
            Some(Vec2::new(self.max.x + WRAP_MARGIN, pos.y))
        } else if pos.y > self.max.y + WRAP_MARGIN {
            Some(Vec2::new(pos.x, self.min.y - WRAP_MARGIN))
        } else if pos.y < self.min.y - WRAP_MARGIN {
            Some(Vec2::new(pos.x, self.max.y + WRAP_MARGIN))
        } else {
            None
        }
    }

    /// Whether a circle at `pos` touches the play-area edge from the inside.
    /// Only meaningful when wrapping is disabled and the edges are solid.
    pub fn touches_edge(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius <= self.min.x
            || pos.x + radius >= self.max.x
            || pos.y - radius <= self.min.y
            || pos.y + radius >= self.max.y
    }

    /// A point on the named edge, used by the hazard spawner.
    pub fn edge_point(&self, edge: Edge, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        match edge {
            Edge::Left => Vec2::new(self.min.x, self.min.y + t * (self.max.y - self.min.y)),
            Edge::Right => Vec2::new(self.max.x, self.min.y + t * (self.max.y - self.min.y)),
            Edge::Bottom => Vec2::new(self.min.x + t * (self.max.x - self.min.x), self.min.y),
            Edge::Top => Vec2::new(self.min.x + t * (self.max.x - self.min.x), self.max.y),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// One of the four play-area edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top];
}
