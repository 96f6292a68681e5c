//! Collision classification and detection
//!
//! Contacts between classified entities resolve through an explicit
//! reaction table consulted by the physics step, rather than callbacks
//! scattered across entity code. Detection itself is plain circle-overlap;
//! the play-area edges are the only non-circle collider.

use glam::Vec2;

/// Everything that can participate in a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ship,
    Hazard,
    Bullet,
    Boundary,
}

/// What the physics step does about a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Ship hit a hazard: zero its motion and report a death
    KillShip,
    /// Bullet hit a hazard: destroy both and award the kill
    DestroyHazard,
    /// Ship touched a play-area edge: penalty bookkeeping
    ShipOnBoundary,
    /// No gameplay response (hazard-hazard, bullet-bullet, ...)
    Ignore,
}

/// Resolution table keyed by the pair of entity kinds, order-insensitive.
pub fn reaction(a: EntityKind, b: EntityKind) -> Reaction {
    use EntityKind::*;
    match (a, b) {
        (Ship, Hazard) | (Hazard, Ship) => Reaction::KillShip,
        (Bullet, Hazard) | (Hazard, Bullet) => Reaction::DestroyHazard,
        (Ship, Boundary) | (Boundary, Ship) => Reaction::ShipOnBoundary,
        _ => Reaction::Ignore,
    }
}

/// Circle-circle overlap test.
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    let r = radius_a + radius_b;
    pos_a.distance_squared(pos_b) <= r * r
}

/// Contact lifecycle for a persistent collider pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Enter,
    Stay,
    Exit,
}

/// Derive the contact phase from last tick's and this tick's overlap state.
pub fn contact_phase(was_touching: bool, touching: bool) -> Option<ContactPhase> {
    match (was_touching, touching) {
        (false, true) => Some(ContactPhase::Enter),
        (true, true) => Some(ContactPhase::Stay),
        (true, false) => Some(ContactPhase::Exit),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_table_symmetric() {
        use EntityKind::*;
        for (a, b) in [(Ship, Hazard), (Bullet, Hazard), (Ship, Boundary)] {
            assert_eq!(reaction(a, b), reaction(b, a));
        }
    }

    #[test]
    fn test_reaction_table_pairs() {
        use EntityKind::*;
        assert_eq!(reaction(Ship, Hazard), Reaction::KillShip);
        assert_eq!(reaction(Bullet, Hazard), Reaction::DestroyHazard);
        assert_eq!(reaction(Ship, Boundary), Reaction::ShipOnBoundary);
        assert_eq!(reaction(Hazard, Hazard), Reaction::Ignore);
        assert_eq!(reaction(Bullet, Ship), Reaction::Ignore);
        assert_eq!(reaction(Bullet, Boundary), Reaction::Ignore);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(
            Vec2::ZERO,
            1.0,
            Vec2::new(1.5, 0.0),
            1.0
        ));
        assert!(!circles_overlap(
            Vec2::ZERO,
            1.0,
            Vec2::new(2.5, 0.0),
            1.0
        ));
        // Exactly touching counts as contact
        assert!(circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
    }

    #[test]
    fn test_contact_phase_transitions() {
        assert_eq!(contact_phase(false, true), Some(ContactPhase::Enter));
        assert_eq!(contact_phase(true, true), Some(ContactPhase::Stay));
        assert_eq!(contact_phase(true, false), Some(ContactPhase::Exit));
        assert_eq!(contact_phase(false, false), None);
    }
}
