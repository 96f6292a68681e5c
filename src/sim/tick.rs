//! Fixed timestep simulation tick
//!
//! Advances the world by one physics step: latched action intents, ship
//! integration, wrap policy, bullet/hazard motion, collision resolution via
//! the reaction table, and reward delivery to the agent. The variable-rate
//! presentation update (`World::frame_update`) lives in `episode.rs`.

use glam::Vec2;

use super::collision::{
    ContactPhase, EntityKind, Reaction, circles_overlap, contact_phase, reaction,
};
use super::state::{GamePhase, World};
use super::timer::TimerTask;
use crate::agent::{Action, Agent};
use super::episode::RewardEvent;
use crate::consts::*;
use crate::rotate_vec;

/// Advance the world by one fixed timestep, exchanging decisions and
/// rewards with the agent.
pub fn tick(world: &mut World, agent: &mut dyn Agent, dt: f32) {
    if world.phase == GamePhase::GameOver {
        return;
    }

    // A generation bump means a new episode started since the agent last
    // heard from us; open a fresh trajectory before anything else accrues.
    if world.episode.generation != world.agent_generation {
        agent.begin_episode();
        world.agent_generation = world.episode.generation;
    }

    world.time_ticks += 1;

    // Deferred transitions first, so a respawn due this tick takes effect
    // before physics runs.
    for task in world
        .timers
        .drain_due(world.time_ticks, world.episode.generation)
    {
        match task {
            TimerTask::Respawn => world.respawn(),
            TimerTask::EnableCollisions => {
                if world.ship.active {
                    world.ship.collisions_enabled = true;
                    log::debug!("invulnerability over at tick {}", world.time_ticks);
                }
            }
        }
    }

    let ship_live = world.ship.active && !ship_is_dormant(world);

    // Decision step: the agent sees the world and replaces the latched
    // action every `decision_interval` ticks.
    if ship_live && world.time_ticks % world.tuning.decision_interval.max(1) as u64 == 0 {
        let obs = world.observe();
        let action = agent.act(&obs);
        apply_action(world, action);
    }

    if ship_live {
        // Survival reward uses last tick's contact state: a hit this tick
        // only suppresses the reward from the next tick on.
        if world.ship.safe {
            world.push_reward(RewardEvent::Survival);
        }

        let tuning = &world.tuning;
        world.ship.integrate(tuning, dt);

        if world.tuning.screen_wrapping {
            if let Some(wrapped) = world.play_area.wrap(world.ship.pos) {
                // Discrete teleport; never produces contact events
                world.ship.pos = wrapped;
            }
        }
    }

    move_bullets(world, dt);
    move_hazards(world, dt);
    resolve_collisions(world, ship_live);

    world.normalize_order();

    // Deliver this tick's reward deltas exactly once, then finalize the
    // trajectory if the episode ended.
    for event in std::mem::take(&mut world.pending_rewards) {
        agent.add_reward(event.value(&world.tuning));
    }
    if world.episode_ended {
        agent.end_episode();
        world.episode_ended = false;
    }
}

/// Whether the ship is parked at the dormant position between death and
/// respawn. A dormant ship takes no actions, earns no survival reward, and
/// must not be screen-wrapped back into the field.
fn ship_is_dormant(world: &World) -> bool {
    world.ship.pos.x >= DORMANT_POSITION
}

/// Latch the decision onto the ship and run the edge-triggered fire control.
fn apply_action(world: &mut World, action: Action) {
    world.ship.thrusting = action.thrust;
    world.ship.turn = action.turn;

    if action.fire && !world.ship.fire_held {
        world.ship.fire_held = true;
        shoot_based_on_score(world);
    } else if !action.fire {
        world.ship.fire_held = false;
    }
}

/// Fire a volley whose pattern depends on the current score tier.
fn shoot_based_on_score(world: &mut World) {
    let score = world.episode.score;
    let forward = world.ship.heading();

    if score < DOUBLE_SHOT_SCORE {
        world.spawn_bullet(forward, 1.0);
    } else if score < TRIPLE_SHOT_SCORE {
        world.spawn_bullet(forward, 1.0);
        world.spawn_bullet(forward, DOUBLE_SHOT_OFFSET);
    } else {
        world.spawn_bullet(rotate_vec(forward, FAN_ANGLE), 1.0);
        world.spawn_bullet(forward, 1.0);
        world.spawn_bullet(rotate_vec(forward, -FAN_ANGLE), 1.0);
    }
}

fn move_bullets(world: &mut World, dt: f32) {
    let speed = world.tuning.bullet_speed;
    for bullet in &mut world.bullets {
        bullet.pos += bullet.dir * speed * bullet.speed_scale * dt;
        bullet.ttl_ticks = bullet.ttl_ticks.saturating_sub(1);
    }
    world.bullets.retain(|b| b.ttl_ticks > 0);
}

fn move_hazards(world: &mut World, dt: f32) {
    let wrapping = world.tuning.screen_wrapping;
    let area = world.play_area;
    for hazard in &mut world.hazards {
        hazard.pos += hazard.vel * dt;
        if wrapping {
            if let Some(wrapped) = area.wrap(hazard.pos) {
                hazard.pos = wrapped;
            }
        }
    }
    if !wrapping {
        // Without wrapping, cull hazards that drift well past the edges
        let cull = Vec2::splat(4.0 * WRAP_MARGIN);
        let (min, max) = (area.min - cull, area.max + cull);
        world
            .hazards
            .retain(|h| h.pos.cmpge(min).all() && h.pos.cmple(max).all());
    }
}

/// Kind pairs the physics step checks for contact each tick.
const COLLIDING_PAIRS: [(EntityKind, EntityKind); 3] = [
    (EntityKind::Bullet, EntityKind::Hazard),
    (EntityKind::Ship, EntityKind::Hazard),
    (EntityKind::Ship, EntityKind::Boundary),
];

/// Resolve this tick's contacts through the reaction table.
fn resolve_collisions(world: &mut World, ship_live: bool) {
    for (a, b) in COLLIDING_PAIRS {
        match reaction(a, b) {
            Reaction::DestroyHazard => resolve_bullet_hazard(world),
            Reaction::KillShip if ship_live => resolve_ship_hazard(world),
            Reaction::ShipOnBoundary if ship_live => resolve_ship_boundary(world),
            _ => {}
        }
    }
}

fn resolve_bullet_hazard(world: &mut World) {
    // Each bullet destroys at most one hazard; both despawn on contact,
    // so a kill can never be counted twice.
    let mut destroyed_hazards = Vec::new();
    let mut spent_bullets = Vec::new();

    for bullet in &world.bullets {
        for hazard in &world.hazards {
            if destroyed_hazards.contains(&hazard.id) {
                continue;
            }
            if circles_overlap(bullet.pos, BULLET_RADIUS, hazard.pos, hazard.radius()) {
                destroyed_hazards.push(hazard.id);
                spent_bullets.push(bullet.id);
                break;
            }
        }
    }

    for id in &destroyed_hazards {
        if let Some(idx) = world.hazards.iter().position(|h| h.id == *id) {
            let hazard = world.hazards.remove(idx);
            world.on_hazard_destroyed(&hazard);
        }
    }
    world.bullets.retain(|b| !spent_bullets.contains(&b.id));
}

fn resolve_ship_hazard(world: &mut World) {
    if !world.ship.collisions_enabled {
        return;
    }

    let hit = world
        .hazards
        .iter()
        .position(|h| circles_overlap(world.ship.pos, SHIP_RADIUS, h.pos, h.radius()));
    if let Some(idx) = hit {
        // The hazard goes up with the ship; no score, no kill reward
        world.hazards.remove(idx);
        world.ship.vel = Vec2::ZERO;
        world.ship.angular_vel = 0.0;
        world.ship.safe = false;
        world.on_player_death();
    }
}

fn resolve_ship_boundary(world: &mut World) {
    // Boundary colliders only exist when screen wrapping is off
    if world.tuning.screen_wrapping {
        return;
    }

    let touching = world.play_area.touches_edge(world.ship.pos, SHIP_RADIUS);
    match contact_phase(world.ship.touching_boundary, touching) {
        Some(ContactPhase::Enter) => {
            world.ship.safe = false;
            world.push_reward(RewardEvent::BoundaryEnter);
        }
        Some(ContactPhase::Stay) => {
            world.push_reward(RewardEvent::BoundaryContact);
        }
        Some(ContactPhase::Exit) => {
            world.ship.safe = true;
        }
        None => {}
    }
    world.ship.touching_boundary = touching;
}
