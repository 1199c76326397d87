//! Collision detection and response.
//!
//! These functions mutate the entities directly involved in a contact and
//! report what happened; scoring, effects and spawning are left to the caller.

use rand::Rng;

use crate::entities::{Asteroid, Player, Projectile};
use crate::geometry::check_collision;

/// Pairs closer than this are treated as sharing a centre.
const DEGENERATE_DISTANCE: f32 = 1e-4;

/// Apply projectile hits to asteroids.
///
/// Every projectile that overlaps a live asteroid is consumed and deals
/// `damage` to the first such asteroid. Returns the indices of asteroids
/// destroyed by this pass, in the order they were destroyed. Destroyed
/// asteroids stay in the slice (health ≤ 0) until the next filter step.
pub fn resolve_projectile_hits(
    projectiles: &mut Vec<Projectile>,
    asteroids: &mut [Asteroid],
    damage: f32,
) -> Vec<usize> {
    let mut destroyed = Vec::new();
    projectiles.retain(|proj| {
        let hit_box = proj.bounding_box();
        let target = asteroids
            .iter()
            .position(|a| !a.is_destroyed() && check_collision(&hit_box, &a.bounding_box()));
        match target {
            Some(i) => {
                if asteroids[i].take_damage(damage) {
                    destroyed.push(i);
                }
                false
            }
            None => true,
        }
    });
    destroyed
}

/// Indices of live asteroids whose box overlaps the player's.
pub fn player_collisions(player: &Player, asteroids: &[Asteroid]) -> Vec<usize> {
    let ship = player.bounding_box();
    asteroids
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.is_destroyed() && check_collision(&ship, &a.bounding_box()))
        .map(|(i, _)| i)
        .collect()
}

/// Outcome of resolving one overlapping asteroid pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairContact {
    /// Pushed apart only; they were already separating.
    Separated,
    /// Pushed apart and bounced.
    Bounced,
}

/// Treat two asteroids as circles and resolve an overlap between them.
///
/// Each body moves half the overlap along the contact normal. If they are
/// closing, both receive an impulse of `-vn * restitution` along the normal
/// plus independent velocity jitter of up to `±jitter / 2` per axis.
pub fn resolve_pair(
    a: &mut Asteroid,
    b: &mut Asteroid,
    restitution: f32,
    jitter: f32,
    rng: &mut impl Rng,
) -> Option<PairContact> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let min_distance = a.size + b.size;
    if distance >= min_distance {
        return None;
    }

    let (nx, ny) = if distance < DEGENERATE_DISTANCE {
        (1.0, 0.0)
    } else {
        (dx / distance, dy / distance)
    };

    let half_overlap = (min_distance - distance) * 0.5;
    a.x -= nx * half_overlap;
    a.y -= ny * half_overlap;
    b.x += nx * half_overlap;
    b.y += ny * half_overlap;

    let velocity_along_normal = (b.vx - a.vx) * nx + (b.vy - a.vy) * ny;
    if velocity_along_normal >= 0.0 {
        return Some(PairContact::Separated);
    }

    let impulse = -velocity_along_normal * restitution;
    a.vx -= nx * impulse;
    a.vy -= ny * impulse;
    b.vx += nx * impulse;
    b.vy += ny * impulse;

    for body in [a, b] {
        body.vx += (rng.gen::<f32>() - 0.5) * jitter;
        body.vy += (rng.gen::<f32>() - 0.5) * jitter;
    }
    Some(PairContact::Bounced)
}

/// Resolve every overlapping pair, in index order. Returns the number of
/// pairs that bounced.
pub fn resolve_asteroid_pairs(
    asteroids: &mut [Asteroid],
    restitution: f32,
    jitter: f32,
    rng: &mut impl Rng,
) -> usize {
    let mut bounces = 0;
    for i in 0..asteroids.len() {
        let (head, tail) = asteroids.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_pair(a, b, restitution, jitter, rng) == Some(PairContact::Bounced) {
                bounces += 1;
            }
        }
    }
    bounces
}
