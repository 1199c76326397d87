//! Creation of new entities: asteroid waves, fragments, explosion debris and
//! the decorative background.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Asteroid, AsteroidKind, Color, Nebula, Particle, Planet, Star};
use crate::geometry::Bounds;

/// Edge a new asteroid enters from. Never the bottom, where the player is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Left,
    Right,
}

impl SpawnEdge {
    fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => SpawnEdge::Top,
            1 => SpawnEdge::Left,
            _ => SpawnEdge::Right,
        }
    }
}

/// Number of asteroids in one wave at `level`.
pub fn wave_size(level: u32) -> usize {
    2 + level as usize
}

/// Top-up threshold: fewer live asteroids than this triggers a new wave.
pub fn min_population(level: u32, config: &GameConfig) -> usize {
    (3 + level as usize).min(config.max_asteroids)
}

/// One wave of `2 + level` asteroids entering from the top, left or right.
pub fn spawn_asteroids(
    level: u32,
    config: &GameConfig,
    bounds: Bounds,
    rng: &mut impl Rng,
) -> Vec<Asteroid> {
    let count = wave_size(level);
    log::debug!("spawning wave of {count} asteroids at level {level}");
    (0..count)
        .map(|_| {
            let kind = AsteroidKind::random(rng);
            let size = config.asteroid_min_size
                + rng.gen::<f32>() * (config.asteroid_max_size - config.asteroid_min_size);
            // Side spawns stay in the upper band, away from the player's zone.
            let side_band = (bounds.height - config.side_spawn_buffer).max(0.0);
            let (x, y) = match SpawnEdge::random(rng) {
                SpawnEdge::Top => (rng.gen::<f32>() * bounds.width, -size),
                SpawnEdge::Left => (-size, rng.gen::<f32>() * side_band),
                SpawnEdge::Right => (bounds.width + size, rng.gen::<f32>() * side_band),
            };
            Asteroid::new(x, y, size, kind, rng)
        })
        .collect()
}

/// Fragments produced when `parent` is shot apart.
///
/// `population` is the number of asteroids currently in the collection,
/// including `parent` itself and anything already queued this frame.
pub fn spawn_fragments(
    parent: &Asteroid,
    population: usize,
    config: &GameConfig,
    bounds: Bounds,
    rng: &mut impl Rng,
) -> Vec<Asteroid> {
    if parent.has_divided
        || parent.size <= config.fragment_min_parent_size
        || population >= config.fragment_population_cap
    {
        return Vec::new();
    }

    let floor = bounds.height - config.fragment_floor_buffer;
    (0..2)
        .map(|_| {
            let x = parent.x + (rng.gen::<f32>() - 0.5) * config.fragment_spread;
            let y = (parent.y + (rng.gen::<f32>() - 0.5) * config.fragment_spread).min(floor);
            let mut fragment =
                Asteroid::new(x, y, parent.size * config.fragment_scale, parent.kind, rng);
            fragment.has_divided = true;
            fragment
        })
        .collect()
}

/// A ring of `count` debris particles bursting out of `(x, y)`.
pub fn create_explosion(
    x: f32,
    y: f32,
    color: Color,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Particle> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let speed = 2.0 + rng.gen::<f32>() * 4.0;
            let life = 30 + rng.gen_range(0..30);
            Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                color,
                size: 2.0 + rng.gen::<f32>() * 4.0,
                life,
                max_life: life,
            }
        })
        .collect()
}

/// Decorative layers, created once per session.
#[derive(Clone, Debug, Default)]
pub struct Background {
    pub stars: Vec<Star>,
    pub planets: Vec<Planet>,
    pub nebulas: Vec<Nebula>,
}

pub fn create_background(config: &GameConfig, bounds: Bounds, rng: &mut impl Rng) -> Background {
    Background {
        stars: (0..config.star_count)
            .map(|_| Star::random(bounds, rng))
            .collect(),
        planets: (0..config.planet_count)
            .map(|_| Planet::random(bounds, rng))
            .collect(),
        nebulas: (0..config.nebula_count)
            .map(|_| Nebula::random(bounds, rng))
            .collect(),
    }
}
