//! The simulation's view of the outside world's drawing surfaces.
//!
//! A `Renderer` gets one call per visible entity in back-to-front order; a
//! `UiSink` gets the HUD numbers. Neither may touch the simulation.

use rand::Rng;

use crate::compute::Simulation;
use crate::entities::{Asteroid, GameState, Nebula, Particle, Planet, Player, Projectile, Star};

pub trait Renderer {
    /// Start a frame, translated by the camera-shake offset.
    fn begin_frame(&mut self, offset: (f32, f32));
    fn draw_nebula(&mut self, nebula: &Nebula);
    fn draw_star(&mut self, star: &Star);
    fn draw_planet(&mut self, planet: &Planet);
    fn draw_particle(&mut self, particle: &Particle);
    fn draw_asteroid(&mut self, asteroid: &Asteroid);
    fn draw_projectile(&mut self, projectile: &Projectile);
    fn draw_player(&mut self, player: &Player);
    fn end_frame(&mut self);
}

/// Anything that knows which renderer call draws it.
pub trait Drawable {
    fn draw(&self, renderer: &mut dyn Renderer);
}

macro_rules! drawable {
    ($ty:ty, $method:ident) => {
        impl Drawable for $ty {
            fn draw(&self, renderer: &mut dyn Renderer) {
                renderer.$method(self);
            }
        }
    };
}

drawable!(Nebula, draw_nebula);
drawable!(Star, draw_star);
drawable!(Planet, draw_planet);
drawable!(Particle, draw_particle);
drawable!(Asteroid, draw_asteroid);
drawable!(Projectile, draw_projectile);
drawable!(Player, draw_player);

/// Random camera offset for this frame, or `(0, 0)` when not shaking.
pub fn shake_offset(state: &GameState, rng: &mut impl Rng) -> (f32, f32) {
    if state.camera_shake == 0 {
        return (0.0, 0.0);
    }
    let intensity = state.camera_shake_intensity;
    (
        (rng.gen::<f32>() - 0.5) * intensity,
        (rng.gen::<f32>() - 0.5) * intensity,
    )
}

/// Draw the whole scene: nebulas, stars, planets, particles, asteroids,
/// projectiles, player. Performance mode drops nebulas, planets and every
/// odd-indexed star.
pub fn render_scene(sim: &Simulation, renderer: &mut dyn Renderer, rng: &mut impl Rng) {
    let state = &sim.state;
    let background = &sim.background;
    let lean = state.performance_mode;

    renderer.begin_frame(shake_offset(state, rng));

    if !lean {
        background.nebulas.iter().for_each(|n| n.draw(renderer));
    }
    for (i, star) in background.stars.iter().enumerate() {
        if !lean || i % 2 == 0 {
            star.draw(renderer);
        }
    }
    if !lean {
        background.planets.iter().for_each(|p| p.draw(renderer));
    }

    sim.particles.iter().for_each(|p| p.draw(renderer));
    sim.asteroids.iter().for_each(|a| a.draw(renderer));
    sim.projectiles.iter().for_each(|p| p.draw(renderer));
    if let Some(player) = &sim.player {
        player.draw(renderer);
    }

    renderer.end_frame();
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Everything the score panel shows.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Score with thousands separators, e.g. `12,500`.
    pub score: String,
    pub lives: String,
    pub level: String,
    /// `lives / initial_lives` as a percentage, clamped to 0–100.
    pub lives_bar: f32,
    /// Progress towards the next level as a percentage.
    pub level_bar: f32,
    pub paused: bool,
    pub game_over: bool,
}

impl Hud {
    pub fn from_state(state: &GameState, initial_lives: i32, points_per_level: u32) -> Self {
        let lives_bar = if initial_lives > 0 {
            (state.lives as f32 / initial_lives as f32 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let points_per_level = points_per_level.max(1);
        Hud {
            score: format_grouped(state.score),
            lives: state.lives.to_string(),
            level: state.level.to_string(),
            lives_bar,
            level_bar: (state.score % points_per_level) as f32 / points_per_level as f32 * 100.0,
            paused: state.paused,
            game_over: state.game_over,
        }
    }
}

pub trait UiSink {
    fn update_hud(&mut self, hud: &Hud);
}

/// `1234567` → `"1,234,567"`.
pub fn format_grouped(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
