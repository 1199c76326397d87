//! Game entity types and their per-frame update steps.
//!
//! Updates here only advance an entity's own state. Anything that involves
//! more than one entity (collisions, spawning, scoring) lives in `physics`,
//! `spawner` and `compute`.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::{Bounds, Rect};
use crate::input::InputSource;

/// Per-axis velocity decay applied to explosion debris every frame.
pub const PARTICLE_DRAG: f32 = 0.98;

pub const PROJECTILE_WIDTH: f32 = 4.0;
pub const PROJECTILE_HEIGHT: f32 = 12.0;

// ── Colours ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    /// Ship, projectile and debris grey.
    pub const DEBRIS: Color = Color::rgb(0x53, 0x53, 0x53);
}

// ── Asteroid kinds ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AsteroidKind {
    Rock,
    Crystal,
    Metallic,
    White,
    Transparent,
}

impl AsteroidKind {
    pub const ALL: [AsteroidKind; 5] = [
        AsteroidKind::Rock,
        AsteroidKind::Crystal,
        AsteroidKind::Metallic,
        AsteroidKind::White,
        AsteroidKind::Transparent,
    ];

    pub fn color(self) -> Color {
        match self {
            AsteroidKind::Rock => Color::rgb(0x80, 0x80, 0x80),
            AsteroidKind::Crystal => Color::rgb(0x00, 0x00, 0x00),
            AsteroidKind::Metallic => Color::rgb(0xE8, 0xE8, 0xE8),
            AsteroidKind::White => Color::rgb(0xFF, 0xFF, 0xFF),
            AsteroidKind::Transparent => Color::TRANSPARENT,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ── Background decorations ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub size: f32,
    pub brightness: f32,
    pub twinkle: f32,
    pub twinkle_speed: f32,
}

impl Star {
    pub fn random(bounds: Bounds, rng: &mut impl Rng) -> Self {
        Star {
            x: rng.gen::<f32>() * bounds.width,
            y: rng.gen::<f32>() * bounds.height,
            speed: 0.5 + rng.gen::<f32>() * 2.0,
            size: 1.0 + rng.gen::<f32>() * 3.0,
            brightness: 0.3 + rng.gen::<f32>() * 0.7,
            twinkle: rng.gen::<f32>() * TAU,
            twinkle_speed: 0.02 + rng.gen::<f32>() * 0.03,
        }
    }

    /// Scroll down; a star leaving the bottom comes back above the top edge.
    pub fn update(&mut self, bounds: Bounds, rng: &mut impl Rng) {
        self.y += self.speed;
        self.twinkle += self.twinkle_speed;
        if self.y > bounds.height {
            self.y = -10.0;
            self.x = rng.gen::<f32>() * bounds.width;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.brightness * (0.5 + 0.5 * self.twinkle.sin())
    }
}

#[derive(Clone, Debug)]
pub struct Planet {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Color,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Ring ellipse is drawn at `rotation`.
    pub rings: bool,
}

impl Planet {
    pub fn random(bounds: Bounds, rng: &mut impl Rng) -> Self {
        Planet {
            x: rng.gen::<f32>() * bounds.width,
            y: rng.gen::<f32>() * bounds.height,
            radius: 30.0 + rng.gen::<f32>() * 50.0,
            color: Color::rgb(0xE0, 0xE0, 0xE0),
            rotation: 0.0,
            rotation_speed: 0.005 + rng.gen::<f32>() * 0.01,
            rings: rng.gen_bool(0.5),
        }
    }

    pub fn update(&mut self) {
        self.rotation += self.rotation_speed;
    }
}

#[derive(Clone, Debug)]
pub struct Nebula {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub opacity: f32,
    pub pulse: f32,
    pub pulse_speed: f32,
}

impl Nebula {
    pub fn random(bounds: Bounds, rng: &mut impl Rng) -> Self {
        Nebula {
            x: rng.gen::<f32>() * bounds.width,
            y: rng.gen::<f32>() * bounds.height,
            width: 100.0 + rng.gen::<f32>() * 200.0,
            height: 100.0 + rng.gen::<f32>() * 200.0,
            color: Color::rgb(0xD0, 0xD0, 0xD0),
            opacity: 0.1 + rng.gen::<f32>() * 0.2,
            pulse: rng.gen::<f32>() * TAU,
            pulse_speed: 0.01 + rng.gen::<f32>() * 0.02,
        }
    }

    pub fn update(&mut self) {
        self.pulse += self.pulse_speed;
    }

    pub fn alpha(&self) -> f32 {
        self.opacity * (0.7 + 0.3 * self.pulse.sin())
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Cosmetic only; lives are tracked on `GameState`.
    pub health: u32,
    /// Timestamp (ms) of the last shot, `None` until the first one.
    pub last_shot: Option<f64>,
    pub shot_cooldown_ms: f64,
    pub projectile_speed: f32,
    pub projectile_life: u32,
    pub engine_glow: f32,
}

impl Player {
    /// A fresh ship centred horizontally near the bottom of the playfield.
    pub fn new(config: &GameConfig, bounds: Bounds) -> Self {
        Player {
            x: bounds.width / 2.0,
            y: bounds.height - config.player_bottom_offset,
            width: config.player_width,
            height: config.player_height,
            speed: config.player_speed,
            health: 100,
            last_shot: None,
            shot_cooldown_ms: config.shot_cooldown_ms,
            projectile_speed: config.projectile_speed,
            projectile_life: config.projectile_life,
            engine_glow: 0.0,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::centered(self.x, self.y, self.width, self.height)
    }

    /// Move from the held direction keys, stay inside the playfield and fire
    /// if the trigger is held and the cooldown has elapsed.
    pub fn update(
        &mut self,
        input: &impl InputSource,
        now_ms: f64,
        bounds: Bounds,
    ) -> Option<Projectile> {
        if input.up() {
            self.y -= self.speed;
        }
        if input.down() {
            self.y += self.speed;
        }
        if input.left() {
            self.x -= self.speed;
        }
        if input.right() {
            self.x += self.speed;
        }

        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        // min/max rather than clamp: a playfield narrower than the ship must not panic
        self.x = self.x.min(bounds.width - half_w).max(half_w);
        self.y = self.y.min(bounds.height - half_h).max(half_h);

        self.engine_glow += 0.1;

        if input.fire() && self.can_shoot(now_ms) {
            self.last_shot = Some(now_ms);
            return Some(self.shoot());
        }
        None
    }

    pub fn can_shoot(&self, now_ms: f64) -> bool {
        match self.last_shot {
            Some(last) => now_ms - last >= self.shot_cooldown_ms,
            None => true,
        }
    }

    /// A projectile leaving the ship's nose, straight up.
    pub fn shoot(&self) -> Projectile {
        Projectile {
            x: self.x,
            y: self.y - self.height / 2.0,
            vx: 0.0,
            vy: -self.projectile_speed,
            life: self.projectile_life,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames left before the projectile fizzles out.
    pub life: u32,
}

impl Projectile {
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life = self.life.saturating_sub(1);
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::centered(self.x, self.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
    }

    pub fn is_alive(&self, bounds: Bounds) -> bool {
        self.life > 0 && bounds.contains(self.x, self.y)
    }
}

// ── Asteroids ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug)]
pub struct Asteroid {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Collision radius; also the starting health.
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub kind: AsteroidKind,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Outline relative to the centre, unrotated.
    pub vertices: Vec<Vertex>,
    /// Set on fragments: they never split again.
    pub has_divided: bool,
}

impl Asteroid {
    /// New asteroid with random drift, spin and outline.
    pub fn new(x: f32, y: f32, size: f32, kind: AsteroidKind, rng: &mut impl Rng) -> Self {
        Asteroid {
            x,
            y,
            vx: (rng.gen::<f32>() - 0.5) * 4.0,
            vy: (rng.gen::<f32>() - 0.5) * 4.0,
            size,
            health: size,
            max_health: size,
            kind,
            rotation: 0.0,
            rotation_speed: (rng.gen::<f32>() - 0.5) * 0.1,
            vertices: generate_outline(size, rng),
            has_divided: false,
        }
    }

    /// Drift and spin. Wraps horizontally, bounces off the top and bottom.
    pub fn update(&mut self, bounds: Bounds) {
        self.x += self.vx;
        self.y += self.vy;
        self.rotation += self.rotation_speed;

        if self.x < -self.size {
            self.x = bounds.width + self.size;
        } else if self.x > bounds.width + self.size {
            self.x = -self.size;
        }

        if self.y < -self.size {
            self.y = -self.size;
            self.vy = self.vy.abs();
        } else if self.y > bounds.height + self.size {
            self.y = bounds.height + self.size;
            self.vy = -self.vy.abs();
        }
    }

    /// Returns `true` when this hit destroyed the asteroid.
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.health -= damage;
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Square circumscribing the outline, used for all AABB tests.
    pub fn bounding_box(&self) -> Rect {
        Rect::square(self.x, self.y, self.size)
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).max(0.0)
        } else {
            0.0
        }
    }
}

/// 8–11 vertices evenly spaced by angle, each at 0.7–1.3 × `size`.
fn generate_outline(size: f32, rng: &mut impl Rng) -> Vec<Vertex> {
    let count = rng.gen_range(8..12);
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let radius = size * (0.7 + rng.gen::<f32>() * 0.6);
            Vertex {
                x: angle.cos() * radius,
                y: angle.sin() * radius,
            }
        })
        .collect()
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Color,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= PARTICLE_DRAG;
        self.vy *= PARTICLE_DRAG;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

// ── Game state ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    pub game_over: bool,
    pub paused: bool,
    /// Frames of camera shake remaining.
    pub camera_shake: u32,
    pub camera_shake_intensity: f32,
    pub performance_mode: bool,
}

impl GameState {
    pub fn new(initial_lives: i32) -> Self {
        GameState {
            score: 0,
            lives: initial_lives,
            level: 1,
            game_over: false,
            paused: false,
            camera_shake: 0,
            camera_shake_intensity: 0.0,
            performance_mode: false,
        }
    }

    pub fn add_camera_shake(&mut self, frames: u32, intensity: f32) {
        self.camera_shake = frames;
        self.camera_shake_intensity = intensity;
    }

    /// Neither paused nor over.
    pub fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(3)
    }
}
