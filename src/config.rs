//! Tunable gameplay values, optionally loaded from a TOML file.
//!
//! Every field has a default matching the classic arcade feel, and the struct
//! is `#[serde(default)]`, so a config file only needs the keys it changes:
//!
//! ```toml
//! initial_lives = 5
//! shot_cooldown_ms = 120.0
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Frame cap of the terminal front end.
pub const DEFAULT_FRAME_RATE: u32 = 60;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Player ───────────────────────────────────────────────────────────────
    pub initial_lives: i32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    /// Distance of the ship's centre above the bottom edge on spawn/resize.
    pub player_bottom_offset: f32,
    pub shot_cooldown_ms: f64,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub projectile_speed: f32,
    pub projectile_life: u32,
    pub projectile_damage: f32,

    // ── Asteroids ────────────────────────────────────────────────────────────
    pub asteroid_min_size: f32,
    pub asteroid_max_size: f32,
    /// Left/right spawns stay in the top `height - side_spawn_buffer` band.
    pub side_spawn_buffer: f32,
    /// Asteroids further than this below the bottom edge are removed.
    pub despawn_margin: f32,
    pub max_asteroids: usize,

    // ── Fragmentation ────────────────────────────────────────────────────────
    pub fragment_min_parent_size: f32,
    pub fragment_population_cap: usize,
    pub fragment_scale: f32,
    pub fragment_spread: f32,
    /// Fragments never spawn lower than `height - fragment_floor_buffer`.
    pub fragment_floor_buffer: f32,

    // ── Physics ──────────────────────────────────────────────────────────────
    pub restitution: f32,
    pub bounce_jitter: f32,

    // ── Effects ──────────────────────────────────────────────────────────────
    pub shake_frames: u32,
    pub player_hit_shake: f32,
    pub asteroid_explosion_particles: usize,
    pub player_explosion_particles: usize,

    // ── Performance mode ─────────────────────────────────────────────────────
    pub low_fps_threshold: f64,
    pub recover_fps_threshold: f64,

    // ── Background ───────────────────────────────────────────────────────────
    pub star_count: usize,
    pub planet_count: usize,
    pub nebula_count: usize,

    // ── Progression ──────────────────────────────────────────────────────────
    pub points_per_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            initial_lives: 3,
            player_width: 40.0,
            player_height: 60.0,
            player_speed: 10.0,
            player_bottom_offset: 100.0,
            shot_cooldown_ms: 200.0,

            projectile_speed: 10.0,
            projectile_life: 100,
            projectile_damage: 25.0,

            asteroid_min_size: 20.0,
            asteroid_max_size: 60.0,
            side_spawn_buffer: 300.0,
            despawn_margin: 200.0,
            max_asteroids: 12,

            fragment_min_parent_size: 30.0,
            fragment_population_cap: 8,
            fragment_scale: 0.6,
            fragment_spread: 20.0,
            fragment_floor_buffer: 250.0,

            restitution: 0.8,
            bounce_jitter: 0.5,

            shake_frames: 10,
            player_hit_shake: 5.0,
            asteroid_explosion_particles: 30,
            player_explosion_particles: 40,

            low_fps_threshold: 30.0,
            recover_fps_threshold: 50.0,

            star_count: 100,
            planet_count: 2,
            nebula_count: 3,

            points_per_level: 1000,
        }
    }
}

impl GameConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded game config from {}", path.display());
        Ok(config)
    }

    /// A frame cap the performance heuristic can live with. Sleep overshoot
    /// keeps the measured rate just under the cap, so a cap at or below
    /// `recover_fps_threshold` could never leave performance mode again.
    pub fn check_frame_rate(&self, fps: u32) -> ConfigResult<()> {
        if f64::from(fps) <= self.recover_fps_threshold {
            return Err(invalid(
                "fps",
                format!(
                    "must be above recover_fps_threshold ({}), got {fps}",
                    self.recover_fps_threshold
                ),
            ));
        }
        Ok(())
    }

    /// Reject values the simulation cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        positive("player_speed", self.player_speed)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("projectile_damage", self.projectile_damage)?;
        positive("asteroid_min_size", self.asteroid_min_size)?;
        positive("fragment_scale", self.fragment_scale)?;

        if self.initial_lives <= 0 {
            return Err(invalid("initial_lives", "must be at least 1"));
        }
        if self.projectile_life == 0 {
            return Err(invalid("projectile_life", "must be at least 1 frame"));
        }
        if self.asteroid_max_size <= self.asteroid_min_size {
            return Err(invalid(
                "asteroid_max_size",
                format!(
                    "must be greater than asteroid_min_size ({})",
                    self.asteroid_min_size
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(invalid("restitution", "must be within 0.0..=1.0"));
        }
        if self.shot_cooldown_ms < 0.0 {
            return Err(invalid("shot_cooldown_ms", "must not be negative"));
        }
        if self.low_fps_threshold >= self.recover_fps_threshold {
            return Err(invalid(
                "recover_fps_threshold",
                format!(
                    "must be greater than low_fps_threshold ({})",
                    self.low_fps_threshold
                ),
            ));
        }
        if self.points_per_level == 0 {
            return Err(invalid("points_per_level", "must be at least 1"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
