//! The per-frame simulation.
//!
//! A `Simulation` owns every entity collection and the `GameState`. The host
//! loop feeds it input and a timestamp once per frame via `tick`, then hands
//! it (immutably) to the renderer. All randomness comes through an injected
//! `Rng` so tests can run with a seeded generator.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Asteroid, Color, GameState, Particle, Player, Projectile};
use crate::geometry::Bounds;
use crate::input::{HeldKeys, InputSource, Key};
use crate::physics;
use crate::render::Hud;
use crate::spawner::{self, Background};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub asteroids_destroyed: usize,
    pub fragments_spawned: usize,
    pub player_hits: u32,
    pub bounces: usize,
    pub waves_spawned: u32,
    pub leveled_up: bool,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    pub config: GameConfig,
    pub bounds: Bounds,
    pub state: GameState,
    /// Absent only while a host is still setting up.
    pub player: Option<Player>,
    pub projectiles: Vec<Projectile>,
    pub asteroids: Vec<Asteroid>,
    pub particles: Vec<Particle>,
    pub background: Background,
    pub perf: PerformanceMonitor,
    pub frame: u64,
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl Simulation {
    /// A ready-to-play session: background, player and a first asteroid wave.
    pub fn new(config: GameConfig, bounds: Bounds, rng: &mut impl Rng) -> Self {
        let mut sim = Self::bare(config, bounds);
        sim.background = spawner::create_background(&sim.config, bounds, rng);
        sim.spawn_wave(rng);
        sim
    }

    /// Player only: no background and no asteroids.
    pub fn bare(config: GameConfig, bounds: Bounds) -> Self {
        let player = Player::new(&config, bounds);
        let perf = PerformanceMonitor::new(config.low_fps_threshold, config.recover_fps_threshold);
        Simulation {
            state: GameState::new(config.initial_lives),
            player: Some(player),
            projectiles: Vec::new(),
            asteroids: Vec::new(),
            particles: Vec::new(),
            background: Background::default(),
            perf,
            frame: 0,
            config,
            bounds,
        }
    }
}

// ── Lifecycle controls ───────────────────────────────────────────────────────

impl Simulation {
    /// Flip between running and paused. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) {
        if self.state.game_over {
            return;
        }
        self.state.paused = !self.state.paused;
        log::info!("game {}", if self.state.paused { "paused" } else { "resumed" });
    }

    /// Start over: fresh state and ship, empty collections, a new wave.
    /// The decorative background carries over.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.state = GameState::new(self.config.initial_lives);
        self.player = Some(Player::new(&self.config, self.bounds));
        self.projectiles.clear();
        self.asteroids.clear();
        self.particles.clear();
        self.frame = 0;
        log::info!("game reset");
        self.spawn_wave(rng);
    }

    /// New playfield size; the ship is put back at its start position.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
        if let Some(player) = &mut self.player {
            player.x = width / 2.0;
            player.y = height - self.config.player_bottom_offset;
        }
        log::debug!("playfield resized to {width}x{height}");
    }

    /// Edge-triggered keys: Escape pauses, Space restarts after game over.
    /// Returns `true` if the key did something.
    pub fn handle_key_press(&mut self, key: Key, rng: &mut impl Rng) -> bool {
        match key {
            Key::Escape => {
                self.toggle_pause();
                !self.state.game_over
            }
            Key::Space if self.state.game_over => {
                self.reset(rng);
                true
            }
            _ => false,
        }
    }

    /// A fresh key-down event from the front end. Presses consumed as an
    /// action (pause, restart) don't count as held, so the restart press
    /// doesn't also fire a shot on the new game's first frame.
    pub fn press_key(&mut self, key: Key, held: &mut HeldKeys, rng: &mut impl Rng) {
        if !self.handle_key_press(key, rng) {
            held.press(key);
        }
    }

    /// Feed a frame timestamp to the frame-rate heuristic.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<f64> {
        self.perf.sample(now_ms, &mut self.state.performance_mode)
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(
            &self.state,
            self.config.initial_lives,
            self.config.points_per_level,
        )
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

impl Simulation {
    /// Advance one frame. Does nothing while paused or after game over.
    pub fn tick(
        &mut self,
        input: &impl InputSource,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> TickEvents {
        let mut events = TickEvents::default();
        if !self.state.is_running() {
            return events;
        }
        self.frame += 1;
        let bounds = self.bounds;

        // ── 1. Camera shake decays ───────────────────────────────────────────
        self.state.camera_shake = self.state.camera_shake.saturating_sub(1);

        // ── 2. Background ────────────────────────────────────────────────────
        for star in &mut self.background.stars {
            star.update(bounds, rng);
        }
        self.background.planets.iter_mut().for_each(|p| p.update());
        self.background.nebulas.iter_mut().for_each(|n| n.update());

        // ── 3. Player ────────────────────────────────────────────────────────
        if let Some(player) = &mut self.player {
            if let Some(shot) = player.update(input, now_ms, bounds) {
                self.projectiles.push(shot);
            }
        }

        // ── 4. Projectiles ───────────────────────────────────────────────────
        self.projectiles.iter_mut().for_each(|p| p.update());
        self.projectiles.retain(|p| p.is_alive(bounds));

        // ── 5. Asteroids, then asteroid ↔ asteroid ───────────────────────────
        let despawn_y = bounds.height + self.config.despawn_margin;
        for asteroid in &mut self.asteroids {
            asteroid.update(bounds);
        }
        self.asteroids
            .retain(|a| a.y <= despawn_y && !a.is_destroyed());
        events.bounces = physics::resolve_asteroid_pairs(
            &mut self.asteroids,
            self.config.restitution,
            self.config.bounce_jitter,
            rng,
        );

        // ── 6. Particles ─────────────────────────────────────────────────────
        self.particles.iter_mut().for_each(|p| p.update());
        self.particles.retain(Particle::is_alive);

        // ── 7. Collisions ────────────────────────────────────────────────────
        self.resolve_projectile_hits(&mut events, rng);
        self.resolve_player_hits(&mut events, rng);

        // ── 8. Population top-up ─────────────────────────────────────────────
        if self.asteroids.len() < spawner::min_population(self.state.level, &self.config) {
            self.spawn_wave(rng);
            events.waves_spawned += 1;
        }

        // ── 9. Level progression ─────────────────────────────────────────────
        if self.state.score > self.state.level * self.config.points_per_level {
            self.state.level += 1;
            log::info!("level up: now level {} at score {}", self.state.level, self.state.score);
            self.spawn_wave(rng);
            events.waves_spawned += 1;
            events.leveled_up = true;
        }

        events
    }

    fn spawn_wave(&mut self, rng: &mut impl Rng) {
        let wave = spawner::spawn_asteroids(self.state.level, &self.config, self.bounds, rng);
        self.asteroids.extend(wave);
    }

    /// Projectiles damage asteroids; destroyed ones score, shake the camera
    /// and may split.
    ///
    /// Fragments are appended only after the whole pass, so nothing fired this
    /// frame can hit a fragment born this frame.
    fn resolve_projectile_hits(&mut self, events: &mut TickEvents, rng: &mut impl Rng) {
        let destroyed = physics::resolve_projectile_hits(
            &mut self.projectiles,
            &mut self.asteroids,
            self.config.projectile_damage,
        );

        let mut fragments: Vec<Asteroid> = Vec::new();
        for index in destroyed {
            let parent = &self.asteroids[index];
            self.particles.extend(spawner::create_explosion(
                parent.x,
                parent.y,
                Color::DEBRIS,
                self.config.asteroid_explosion_particles,
                rng,
            ));
            let points = (parent.size * 10.0).round() as u32;
            self.state.score = self.state.score.saturating_add(points);
            self.state
                .add_camera_shake(self.config.shake_frames, parent.size / 10.0);

            let population = self.asteroids.len() + fragments.len();
            let split = spawner::spawn_fragments(parent, population, &self.config, self.bounds, rng);
            log::debug!(
                "asteroid destroyed at ({:.0}, {:.0}) size {:.1}: +{points}, {} fragments",
                parent.x,
                parent.y,
                parent.size,
                split.len()
            );
            events.fragments_spawned += split.len();
            fragments.extend(split);
            events.asteroids_destroyed += 1;
        }
        self.asteroids.extend(fragments);
    }

    /// Ship ↔ asteroid contact costs a life and destroys the asteroid outright.
    fn resolve_player_hits(&mut self, events: &mut TickEvents, rng: &mut impl Rng) {
        let Some(player) = &self.player else {
            return;
        };
        let (px, py) = (player.x, player.y);

        for index in physics::player_collisions(player, &self.asteroids) {
            self.particles.extend(spawner::create_explosion(
                px,
                py,
                Color::DEBRIS,
                self.config.player_explosion_particles,
                rng,
            ));
            self.state.lives -= 1;
            self.state
                .add_camera_shake(self.config.shake_frames, self.config.player_hit_shake);
            self.asteroids[index].health = 0.0;
            events.player_hits += 1;
            log::debug!("player hit, {} lives left", self.state.lives);

            if self.state.lives <= 0 {
                self.state.game_over = true;
                log::info!("game over with score {}", self.state.score);
                break;
            }
        }
    }
}

// ── Performance mode ─────────────────────────────────────────────────────────

/// Frame-rate heuristic with a hysteresis band: drops into performance mode
/// below `low_fps` and only leaves it above `recover_fps`.
#[derive(Clone, Debug)]
pub struct PerformanceMonitor {
    pub low_fps: f64,
    pub recover_fps: f64,
    last_frame_ms: Option<f64>,
    fps: Option<f64>,
}

impl PerformanceMonitor {
    pub fn new(low_fps: f64, recover_fps: f64) -> Self {
        PerformanceMonitor {
            low_fps,
            recover_fps,
            last_frame_ms: None,
            fps: None,
        }
    }

    /// Latest instantaneous frame rate, once two frames have been seen.
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    /// Record a frame timestamp and update `performance_mode`. Returns the
    /// measured frame rate, or `None` for the first frame or a clock that did
    /// not advance.
    pub fn sample(&mut self, now_ms: f64, performance_mode: &mut bool) -> Option<f64> {
        let previous = self.last_frame_ms.replace(now_ms)?;
        let delta = now_ms - previous;
        if delta <= 0.0 {
            return None;
        }

        let fps = 1000.0 / delta;
        self.fps = Some(fps);
        if fps < self.low_fps && !*performance_mode {
            *performance_mode = true;
            log::info!("entering performance mode at {fps:.1} fps");
        } else if fps > self.recover_fps && *performance_mode {
            *performance_mode = false;
            log::info!("leaving performance mode at {fps:.1} fps");
        }
        Some(fps)
    }
}
