use asteroid_dodger::compute::Simulation;
use asteroid_dodger::config::GameConfig;
use asteroid_dodger::entities::*;
use asteroid_dodger::geometry::Bounds;
use asteroid_dodger::render::*;
use asteroid_dodger::spawner::create_background;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Records every call as a short label.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
    offset: Option<(f32, f32)>,
}

impl Renderer for Recorder {
    fn begin_frame(&mut self, offset: (f32, f32)) {
        self.offset = Some(offset);
        self.calls.push("begin".into());
    }
    fn draw_nebula(&mut self, _: &Nebula) {
        self.calls.push("nebula".into());
    }
    fn draw_star(&mut self, star: &Star) {
        self.calls.push(format!("star@{}", star.x));
    }
    fn draw_planet(&mut self, _: &Planet) {
        self.calls.push("planet".into());
    }
    fn draw_particle(&mut self, _: &Particle) {
        self.calls.push("particle".into());
    }
    fn draw_asteroid(&mut self, _: &Asteroid) {
        self.calls.push("asteroid".into());
    }
    fn draw_projectile(&mut self, _: &Projectile) {
        self.calls.push("projectile".into());
    }
    fn draw_player(&mut self, _: &Player) {
        self.calls.push("player".into());
    }
    fn end_frame(&mut self) {
        self.calls.push("end".into());
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(3)
}

/// One of everything, four stars at x = 0, 1, 2, 3.
fn scene() -> Simulation {
    let mut rng = seeded_rng();
    let config = GameConfig {
        star_count: 4,
        planet_count: 1,
        nebula_count: 1,
        ..GameConfig::default()
    };
    let bounds = Bounds::new(800.0, 600.0);
    let mut sim = Simulation::bare(config.clone(), bounds);
    sim.background = create_background(&config, bounds, &mut rng);
    for (i, star) in sim.background.stars.iter_mut().enumerate() {
        star.x = i as f32;
    }
    sim.asteroids
        .push(Asteroid::new(100.0, 100.0, 30.0, AsteroidKind::Rock, &mut rng));
    sim.projectiles.push(Projectile { x: 50.0, y: 50.0, vx: 0.0, vy: -10.0, life: 5 });
    sim.particles.push(Particle {
        x: 0.0,
        y: 0.0,
        vx: 1.0,
        vy: 1.0,
        color: Color::DEBRIS,
        size: 2.0,
        life: 10,
        max_life: 10,
    });
    sim
}

#[test]
fn scene_is_drawn_back_to_front() {
    let sim = scene();
    let mut rec = Recorder::default();
    render_scene(&sim, &mut rec, &mut seeded_rng());
    assert_eq!(
        rec.calls,
        vec![
            "begin", "nebula", "star@0", "star@1", "star@2", "star@3", "planet", "particle",
            "asteroid", "projectile", "player", "end",
        ]
    );
    assert_eq!(rec.offset, Some((0.0, 0.0)));
}

#[test]
fn performance_mode_drops_decorations() {
    let mut sim = scene();
    sim.state.performance_mode = true;
    let mut rec = Recorder::default();
    render_scene(&sim, &mut rec, &mut seeded_rng());
    assert_eq!(
        rec.calls,
        vec![
            "begin", "star@0", "star@2", "particle", "asteroid", "projectile", "player", "end",
        ]
    );
}

#[test]
fn missing_player_is_not_drawn() {
    let mut sim = scene();
    sim.player = None;
    let mut rec = Recorder::default();
    render_scene(&sim, &mut rec, &mut seeded_rng());
    assert!(!rec.calls.iter().any(|c| c == "player"));
}

#[test]
fn camera_shake_offsets_the_frame() {
    let mut sim = scene();
    sim.state.add_camera_shake(10, 8.0);
    let mut rec = Recorder::default();
    render_scene(&sim, &mut rec, &mut seeded_rng());
    let (dx, dy) = rec.offset.unwrap();
    assert!(dx.abs() <= 4.0 && dy.abs() <= 4.0);
    assert!(dx != 0.0 || dy != 0.0);
}

#[test]
fn no_shake_no_offset() {
    let state = GameState::new(3);
    assert_eq!(shake_offset(&state, &mut seeded_rng()), (0.0, 0.0));
}

#[test]
fn drawable_dispatches_to_matching_call() {
    let sim = scene();
    let mut rec = Recorder::default();
    sim.asteroids[0].draw(&mut rec);
    sim.player.as_ref().unwrap().draw(&mut rec);
    assert_eq!(rec.calls, vec!["asteroid", "player"]);
}

// ── HUD ───────────────────────────────────────────────────────────────────────

#[test]
fn hud_reports_grouped_score_and_bars() {
    let mut state = GameState::new(3);
    state.score = 12_500;
    state.lives = 2;
    state.level = 13;

    let hud = Hud::from_state(&state, 3, 1000);

    assert_eq!(hud.score, "12,500");
    assert_eq!(hud.lives, "2");
    assert_eq!(hud.level, "13");
    assert!((hud.lives_bar - 200.0 / 3.0).abs() < 1e-3);
    assert!((hud.level_bar - 50.0).abs() < 1e-6);
    assert!(!hud.paused && !hud.game_over);
}

#[test]
fn hud_lives_bar_never_negative() {
    let mut state = GameState::new(3);
    state.lives = -1;
    state.game_over = true;
    let hud = Hud::from_state(&state, 3, 1000);
    assert_eq!(hud.lives_bar, 0.0);
    assert!(hud.game_over);
}

#[test]
fn simulation_hud_uses_config() {
    let mut sim = scene();
    sim.state.score = 999;
    let hud = sim.hud();
    assert_eq!(hud.score, "999");
    assert_eq!(hud.lives_bar, 100.0);
    assert!((hud.level_bar - 99.9).abs() < 1e-3);
}

#[test]
fn thousands_grouping() {
    assert_eq!(format_grouped(0), "0");
    assert_eq!(format_grouped(999), "999");
    assert_eq!(format_grouped(1_000), "1,000");
    assert_eq!(format_grouped(123_456), "123,456");
    assert_eq!(format_grouped(1_234_567), "1,234,567");
    assert_eq!(format_grouped(u32::MAX), "4,294,967,295");
}

/// HUD sink that keeps only the latest snapshot.
#[derive(Default)]
struct LastHud(Option<Hud>);

impl UiSink for LastHud {
    fn update_hud(&mut self, hud: &Hud) {
        self.0 = Some(hud.clone());
    }
}

#[test]
fn ui_sink_receives_snapshot() {
    let sim = scene();
    let mut sink = LastHud::default();
    sink.update_hud(&sim.hud());
    assert_eq!(sink.0.unwrap().level, "1");
}
