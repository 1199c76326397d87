use asteroid_dodger::config::GameConfig;
use asteroid_dodger::entities::*;
use asteroid_dodger::geometry::Bounds;
use asteroid_dodger::input::{HeldKeys, InputSource, Key, KeyState, HOLD_WINDOW};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

fn make_player() -> Player {
    Player::new(&GameConfig::default(), bounds())
}

fn drifting(x: f32, y: f32, vx: f32, vy: f32) -> Asteroid {
    Asteroid {
        x,
        y,
        vx,
        vy,
        size: 20.0,
        health: 20.0,
        max_health: 20.0,
        kind: AsteroidKind::White,
        rotation: 0.0,
        rotation_speed: 0.05,
        vertices: Vec::new(),
        has_divided: false,
    }
}

// ── colours ───────────────────────────────────────────────────────────────────

#[test]
fn asteroid_colour_table() {
    assert_eq!(AsteroidKind::Rock.color(), Color::rgb(0x80, 0x80, 0x80));
    assert_eq!(AsteroidKind::Crystal.color(), Color::rgb(0, 0, 0));
    assert_eq!(AsteroidKind::Metallic.color(), Color::rgb(0xE8, 0xE8, 0xE8));
    assert_eq!(AsteroidKind::White.color(), Color::rgb(0xFF, 0xFF, 0xFF));
    assert_eq!(AsteroidKind::Transparent.color().a, 0);
}

#[test]
fn random_kind_covers_every_category() {
    let mut rng = seeded_rng();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(AsteroidKind::random(&mut rng));
    }
    assert_eq!(seen.len(), AsteroidKind::ALL.len());
}

// ── input ─────────────────────────────────────────────────────────────────────

#[test]
fn both_binding_schemes_map_to_directions() {
    assert!(KeyState::from([Key::W]).up());
    assert!(KeyState::from([Key::ArrowUp]).up());
    assert!(KeyState::from([Key::S]).down());
    assert!(KeyState::from([Key::ArrowDown]).down());
    assert!(KeyState::from([Key::A]).left());
    assert!(KeyState::from([Key::ArrowLeft]).left());
    assert!(KeyState::from([Key::D]).right());
    assert!(KeyState::from([Key::ArrowRight]).right());
    assert!(KeyState::from([Key::Space]).fire());
    assert!(!KeyState::from([Key::Escape]).fire());
}

#[test]
fn key_state_press_and_release() {
    let mut keys = KeyState::new();
    keys.press(Key::D);
    assert!(keys.is_pressed(Key::D));
    keys.release(Key::D);
    assert!(!keys.is_pressed(Key::D));
    keys.press(Key::A);
    keys.clear();
    assert!(!keys.left());
}

#[test]
fn held_key_expires_after_the_hold_window() {
    let mut keys = HeldKeys::new();
    keys.press(Key::ArrowLeft);
    for _ in 0..HOLD_WINDOW {
        keys.advance_frame();
        assert!(keys.left());
    }
    keys.advance_frame();
    assert!(!keys.left());
}

#[test]
fn repeat_refreshes_and_release_drops_a_held_key() {
    let mut keys = HeldKeys::new();
    keys.press(Key::D);
    for _ in 0..10 {
        keys.advance_frame();
        keys.press(Key::D);
    }
    assert!(keys.right());
    keys.release(Key::D);
    assert!(!keys.right());
}

// ── player ────────────────────────────────────────────────────────────────────

#[test]
fn player_starts_bottom_centre() {
    let p = make_player();
    assert_eq!((p.x, p.y), (400.0, 500.0));
    assert_eq!((p.width, p.height), (40.0, 60.0));
    assert_eq!(p.health, 100);
    assert_eq!(p.last_shot, None);
}

#[test]
fn wasd_and_arrows_move_identically() {
    let mut a = make_player();
    let mut b = make_player();
    a.update(&KeyState::from([Key::W, Key::A]), 0.0, bounds());
    b.update(&KeyState::from([Key::ArrowUp, Key::ArrowLeft]), 0.0, bounds());
    assert_eq!((a.x, a.y), (390.0, 490.0));
    assert_eq!((a.x, a.y), (b.x, b.y));
}

#[test]
fn opposite_keys_cancel() {
    let mut p = make_player();
    p.update(&KeyState::from([Key::A, Key::D, Key::W, Key::S]), 0.0, bounds());
    assert_eq!((p.x, p.y), (400.0, 500.0));
}

#[test]
fn player_box_stays_inside_playfield() {
    let mut p = make_player();
    p.x = 25.0;
    p.y = 35.0;
    p.update(&KeyState::from([Key::A, Key::W]), 0.0, bounds());
    assert_eq!((p.x, p.y), (20.0, 30.0));

    p.x = 775.0;
    p.y = 565.0;
    p.update(&KeyState::from([Key::D, Key::S]), 0.0, bounds());
    assert_eq!((p.x, p.y), (780.0, 570.0));
}

#[test]
fn firing_respects_cooldown() {
    let mut p = make_player();
    let fire = KeyState::from([Key::Space]);

    let shot = p.update(&fire, 1_000.0, bounds()).expect("first shot");
    assert_eq!((shot.x, shot.y), (400.0, 470.0));
    assert_eq!((shot.vx, shot.vy), (0.0, -10.0));
    assert_eq!(shot.life, 100);
    assert_eq!(p.last_shot, Some(1_000.0));

    assert!(p.update(&fire, 1_199.0, bounds()).is_none());
    assert!(p.update(&fire, 1_200.0, bounds()).is_some());
}

#[test]
fn no_fire_key_no_shot() {
    let mut p = make_player();
    assert!(p.update(&KeyState::new(), 0.0, bounds()).is_none());
    assert_eq!(p.last_shot, None);
}

// ── projectiles ───────────────────────────────────────────────────────────────

#[test]
fn projectile_moves_and_ages() {
    let mut shot = make_player().shoot();
    shot.update();
    assert_eq!((shot.x, shot.y), (400.0, 460.0));
    assert_eq!(shot.life, 99);
    assert!(shot.is_alive(bounds()));
}

#[test]
fn projectile_dies_off_screen_or_when_spent() {
    let b = bounds();
    let mut shot = Projectile { x: 10.0, y: 5.0, vx: 0.0, vy: -10.0, life: 50 };
    shot.update();
    assert!(!shot.is_alive(b));

    let mut spent = Projectile { x: 10.0, y: 300.0, vx: 0.0, vy: -1.0, life: 1 };
    spent.update();
    assert_eq!(spent.life, 0);
    assert!(!spent.is_alive(b));
}

// ── asteroids ─────────────────────────────────────────────────────────────────

#[test]
fn new_asteroid_outline_and_drift() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let a = Asteroid::new(100.0, 100.0, 40.0, AsteroidKind::Rock, &mut rng);
        assert!((8..=11).contains(&a.vertices.len()));
        for v in &a.vertices {
            let r = (v.x * v.x + v.y * v.y).sqrt();
            assert!(r >= 40.0 * 0.7 - 1e-3 && r < 40.0 * 1.3 + 1e-3, "radius {r}");
        }
        assert!(a.vx.abs() <= 2.0 && a.vy.abs() <= 2.0);
        assert!(a.rotation_speed.abs() <= 0.05);
        assert_eq!(a.health, 40.0);
        assert_eq!(a.max_health, 40.0);
        assert!(!a.has_divided);
    }
}

#[test]
fn asteroid_wraps_horizontally() {
    let mut left = drifting(-19.0, 100.0, -2.0, 0.0);
    left.update(bounds());
    assert_eq!(left.x, 820.0);

    let mut right = drifting(819.0, 100.0, 2.0, 0.0);
    right.update(bounds());
    assert_eq!(right.x, -20.0);
}

#[test]
fn asteroid_bounces_off_top_and_bottom() {
    let mut top = drifting(100.0, -19.0, 0.0, -2.0);
    top.update(bounds());
    assert_eq!(top.y, -20.0);
    assert_eq!(top.vy, 2.0);

    let mut bottom = drifting(100.0, 619.0, 0.0, 2.0);
    bottom.update(bounds());
    assert_eq!(bottom.y, 620.0);
    assert_eq!(bottom.vy, -2.0);
}

#[test]
fn asteroid_spins() {
    let mut a = drifting(100.0, 100.0, 0.0, 0.0);
    a.update(bounds());
    a.update(bounds());
    assert!((a.rotation - 0.1).abs() < 1e-6);
}

#[test]
fn asteroid_damage() {
    let mut a = drifting(0.0, 0.0, 0.0, 0.0);
    assert!(!a.take_damage(15.0));
    assert!((a.health_fraction() - 0.25).abs() < 1e-6);
    assert!(a.take_damage(25.0));
    assert!(a.is_destroyed());
    assert_eq!(a.health_fraction(), 0.0);
}

// ── particles ─────────────────────────────────────────────────────────────────

#[test]
fn particle_drag_and_fade() {
    let mut p = Particle {
        x: 0.0,
        y: 0.0,
        vx: 10.0,
        vy: -5.0,
        color: Color::DEBRIS,
        size: 3.0,
        life: 4,
        max_life: 4,
    };
    p.update();
    assert_eq!((p.x, p.y), (10.0, -5.0));
    assert!((p.vx - 9.8).abs() < 1e-5);
    assert!((p.vy + 4.9).abs() < 1e-5);
    assert_eq!(p.life, 3);
    assert!((p.alpha() - 0.75).abs() < 1e-6);
    for _ in 0..3 {
        p.update();
    }
    assert!(!p.is_alive());
    assert_eq!(p.alpha(), 0.0);
}

// ── background ────────────────────────────────────────────────────────────────

#[test]
fn star_scrolls_and_respawns_at_top() {
    let mut rng = seeded_rng();
    let mut star = Star::random(bounds(), &mut rng);
    star.y = 599.5;
    star.speed = 1.0;
    star.update(bounds(), &mut rng);
    assert_eq!(star.y, -10.0);
    assert!((0.0..800.0).contains(&star.x));

    let y = star.y;
    star.update(bounds(), &mut rng);
    assert_eq!(star.y, y + 1.0);
}

#[test]
fn star_twinkle_stays_within_brightness() {
    let mut rng = seeded_rng();
    let mut star = Star::random(bounds(), &mut rng);
    for _ in 0..500 {
        star.update(bounds(), &mut rng);
        let alpha = star.alpha();
        assert!(alpha >= 0.0 && alpha <= star.brightness + 1e-6);
    }
}

#[test]
fn planet_rotates_and_nebula_pulses() {
    let mut rng = seeded_rng();
    let mut planet = Planet::random(bounds(), &mut rng);
    let mut nebula = Nebula::random(bounds(), &mut rng);
    let (x, y) = (planet.x, planet.y);
    let pulse = nebula.pulse;

    planet.update();
    nebula.update();

    assert!((planet.rotation - planet.rotation_speed).abs() < 1e-6);
    assert_eq!((planet.x, planet.y), (x, y));
    assert!((nebula.pulse - pulse - nebula.pulse_speed).abs() < 1e-5);
    let alpha = nebula.alpha();
    assert!(alpha >= nebula.opacity * 0.4 - 1e-6 && alpha <= nebula.opacity + 1e-6);
}

// ── game state ────────────────────────────────────────────────────────────────

#[test]
fn fresh_game_state() {
    let s = GameState::new(3);
    assert_eq!(s.score, 0);
    assert_eq!(s.lives, 3);
    assert_eq!(s.level, 1);
    assert!(s.is_running());
    assert_eq!(s.camera_shake, 0);
    assert!(!s.performance_mode);
    assert_eq!(s, GameState::default());
}

#[test]
fn game_state_clone_is_independent() {
    let original = GameState::new(3);
    let mut cloned = original.clone();
    cloned.score = 999;
    cloned.paused = true;
    assert_eq!(original.score, 0);
    assert!(original.is_running());
    assert!(!cloned.is_running());
}
