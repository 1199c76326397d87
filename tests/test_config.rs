use asteroid_dodger::config::{GameConfig, DEFAULT_FRAME_RATE};
use asteroid_dodger::error::ConfigError;

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    config.validate().expect("defaults validate");
    assert_eq!(config.initial_lives, 3);
    assert_eq!(config.shot_cooldown_ms, 200.0);
    assert_eq!(config.fragment_population_cap, 8);
    assert_eq!(config.restitution, 0.8);
    assert_eq!((config.low_fps_threshold, config.recover_fps_threshold), (30.0, 50.0));
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config = GameConfig::from_toml_str(
        r#"
        initial_lives = 5
        shot_cooldown_ms = 120.0
        star_count = 10
        "#,
    )
    .unwrap();
    assert_eq!(config.initial_lives, 5);
    assert_eq!(config.shot_cooldown_ms, 120.0);
    assert_eq!(config.star_count, 10);
    assert_eq!(config.player_speed, GameConfig::default().player_speed);
}

#[test]
fn empty_file_is_the_default() {
    assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
}

#[test]
fn wrong_type_is_a_parse_error() {
    let err = GameConfig::from_toml_str("initial_lives = \"three\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err:?}");
}

#[test]
fn inverted_size_range_is_rejected() {
    let err = GameConfig::from_toml_str("asteroid_min_size = 50.0\nasteroid_max_size = 40.0")
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid { field: "asteroid_max_size", .. }
    ));
}

#[test]
fn inverted_fps_band_is_rejected() {
    let config = GameConfig {
        low_fps_threshold: 50.0,
        recover_fps_threshold: 30.0,
        ..GameConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid { field: "recover_fps_threshold", .. }
    ));
    assert!(err.to_string().contains("recover_fps_threshold"));
}

#[test]
fn non_positive_values_are_rejected() {
    let zero_speed = GameConfig {
        player_speed: 0.0,
        ..GameConfig::default()
    };
    assert!(matches!(
        zero_speed.validate(),
        Err(ConfigError::Invalid { field: "player_speed", .. })
    ));

    let no_lives = GameConfig {
        initial_lives: 0,
        ..GameConfig::default()
    };
    assert!(no_lives.validate().is_err());

    let bouncy = GameConfig {
        restitution: 1.5,
        ..GameConfig::default()
    };
    assert!(bouncy.validate().is_err());
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("asteroid_dodger_no_such_config.toml");
    let _ = std::fs::remove_file(&path);
    let err = GameConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("asteroid_dodger_no_such_config.toml"));
}

#[test]
fn load_reads_file_from_disk() {
    let path = std::env::temp_dir().join(format!(
        "asteroid_dodger_config_{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "max_asteroids = 6\nprojectile_damage = 50.0\n").unwrap();
    let config = GameConfig::load(&path);
    let _ = std::fs::remove_file(&path);

    let config = config.unwrap();
    assert_eq!(config.max_asteroids, 6);
    assert_eq!(config.projectile_damage, 50.0);
}

#[test]
fn frame_cap_must_clear_the_recovery_threshold() {
    let config = GameConfig::default();
    config.check_frame_rate(DEFAULT_FRAME_RATE).expect("default cap");
    config.check_frame_rate(51).expect("just above recovery");
    for fps in [0, 30, 50] {
        assert!(matches!(
            config.check_frame_rate(fps),
            Err(ConfigError::Invalid { field: "fps", .. })
        ));
    }
}
