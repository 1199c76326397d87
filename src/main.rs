mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use asteroid_dodger::config::DEFAULT_FRAME_RATE;
use asteroid_dodger::input::{HeldKeys, Key};
use asteroid_dodger::render::{render_scene, UiSink};
use asteroid_dodger::{GameConfig, Simulation};

use display::TerminalDisplay;

/// Dodge and shoot drifting asteroids in your terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file overriding gameplay tunables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second; must stay above the low-fps threshold.
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    fps: u32,

    /// Write logs here (the terminal itself is taken by the game).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::W),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::A),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::S),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::D),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: every key event refreshes that key's entry in `HeldKeys`;
/// each frame the simulation sees every key that is still fresh, so moving
/// and firing can happen together. Presses go through `Simulation::press_key`
/// first so Escape / Space can act as one-shot actions (pause, restart).
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation,
    display: &mut TerminalDisplay,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_time: Duration,
) -> std::io::Result<()> {
    let mut held = HeldKeys::new();
    let start = Instant::now();

    loop {
        let frame_start = Instant::now();
        held.advance_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            _ => {}
                        }
                        if let Some(key) = map_key(code) {
                            sim.press_key(key, &mut held, rng);
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        if let Some(key) = map_key(code) {
                            held.press(key);
                        }
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        if let Some(key) = map_key(code) {
                            held.release(key);
                        }
                    }
                },
                Event::Resize(width, height) => {
                    display.resize(width, height);
                    let bounds = display.playfield();
                    sim.resize(bounds.width, bounds.height);
                }
                _ => {}
            }
        }

        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        sim.record_frame(now_ms);
        sim.tick(&held, now_ms, rng);

        display.set_performance_mode(sim.state.performance_mode);
        render_scene(sim, display, rng);
        display.update_hud(&sim.hud());
        display.present(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    config.check_frame_rate(args.fps)?;
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(args.fps));

    let (width, height) = terminal::size().context("cannot query terminal size")?;
    let mut display = TerminalDisplay::new(width, height);
    let mut sim = Simulation::new(config, display.playfield(), &mut rng);
    log::info!(
        "starting on a {width}x{height} terminal, playfield {:?}",
        sim.bounds
    );

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut sim, &mut display, &rx, &mut rng, frame_time);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!(
        "session ended: score {}, level {}",
        sim.state.score,
        sim.state.level
    );
    result.context("terminal output failed")
}
