//! Rendering layer — all terminal I/O lives here.
//!
//! The simulation draws into an in-memory character grid through the
//! `Renderer` trait; `present` then turns the grid and the HUD into terminal
//! commands. No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use asteroid_dodger::entities::{
    Asteroid, AsteroidKind, Nebula, Particle, Planet, Player, Projectile, Star,
};
use asteroid_dodger::geometry::Bounds;
use asteroid_dodger::render::{Hud, Renderer, UiSink};

/// World units covered by one terminal column / row. Cells are roughly twice
/// as tall as they are wide.
pub const CELL_W: f32 = 10.0;
pub const CELL_H: f32 = 20.0;

/// Row 0 is the HUD; the last row is the controls hint.
const PLAY_TOP: u16 = 1;
const RESERVED_ROWS: u16 = 2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_PROJECTILE: Color = Color::Cyan;
const C_PARTICLE_HOT: Color = Color::Yellow;
const C_PARTICLE_COOL: Color = Color::DarkYellow;
const C_STAR: Color = Color::Grey;
const C_STAR_DIM: Color = Color::DarkGrey;
const C_PLANET: Color = Color::DarkCyan;
const C_NEBULA: Color = Color::DarkBlue;
const C_HINT: Color = Color::DarkGrey;
const C_PERF: Color = Color::DarkMagenta;

fn asteroid_look(kind: AsteroidKind) -> (char, Color) {
    match kind {
        AsteroidKind::Rock => ('#', Color::Grey),
        AsteroidKind::Crystal => ('%', Color::Magenta),
        AsteroidKind::Metallic => ('@', Color::Cyan),
        AsteroidKind::White => ('O', Color::White),
        AsteroidKind::Transparent => (':', Color::DarkGrey),
    }
}

#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: Color::Reset };

/// Terminal-backed `Renderer` + `UiSink`.
pub struct TerminalDisplay {
    width: u16,
    height: u16,
    grid: Vec<Cell>,
    offset: (f32, f32),
    hud: Option<Hud>,
    performance_mode: bool,
}

impl TerminalDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        TerminalDisplay {
            width,
            height,
            grid: vec![BLANK; width as usize * height as usize],
            offset: (0.0, 0.0),
            hud: None,
            performance_mode: false,
        }
    }

    /// World-space playfield that fits the current terminal.
    pub fn playfield(&self) -> Bounds {
        playfield_for(self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.grid = vec![BLANK; width as usize * height as usize];
    }

    pub fn set_performance_mode(&mut self, on: bool) {
        self.performance_mode = on;
    }

    // ── Grid plotting ─────────────────────────────────────────────────────────

    /// World position → terminal cell, unclipped.
    fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        let col = ((x + self.offset.0) / CELL_W).floor() as i32;
        let row = ((y + self.offset.1) / CELL_H).floor() as i32 + PLAY_TOP as i32;
        (col, row)
    }

    fn in_play_area(&self, col: i32, row: i32) -> bool {
        col >= 0
            && col < self.width as i32
            && row >= PLAY_TOP as i32
            && row <= self.height.saturating_sub(RESERVED_ROWS) as i32
    }

    /// World position → terminal cell, if it lands inside the play area.
    fn to_cell(&self, x: f32, y: f32) -> Option<(i32, i32)> {
        let (col, row) = self.cell_of(x, y);
        self.in_play_area(col, row).then_some((col, row))
    }

    fn plot(&mut self, x: f32, y: f32, ch: char, fg: Color) {
        if let Some((col, row)) = self.to_cell(x, y) {
            self.plot_cell(col, row, ch, fg);
        }
    }

    fn plot_cell(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if !self.in_play_area(col, row) {
            return;
        }
        let idx = row as usize * self.width as usize + col as usize;
        self.grid[idx] = Cell { ch, fg };
    }

    /// Fill every cell whose centre lies within `radius` world units of `(cx, cy)`.
    fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, ch: char, fg: Color, only_blank: bool) {
        let cols = (radius / CELL_W).ceil() as i32;
        let rows = (radius / CELL_H).ceil() as i32;
        let (c0, r0) = self.cell_of(cx, cy);
        for dr in -rows..=rows {
            for dc in -cols..=cols {
                let dx = dc as f32 * CELL_W;
                let dy = dr as f32 * CELL_H;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let (col, row) = (c0 + dc, r0 + dr);
                if only_blank && !self.is_blank(col, row) {
                    continue;
                }
                self.plot_cell(col, row, ch, fg);
            }
        }
    }

    fn is_blank(&self, col: i32, row: i32) -> bool {
        if !self.in_play_area(col, row) {
            return false;
        }
        self.grid[row as usize * self.width as usize + col as usize].ch == ' '
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// Write the finished frame and HUD to the terminal.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        for row in PLAY_TOP..=self.height.saturating_sub(RESERVED_ROWS) {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.width as usize;
            let mut current = Color::Reset;
            let mut run = String::new();
            for cell in &self.grid[start..start + self.width as usize] {
                if cell.fg != current && cell.ch != ' ' {
                    if !run.is_empty() {
                        out.queue(style::SetForegroundColor(current))?;
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    current = cell.fg;
                }
                run.push(cell.ch);
            }
            out.queue(style::SetForegroundColor(current))?;
            out.queue(Print(&run))?;
        }

        if let Some(hud) = &self.hud {
            self.draw_hud(out, hud)?;
            if hud.game_over {
                self.draw_game_over(out, hud)?;
            } else if hud.paused {
                self.draw_paused(out)?;
            }
        }
        self.draw_controls_hint(out)?;

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.height.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }

    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud<W: Write>(&self, out: &mut W, hud: &Hud) -> std::io::Result<()> {
        out.queue(cursor::MoveTo(1, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        out.queue(Print(format!("Score: {:>9}", hud.score)))?;

        let level_str = format!("Level {} {}", hud.level, bar(hud.level_bar, 10));
        let lx = (self.width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(lx, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
        out.queue(Print(&level_str))?;

        let perf_tag = if self.performance_mode { "[PERF] " } else { "" };
        let lives_str = format!("Lives: {} {}", hud.lives, bar(hud.lives_bar, 6));
        let right_len = (perf_tag.chars().count() + lives_str.chars().count()) as u16;
        out.queue(cursor::MoveTo(self.width.saturating_sub(right_len + 1), 0))?;
        if !perf_tag.is_empty() {
            out.queue(style::SetForegroundColor(C_PERF))?;
            out.queue(Print(perf_tag))?;
        }
        out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
        out.queue(Print(&lives_str))?;
        Ok(())
    }

    fn draw_controls_hint<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(cursor::MoveTo(1, self.height.saturating_sub(1)))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print("← ↑ → ↓ / WASD : Move   SPACE : Shoot   ESC : Pause   Q : Quit"))?;
        Ok(())
    }

    fn draw_paused<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        self.draw_box(
            out,
            &[
                ("╔════════════════════╗", Color::Cyan),
                ("║       PAUSED       ║", Color::Cyan),
                ("╚════════════════════╝", Color::Cyan),
                ("ESC - Resume", Color::White),
            ],
        )
    }

    fn draw_game_over<W: Write>(&self, out: &mut W, hud: &Hud) -> std::io::Result<()> {
        let score_line = format!("Final Score: {:>9}", hud.score);
        let level_line = format!("Reached level {}", hud.level);
        self.draw_box(
            out,
            &[
                ("╔════════════════════╗", Color::Red),
                ("║    GAME  OVER      ║", Color::Red),
                ("╚════════════════════╝", Color::Red),
                (score_line.as_str(), Color::Yellow),
                (level_line.as_str(), Color::DarkGrey),
                ("SPACE - Play Again  Q - Quit", Color::White),
            ],
        )
    }

    fn draw_box<W: Write>(&self, out: &mut W, lines: &[(&str, Color)]) -> std::io::Result<()> {
        let cx = self.width / 2;
        let start_row = (self.height / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, (msg, color)) in lines.iter().enumerate() {
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            out.queue(style::SetForegroundColor(*color))?;
            out.queue(Print(*msg))?;
        }
        Ok(())
    }
}

/// Playfield in world units for a terminal of `width × height` cells.
pub fn playfield_for(width: u16, height: u16) -> Bounds {
    let rows = height.saturating_sub(RESERVED_ROWS).max(1);
    Bounds::new(width as f32 * CELL_W, rows as f32 * CELL_H)
}

/// `[####      ]` style gauge for a 0–100 percentage.
fn bar(percent: f32, slots: usize) -> String {
    let filled = ((percent / 100.0) * slots as f32).round().clamp(0.0, slots as f32) as usize;
    format!("[{}{}]", "#".repeat(filled), " ".repeat(slots - filled))
}

// ── Entities ──────────────────────────────────────────────────────────────────

impl Renderer for TerminalDisplay {
    fn begin_frame(&mut self, offset: (f32, f32)) {
        self.grid.fill(BLANK);
        self.offset = offset;
    }

    fn draw_nebula(&mut self, nebula: &Nebula) {
        if nebula.alpha() < 0.12 {
            return;
        }
        let radius = nebula.width.min(nebula.height) / 2.0;
        self.fill_disc(nebula.x, nebula.y, radius, '░', C_NEBULA, true);
    }

    fn draw_star(&mut self, star: &Star) {
        let alpha = star.alpha();
        if alpha < 0.15 {
            return;
        }
        let (ch, fg) = if star.size > 2.5 && alpha > 0.5 {
            ('*', C_STAR)
        } else {
            ('.', C_STAR_DIM)
        };
        self.plot(star.x, star.y, ch, fg);
    }

    fn draw_planet(&mut self, planet: &Planet) {
        self.fill_disc(planet.x, planet.y, planet.radius, '▒', C_PLANET, false);
        if planet.rings {
            // Ring ends sit on the rotated major axis of the ellipse.
            let reach = planet.radius * 1.8;
            let (dx, dy) = (planet.rotation.cos() * reach, planet.rotation.sin() * reach * 0.3);
            self.plot(planet.x - dx, planet.y - dy, '─', C_PLANET);
            self.plot(planet.x + dx, planet.y + dy, '─', C_PLANET);
        }
    }

    fn draw_particle(&mut self, particle: &Particle) {
        let (ch, fg) = if particle.alpha() > 0.5 {
            ('*', C_PARTICLE_HOT)
        } else {
            ('·', C_PARTICLE_COOL)
        };
        self.plot(particle.x, particle.y, ch, fg);
    }

    fn draw_asteroid(&mut self, asteroid: &Asteroid) {
        let (ch, fg) = asteroid_look(asteroid.kind);
        self.fill_disc(asteroid.x, asteroid.y, asteroid.size * 0.85, ch, fg, false);
        // Outline vertices, rotated with the asteroid.
        let (sin, cos) = asteroid.rotation.sin_cos();
        for v in &asteroid.vertices {
            let x = asteroid.x + v.x * cos - v.y * sin;
            let y = asteroid.y + v.x * sin + v.y * cos;
            self.plot(x, y, '+', fg);
        }
    }

    fn draw_projectile(&mut self, projectile: &Projectile) {
        self.plot(projectile.x, projectile.y, '║', C_PROJECTILE);
    }

    fn draw_player(&mut self, player: &Player) {
        // Sprite (2 rows, 3 cols):
        //   ▲       ← nose
        //  /█\      ← fuselage + wings
        let (col, row) = self.cell_of(player.x, player.y - player.height / 4.0);
        self.plot_cell(col, row, '▲', C_PLAYER);
        self.plot_cell(col - 1, row + 1, '/', C_PLAYER);
        self.plot_cell(col, row + 1, '█', C_PLAYER);
        self.plot_cell(col + 1, row + 1, '\\', C_PLAYER);
    }

    fn end_frame(&mut self) {
        self.offset = (0.0, 0.0);
    }
}

impl UiSink for TerminalDisplay {
    fn update_hud(&mut self, hud: &Hud) {
        self.hud = Some(hud.clone());
    }
}
