//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! round state.  No game logic is performed; this module only translates
//! world coordinates into terminal cells.  The world has y growing toward
//! the swarm, so rows are flipped: the player is drawn near the bottom.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use swarm_defender::entities::{EnemyKind, RoundOutcome, RoundState};
use swarm_defender::sprite::{Sprite, SpriteKind};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_ENEMY_SPACECRAFT: Color = Color::Green;
const C_ENEMY_OCTOPUS: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

const CONTROLS: &str = "← → / A D : Move   SPACE : Shoot   ESC : Quit";

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Maps world positions into the bordered play area
/// (columns `1..w-1`, rows `2..h-2`).
struct Viewport {
    world: Vec2,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(world: Vec2, width: u16, height: u16) -> Self {
        Self {
            world,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
        }
    }

    fn cell(&self, pos: Vec2) -> (u16, u16) {
        let fx = (pos.x / self.world.x).clamp(0.0, 1.0);
        let fy = (1.0 - pos.y / self.world.y).clamp(0.0, 1.0);
        let col = ((fx * self.cols as f32) as u16).min(self.cols - 1);
        let row = ((fy * self.rows as f32) as u16).min(self.rows - 1);
        (1 + col, 2 + row)
    }

    fn last_row(&self) -> u16 {
        2 + self.rows - 1
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
/// Z-order: border, player, alive enemies, player shots, enemy shots.
pub fn render<W: Write>(out: &mut W, state: &RoundState) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(state.rules.screen, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;

    draw_sprite(out, &view, &state.player)?;
    for enemy in state.swarm.alive() {
        draw_sprite(out, &view, enemy)?;
    }
    for shot in &state.player_shots {
        draw_sprite(out, &view, shot)?;
    }
    for shot in &state.enemy_shots {
        draw_sprite(out, &view, shot)?;
    }

    draw_controls_hint(out, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title screen shown before the first round.
pub fn draw_start_screen<W: Write>(out: &mut W, seed: u64) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, width, height)?;

    let seed_line = format!("seed {}", seed);
    let lines: &[(&str, Color)] = &[
        ("★  SWARM  DEFENDER  ★", Color::Cyan),
        ("", Color::White),
        ("Stop the swarm before it reaches you.", Color::White),
        ("", Color::White),
        (CONTROLS, C_HINT),
        ("", Color::White),
        ("ENTER - Start   ESC - Quit", Color::Yellow),
        (seed_line.as_str(), C_HINT),
    ];
    draw_centered(out, lines, width, height)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

/// Win / lose screen over the final frame of a round.
pub fn draw_end_screen<W: Write>(
    out: &mut W,
    state: &RoundState,
    outcome: RoundOutcome,
) -> std::io::Result<()> {
    render(out, state)?;
    let (width, height) = terminal::size()?;

    let (top, title, bottom, color) = match outcome {
        RoundOutcome::Win => (
            "╔════════════════════╗",
            "║   SWARM  DEFEATED  ║",
            "╚════════════════════╝",
            Color::Green,
        ),
        _ => (
            "╔════════════════════╗",
            "║    GAME  OVER      ║",
            "╚════════════════════╝",
            Color::Red,
        ),
    };
    let tally = format!(
        "Destroyed: {:>3} / {}",
        state.swarm.killed_count(),
        state.swarm.enemies.len()
    );

    let lines: &[(&str, Color)] = &[
        (top, color),
        (title, color),
        (bottom, color),
        (tally.as_str(), Color::Yellow),
        ("ENTER - Play Again  ESC - Quit", Color::White),
    ];
    draw_centered(out, lines, width, height)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border & HUD ──────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, state: &RoundState, width: u16) -> std::io::Result<()> {
    let total = state.swarm.enemies.len();
    let left = format!("Destroyed:{:>3}/{}", state.swarm.killed_count(), total);
    let right = format!("Remaining:{:>3}", state.swarm.alive_count());

    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(Print(&left))?;

    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(&right))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(CONTROLS))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

const PLAYER_ART: &[&str] = &[" ▲ ", "/█\\"];
//  «▼»   swept-back wings
//  ╚═╝   engine block
const SPACECRAFT_ART: &[&str] = &["«▼»", "╚═╝"];
//  (◎)   glowing eye
//  ╰─╯   tentacle arc
const OCTOPUS_ART: &[&str] = &["(◎)", "╰─╯"];
const PLAYER_SHOT_ART: &[&str] = &["║"];
const ENEMY_SHOT_ART: &[&str] = &["↓"];

/// Glyph rows and colour for a sprite, drawn centred on its cell.
fn glyphs(kind: SpriteKind) -> (&'static [&'static str], Color) {
    match kind {
        SpriteKind::Player => (PLAYER_ART, C_PLAYER),
        SpriteKind::Enemy(EnemyKind::Spacecraft) => (SPACECRAFT_ART, C_ENEMY_SPACECRAFT),
        SpriteKind::Enemy(EnemyKind::Octopus) => (OCTOPUS_ART, C_ENEMY_OCTOPUS),
        SpriteKind::PlayerShot => (PLAYER_SHOT_ART, C_BULLET_PLAYER),
        SpriteKind::EnemyShot => (ENEMY_SHOT_ART, C_BULLET_ENEMY),
    }
}

fn draw_sprite<W: Write>(
    out: &mut W,
    view: &Viewport,
    sprite: &impl Sprite,
) -> std::io::Result<()> {
    let (rows, color) = glyphs(sprite.kind());
    let (col, row) = view.cell(sprite.position());

    out.queue(style::SetForegroundColor(color))?;
    for (i, text) in rows.iter().enumerate() {
        let y = row + i as u16;
        if y > view.last_row() {
            break;
        }
        let half = text.chars().count() as u16 / 2;
        out.queue(cursor::MoveTo(col.saturating_sub(half).max(1), y))?;
        out.queue(Print(*text))?;
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
