//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only projects the
//! 640×960 world onto the terminal grid and translates state into terminal
//! commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::compute::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::entities::{BulletOwner, Explosion, GameState, GameStatus, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_ITEM: Color = Color::Yellow;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Border tint doubles as the stage indicator.
fn stage_color(stage: u32) -> Color {
    match stage {
        1 => Color::DarkBlue,
        2 => Color::DarkGreen,
        3 => Color::DarkYellow,
        _ => Color::DarkRed,
    }
}

// ── Sprite themes ─────────────────────────────────────────────────────────────

/// Glyph set decided once at startup.  The Unicode set is the default; the
/// ASCII set is the fallback for terminals or fonts that cannot render it.
pub struct Theme {
    pub player_tip: &'static str,
    pub player_wings: &'static str,
    pub enemy_hull: &'static str,
    pub enemy_base: &'static str,
    pub bullet_up: &'static str,
    pub bullet_down: &'static str,
    pub item: &'static str,
    pub heart: &'static str,
    /// One glyph per explosion animation frame.
    pub explosion: [char; 4],
    pub border_h: &'static str,
    pub border_v: &'static str,
    pub border_tl: &'static str,
    pub border_tr: &'static str,
    pub border_bl: &'static str,
    pub border_br: &'static str,
    pub hint: &'static str,
}

impl Theme {
    pub fn unicode() -> Self {
        Theme {
            player_tip: "▲",
            player_wings: "/|\\",
            enemy_hull: "<▼>",
            enemy_base: "[_]",
            bullet_up: "║",
            bullet_down: "↓",
            item: "★",
            heart: "♥",
            explosion: ['✦', '✶', '✺', '✹'],
            border_h: "─",
            border_v: "│",
            border_tl: "┌",
            border_tr: "┐",
            border_bl: "└",
            border_br: "┘",
            hint: "← → / A D : Move   SPACE : Shoot   Q : Quit",
        }
    }

    pub fn ascii() -> Self {
        Theme {
            player_tip: "^",
            player_wings: "/|\\",
            enemy_hull: "<v>",
            enemy_base: "[_]",
            bullet_up: "|",
            bullet_down: "!",
            item: "$",
            heart: "*",
            explosion: ['+', '*', 'X', 'x'],
            border_h: "-",
            border_v: "|",
            border_tl: "+",
            border_tr: "+",
            border_bl: "+",
            border_br: "+",
            hint: "<- -> / A D : Move   SPACE : Shoot   Q : Quit",
        }
    }
}

// ── World → cell projection ──────────────────────────────────────────────────
//
// Screen layout: row 0 is the HUD, row 1 the top border, rows 2..height-3
// the play area, row height-2 the bottom border, row height-1 the key hints.

fn play_cols(width: u16) -> i32 {
    width.saturating_sub(2) as i32
}

fn play_rows(height: u16) -> i32 {
    height.saturating_sub(4) as i32
}

fn cell_x(x: f32, width: u16) -> i32 {
    1 + (x / WORLD_WIDTH * play_cols(width) as f32).floor() as i32
}

fn cell_y(y: f32, height: u16) -> i32 {
    2 + (y / WORLD_HEIGHT * play_rows(height) as f32).floor() as i32
}

/// Queue a string starting at (col, row), clipped per character to the play
/// area so sprites straddling an edge are partly drawn.
fn put<W: Write>(
    out: &mut W,
    col: i32,
    row: i32,
    text: &str,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    if row < 2 || row > height as i32 - 3 {
        return Ok(());
    }
    for (i, ch) in text.chars().enumerate() {
        let c = col + i as i32;
        if c < 1 || c > width as i32 - 2 {
            continue;
        }
        out.queue(cursor::MoveTo(c as u16, row as u16))?;
        out.queue(Print(ch))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame into `out` and flush once.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    theme: &Theme,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, state, theme, width, height)?;
    draw_hud(out, state, theme, width)?;

    out.queue(style::SetForegroundColor(C_ENEMY))?;
    for enemy in &state.enemies {
        draw_sprite2(
            out,
            &enemy.rect,
            theme.enemy_hull,
            theme.enemy_base,
            width,
            height,
        )?;
    }

    out.queue(style::SetForegroundColor(C_ITEM))?;
    for item in &state.items {
        let col = cell_x(item.rect.center_x(), width);
        let row = cell_y(item.rect.center_y(), height);
        put(out, col, row, theme.item, width, height)?;
    }

    for bullet in &state.bullets {
        let (glyph, color) = match bullet.owner {
            BulletOwner::Player => (theme.bullet_up, C_BULLET_PLAYER),
            BulletOwner::Enemy => (theme.bullet_down, C_BULLET_ENEMY),
        };
        out.queue(style::SetForegroundColor(color))?;
        let col = cell_x(bullet.rect.center_x(), width);
        let row = cell_y(bullet.rect.center_y(), height);
        put(out, col, row, glyph, width, height)?;
    }

    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    for explosion in &state.explosions {
        draw_explosion(out, explosion, theme, width, height)?;
    }

    draw_player(out, state, theme, width, height)?;

    draw_controls_hint(out, theme, height)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border (stage-tinted) ─────────────────────────────────────────────────────

fn draw_border<W: Write>(
    out: &mut W,
    state: &GameState,
    theme: &Theme,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let w = width as usize;
    let h = height;

    out.queue(style::SetForegroundColor(stage_color(state.stage)))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!(
        "{}{}{}",
        theme.border_tl,
        theme.border_h.repeat(w.saturating_sub(2)),
        theme.border_tr
    )))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!(
        "{}{}{}",
        theme.border_bl,
        theme.border_h.repeat(w.saturating_sub(2)),
        theme.border_br
    )))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print(theme.border_v))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print(theme.border_v))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    theme: &Theme,
    width: u16,
) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>8}", state.score)))?;

    // Stage — centre
    let stage_str = format!("Stage: {}", state.stage);
    let sx = (width / 2).saturating_sub(stage_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(stage_color(state.stage)))?;
    out.queue(Print(&stage_str))?;

    // Lives — right
    let hearts: String = theme.heart.repeat(state.player.lives as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = width.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Two-row sprite centered on a world rect (both rows are 3 cells wide).
fn draw_sprite2<W: Write>(
    out: &mut W,
    rect: &Rect,
    top: &str,
    bottom: &str,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let col = cell_x(rect.center_x(), width) - 1;
    let row = cell_y(rect.center_y(), height);
    put(out, col, row, top, width, height)?;
    put(out, col, row + 1, bottom, width, height)?;
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    state: &GameState,
    theme: &Theme,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    // Blink while invincible: visible only on even 100 ms slices.
    if state.now < state.invincible_until && (state.now / 100) % 2 == 1 {
        return Ok(());
    }

    let p = &state.player.rect;
    out.queue(style::SetForegroundColor(C_PLAYER))?;

    let col = cell_x(p.center_x(), width);
    let row = cell_y(p.center_y(), height);
    put(out, col, row, theme.player_tip, width, height)?;
    put(out, col - 1, row + 1, theme.player_wings, width, height)?;
    Ok(())
}

/// Expanding pattern per animation frame, offsets relative to the center.
const EXPLOSION_OFFSETS: [&[(i32, i32)]; 4] = [
    &[(0, 0)],
    &[(-1, 0), (0, 0), (1, 0)],
    &[(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)],
    &[(-1, -1), (1, -1), (-2, 0), (2, 0), (-1, 1), (1, 1)],
];

fn draw_explosion<W: Write>(
    out: &mut W,
    explosion: &Explosion,
    theme: &Theme,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let frame = explosion.frame.min(3) as usize;
    let glyph = theme.explosion[frame];
    let col = cell_x(explosion.rect.center_x(), width);
    let row = cell_y(explosion.rect.center_y(), height);
    let mut buf = [0u8; 4];
    for &(dx, dy) in EXPLOSION_OFFSETS[frame] {
        put(
            out,
            col + dx,
            row + dy,
            glyph.encode_utf8(&mut buf),
            width,
            height,
        )?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, theme: &Theme, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(theme.hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", state.score);
    let lines: &[(&str, Color)] = &[
        ("G A M E   O V E R", Color::Red),
        (&score_line, Color::Yellow),
        ("SPACE - Restart   Q - Quit", Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16 * 2;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
