/// Rendering layer. All terminal output lives here.
///
/// Each function receives a mutable writer, an immutable view of a game
/// state and the terminal size. No game logic is performed; this module only
/// translates state into terminal commands.
///
/// Terminal layout shared by every screen:
/// * row 0: HUD
/// * rows 1..h-1: playfield
/// * row h-1: controls hint

mod knight;
mod menu;
mod slug;
mod snake;

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::engine::{Particle, Rect, Screen, Tint};

pub use knight::render_knight;
pub use menu::{render_menu, MenuChoice, MENU_CHOICES};
pub use slug::render_slug;
pub use snake::render_snake;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_GROUND: Color = Color::DarkGreen;
const C_PLATFORM: Color = Color::DarkYellow;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps a window of world units onto the playfield rows of the terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    cols: u16,
    rows: u16,
    /// World x shown at column 0.
    origin_x: f32,
    view_w: f32,
    view_h: f32,
}

impl Viewport {
    pub fn new(size: (u16, u16), origin_x: f32, view_w: f32, view_h: f32) -> Self {
        Self {
            cols: size.0.max(1),
            rows: size.1.saturating_sub(2).max(1),
            origin_x,
            view_w,
            view_h,
        }
    }

    fn col(&self, x: f32) -> f32 {
        (x - self.origin_x) / self.view_w * self.cols as f32
    }

    fn row(&self, y: f32) -> f32 {
        y / self.view_h * self.rows as f32
    }

    /// Terminal cell for a world point, or `None` when it is off screen.
    pub fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let c = self.col(x).floor();
        let r = self.row(y).floor();
        let on_screen = c >= 0.0 && c < self.cols as f32 && r >= 0.0 && r < self.rows as f32;
        on_screen.then(|| (c as u16, r as u16 + 1))
    }

    /// Cells covered by `rect`, clipped to the screen, as
    /// `(col, row, width, height)`. Anything visible covers at least one cell.
    pub fn span(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = self.col(rect.x).floor().max(0.0);
        let c1 = self.col(rect.right()).ceil().min(self.cols as f32);
        let r0 = self.row(rect.y).floor().max(0.0);
        let r1 = self.row(rect.bottom()).ceil().min(self.rows as f32);
        if c1 <= c0 || r1 <= r0 {
            return None;
        }
        Some((c0 as u16, r0 as u16 + 1, (c1 - c0) as u16, (r1 - r0) as u16))
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

/// Fills the cells under `rect` with `glyph`.
fn fill<W: Write>(
    out: &mut W,
    vp: &Viewport,
    rect: &Rect,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let Some((col, row, w, h)) = vp.span(rect) else {
        return Ok(());
    };
    let line: String = std::iter::repeat(glyph).take(w as usize).collect();
    out.queue(style::SetForegroundColor(color))?;
    for dy in 0..h {
        out.queue(cursor::MoveTo(col, row + dy))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

/// Prints `text` at the cell holding world point (`x`, `y`), if visible.
fn label<W: Write>(
    out: &mut W,
    vp: &Viewport,
    x: f32,
    y: f32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = vp.cell(x, y) {
        let room = vp.cols.saturating_sub(col) as usize;
        let clipped: String = text.chars().take(room).collect();
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(clipped))?;
    }
    Ok(())
}

fn centered<W: Write>(
    out: &mut W,
    cols: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// A block of centred lines in the middle of the screen.
fn overlay<W: Write>(
    out: &mut W,
    size: (u16, u16),
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let start_row = (size.1 / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        centered(out, size.0, start_row + i as u16, msg, *color)?;
    }
    Ok(())
}

/// `[#####-----]`, `width` cells between the brackets.
pub fn health_bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn hud<W: Write>(out: &mut W, left: &str, right: &str, size: (u16, u16)) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(left))?;
    let rx = size.0.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(right))?;
    Ok(())
}

fn hint<W: Write>(out: &mut W, text: &str, size: (u16, u16)) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, size.1.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(text))?;
    Ok(())
}

fn ground<W: Write>(
    out: &mut W,
    vp: &Viewport,
    ground_y: f32,
    world_h: f32,
) -> std::io::Result<()> {
    let rect = Rect::new(vp.origin_x, ground_y, vp.view_w, world_h - ground_y);
    fill(out, vp, &rect, '▒', C_GROUND)
}

fn platforms<W: Write>(out: &mut W, vp: &Viewport, platforms: &[Rect]) -> std::io::Result<()> {
    for p in platforms {
        fill(out, vp, p, '▀', C_PLATFORM)?;
    }
    Ok(())
}

fn particles<W: Write>(out: &mut W, vp: &Viewport, particles: &[Particle]) -> std::io::Result<()> {
    for p in particles {
        let color = match p.tint {
            Tint::Dust => Color::Grey,
            Tint::Blood => Color::DarkRed,
            Tint::Fire => Color::DarkYellow,
            Tint::Debris => Color::DarkYellow,
            Tint::Gold => Color::Yellow,
            Tint::Green => Color::Green,
        };
        label(out, vp, p.x, p.y, "·", color)?;
    }
    Ok(())
}

fn clear<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    Ok(())
}

/// Park cursor in a harmless spot and flush.
fn finish<W: Write>(out: &mut W, size: (u16, u16)) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, size.1.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Lines for the screens every game shares. `Playing` has none.
fn flow_overlay<W: Write>(
    out: &mut W,
    screen: &Screen,
    size: (u16, u16),
    title: &str,
    banner: &str,
) -> std::io::Result<()> {
    match screen {
        Screen::Title => overlay(
            out,
            size,
            &[
                (title, Color::Yellow),
                ("", Color::White),
                ("ENTER - Start   Q - Menu", Color::White),
            ],
        ),
        Screen::Paused => overlay(
            out,
            size,
            &[("PAUSED", Color::Cyan), ("P - Resume", Color::White)],
        ),
        Screen::LevelTransition { .. } => overlay(
            out,
            size,
            &[(banner, Color::Yellow), ("Get ready...", Color::White)],
        ),
        Screen::GameOver => overlay(
            out,
            size,
            &[
                ("╔══════════════════╗", Color::Red),
                ("║    GAME  OVER    ║", Color::Red),
                ("╚══════════════════╝", Color::Red),
                ("ENTER - Play Again  Q - Menu", Color::White),
            ],
        ),
        Screen::Victory => overlay(
            out,
            size,
            &[
                ("╔══════════════════╗", Color::Green),
                ("║     VICTORY!     ║", Color::Green),
                ("╚══════════════════╝", Color::Green),
                (banner, Color::Yellow),
                ("ENTER - Play Again  Q - Menu", Color::White),
            ],
        ),
        Screen::Playing => Ok(()),
    }
}

fn border<W: Write>(out: &mut W, col: u16, row: u16, w: u16, h: u16) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w as usize))))?;
    out.queue(cursor::MoveTo(col, row.saturating_add(h).saturating_add(1)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w as usize))))?;
    let right = col.saturating_add(w).saturating_add(1);
    for r in 1..=h {
        out.queue(cursor::MoveTo(col, row.saturating_add(r)))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(right, row.saturating_add(r)))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}
