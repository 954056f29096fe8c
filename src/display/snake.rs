/// Snake frame: the grid is drawn centred, two terminal columns per cell.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::{border, clear, finish, hint, hud, overlay};
use crate::engine::Screen;
use crate::snake::SnakeState;

const C_HEAD: Color = Color::Green;
const C_BODY: Color = Color::DarkGreen;
const C_FOOD: Color = Color::Red;

fn to_u16(v: i64) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

pub fn render_snake<W: Write>(
    out: &mut W,
    state: &SnakeState,
    size: (u16, u16),
) -> std::io::Result<()> {
    clear(out)?;

    let cols = state.rules.cols.max(1);
    let rows = state.rules.rows.max(1);
    let grid_w = to_u16(i64::from(cols) * 2);
    let grid_h = to_u16(i64::from(rows));
    let left = size.0.saturating_sub(grid_w.saturating_add(2)) / 2;
    let top: u16 = 1;
    border(out, left, top, grid_w, grid_h)?;

    // Cells outside the grid are skipped.
    let cell = |x: i32, y: i32| {
        let inside = (0..cols).contains(&x) && (0..rows).contains(&y);
        inside.then(|| {
            (
                to_u16(i64::from(left) + 1 + i64::from(x) * 2),
                to_u16(i64::from(top) + 1 + i64::from(y)),
            )
        })
    };

    if state.screen != Screen::Title {
        if let Some((fx, fy)) = cell(state.food.x, state.food.y) {
            out.queue(cursor::MoveTo(fx, fy))?;
            out.queue(style::SetForegroundColor(C_FOOD))?;
            out.queue(Print("●"))?;
        }

        for (i, seg) in state.body.iter().enumerate() {
            let Some((sx, sy)) = cell(seg.x, seg.y) else {
                continue;
            };
            out.queue(cursor::MoveTo(sx, sy))?;
            out.queue(style::SetForegroundColor(if i == 0 { C_HEAD } else { C_BODY }))?;
            out.queue(Print("██"))?;
        }
    }

    let mode = if state.wall_mode { "WALLS" } else { "WRAP" };
    hud(
        out,
        &format!("Score: {:>5}", state.score),
        &format!("Best: {}   Mode: {}", state.high_score, mode),
        size,
    )?;
    hint(out, "Arrows / WASD : Turn   P / ESC : Pause   Q : Menu", size)?;

    let score_line = format!("Score: {}   Best: {}", state.score, state.high_score);
    let new_best = state.score > 0 && state.score >= state.high_score;
    let best_line = format!("Best: {}", state.high_score);
    let mode_line = format!("Mode: {}  (M to toggle)", mode);
    match state.screen {
        Screen::Title => overlay(
            out,
            size,
            &[
                ("S N A K E", Color::Green),
                (&best_line, Color::Yellow),
                (&mode_line, Color::White),
                ("ENTER / SPACE - Start", Color::White),
            ],
        )?,
        Screen::Paused => overlay(
            out,
            size,
            &[("PAUSED", Color::Cyan), ("P - Resume", Color::White)],
        )?,
        Screen::GameOver => {
            let mut lines = vec![
                ("GAME OVER", Color::Red),
                (score_line.as_str(), Color::Yellow),
            ];
            if new_best {
                lines.push(("NEW HIGH SCORE!", Color::Green));
            }
            lines.push(("ENTER - Title", Color::White));
            overlay(out, size, &lines)?
        }
        _ => {}
    }
    finish(out, size)
}
