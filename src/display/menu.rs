/// Cabinet menu: pick a game.

use std::io::Write;

use crossterm::style::Color;

use super::{centered, clear, finish, hint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Knight,
    RunAndGun,
    Snake,
    Quit,
}

impl MenuChoice {
    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Knight => "Dragon Stones Knight",
            MenuChoice::RunAndGun => "Run & Gun",
            MenuChoice::Snake => "Snake",
            MenuChoice::Quit => "Quit",
        }
    }
}

pub const MENU_CHOICES: [MenuChoice; 4] = [
    MenuChoice::Knight,
    MenuChoice::RunAndGun,
    MenuChoice::Snake,
    MenuChoice::Quit,
];

pub fn render_menu<W: Write>(
    out: &mut W,
    selected: usize,
    snake_best: u32,
    size: (u16, u16),
) -> std::io::Result<()> {
    clear(out)?;
    let top = (size.1 / 2).saturating_sub(5);

    centered(out, size.0, top, "╔══════════════════════╗", Color::Yellow)?;
    centered(out, size.0, top + 1, "║   ARCADE  CABINET    ║", Color::Yellow)?;
    centered(out, size.0, top + 2, "╚══════════════════════╝", Color::Yellow)?;

    for (i, choice) in MENU_CHOICES.iter().enumerate() {
        let (text, color) = if i == selected {
            (format!("> {} <", choice.label()), Color::Cyan)
        } else {
            (choice.label().to_string(), Color::White)
        };
        centered(out, size.0, top + 4 + i as u16 * 2, &text, color)?;
    }

    let best = format!("Snake best: {snake_best}");
    centered(out, size.0, top + 13, &best, Color::DarkYellow)?;
    hint(out, "↑ ↓ : Select   ENTER : Play   Q : Quit", size)?;
    finish(out, size)
}
