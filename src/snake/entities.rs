/// Snake data: pure data, no logic.

use serde::Deserialize;

use crate::engine::Screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Heading::Left | Heading::Right)
    }
}

/// Grid and pacing, loadable from the `[snake]` config section.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SnakeRules {
    pub cols: i32,
    pub rows: i32,
    /// Leaving the grid kills instead of wrapping.
    pub wall_mode: bool,
    pub start_interval_ms: u64,
    pub min_interval_ms: u64,
    /// Interval reduction per food eaten.
    pub interval_step_ms: u64,
}

impl Default for SnakeRules {
    fn default() -> Self {
        Self {
            cols: 24,
            rows: 20,
            wall_mode: false,
            start_interval_ms: 120,
            min_interval_ms: 55,
            interval_step_ms: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SnakeState {
    pub screen: Screen,
    /// Head first.
    pub body: Vec<Cell>,
    pub heading: Heading,
    /// Applied at the next tick.
    pub next_heading: Heading,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    /// Milliseconds between movement ticks.
    pub interval_ms: u64,
    pub wall_mode: bool,
    pub rules: SnakeRules,
    pub ticks: u64,
}

impl SnakeState {
    pub fn head(&self) -> Cell {
        self.body[0]
    }
}
