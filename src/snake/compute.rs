/// Pure Snake logic.
///
/// Every public function takes the current `SnakeState` by reference (plus an
/// injected RNG where food has to be placed) and returns a new state.

use anyhow::Result;
use rand::Rng;
use tracing::{info, warn};

use crate::engine::{advance, FlowEvent, Screen};
use crate::input::{InputSnapshot, Intent};
use crate::scores::{record_high_score, ScoreStore, SNAKE_HIGH_KEY};
use crate::snake::entities::{Cell, Heading, SnakeRules, SnakeState};

const POINTS_PER_FOOD: u32 = 10;
const FOOD_PLACEMENT_TRIES: u32 = 500;

// ── Constructors ─────────────────────────────────────────────────────────────

fn starting_body(rules: &SnakeRules) -> Vec<Cell> {
    let cx = rules.cols / 2;
    let cy = rules.rows / 2;
    (0..3).map(|i| Cell { x: cx - i, y: cy }).collect()
}

/// Title-screen state with the given persisted best.
pub fn new_state(rules: SnakeRules, high_score: u32) -> SnakeState {
    SnakeState {
        screen: Screen::Title,
        body: starting_body(&rules),
        heading: Heading::Right,
        next_heading: Heading::Right,
        food: Cell { x: 0, y: 0 },
        score: 0,
        high_score,
        interval_ms: rules.start_interval_ms,
        wall_mode: rules.wall_mode,
        rules,
        ticks: 0,
    }
}

/// Fresh run: length-3 snake in the centre heading right.
pub fn start_game(state: &SnakeState, rng: &mut impl Rng) -> SnakeState {
    let body = starting_body(&state.rules);
    let mut next = SnakeState {
        screen: Screen::Playing,
        body,
        heading: Heading::Right,
        next_heading: Heading::Right,
        score: 0,
        interval_ms: state.rules.start_interval_ms,
        ticks: 0,
        ..state.clone()
    };
    next.food = place_food(&next, rng);
    info!(wall_mode = next.wall_mode, "snake run started");
    next
}

/// A random free cell; gives up avoiding the body after a bounded number of
/// tries so a nearly-full grid cannot stall the frame.
pub fn place_food(state: &SnakeState, rng: &mut impl Rng) -> Cell {
    let cols = state.rules.cols.max(1);
    let rows = state.rules.rows.max(1);
    let mut cell = Cell { x: 0, y: 0 };
    for _ in 0..FOOD_PLACEMENT_TRIES {
        cell = Cell {
            x: rng.gen_range(0..cols),
            y: rng.gen_range(0..rows),
        };
        if !state.body.contains(&cell) {
            break;
        }
    }
    cell
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Queues a turn. Only turns perpendicular to the direction of the last tick
/// are accepted, so the snake can never reverse into itself.
pub fn turn(state: &SnakeState, heading: Heading) -> SnakeState {
    if heading.is_horizontal() == state.heading.is_horizontal() {
        return state.clone();
    }
    SnakeState {
        next_heading: heading,
        ..state.clone()
    }
}

pub fn toggle_wall_mode(state: &SnakeState) -> SnakeState {
    SnakeState {
        wall_mode: !state.wall_mode,
        ..state.clone()
    }
}

fn heading_for(intent: Intent) -> Option<Heading> {
    match intent {
        Intent::Up => Some(Heading::Up),
        Intent::Down => Some(Heading::Down),
        Intent::Left => Some(Heading::Left),
        Intent::Right => Some(Heading::Right),
        _ => None,
    }
}

/// Applies this frame's key presses in arrival order. Movement itself happens
/// in [`tick`], on the snake's own interval.
pub fn update(state: &SnakeState, input: &InputSnapshot, rng: &mut impl Rng) -> SnakeState {
    let mut next = state.clone();
    for &intent in input.presses() {
        let screen = next.screen.clone();
        next = match (&screen, intent) {
            (Screen::Title, Intent::Confirm) => start_game(&next, rng),
            (Screen::Title, Intent::ToggleMode) => toggle_wall_mode(&next),
            (Screen::GameOver, Intent::Confirm) => SnakeState {
                screen: advance(&screen, FlowEvent::Dismiss),
                ..next
            },
            (Screen::Playing | Screen::Paused, Intent::Pause) => SnakeState {
                screen: advance(&screen, FlowEvent::Pause),
                ..next
            },
            (Screen::Paused, Intent::Confirm) => SnakeState {
                screen: advance(&screen, FlowEvent::Confirm),
                ..next
            },
            (Screen::Playing, other) => match heading_for(other) {
                Some(heading) => turn(&next, heading),
                None => next,
            },
            _ => next,
        };
    }
    next
}

// ── Per-interval tick ────────────────────────────────────────────────────────

pub fn is_tick_due(state: &SnakeState, elapsed_ms: u64) -> bool {
    state.screen == Screen::Playing && elapsed_ms >= state.interval_ms
}

fn die(state: &SnakeState) -> SnakeState {
    info!(score = state.score, "snake run over");
    SnakeState {
        screen: advance(&state.screen, FlowEvent::PlayerDown),
        high_score: state.high_score.max(state.score),
        ..state.clone()
    }
}

/// Advance the snake by one cell.
pub fn tick(state: &SnakeState, rng: &mut impl Rng) -> SnakeState {
    if state.screen != Screen::Playing {
        return state.clone();
    }

    let heading = state.next_heading;
    let (dx, dy) = heading.delta();
    let head = state.head();
    let cols = state.rules.cols.max(1);
    let rows = state.rules.rows.max(1);
    let mut nx = head.x + dx;
    let mut ny = head.y + dy;

    let outside = nx < 0 || nx >= cols || ny < 0 || ny >= rows;
    if outside {
        if state.wall_mode {
            return die(&SnakeState {
                heading,
                ..state.clone()
            });
        }
        nx = nx.rem_euclid(cols);
        ny = ny.rem_euclid(rows);
    }

    let new_head = Cell { x: nx, y: ny };
    if state.body.contains(&new_head) {
        return die(&SnakeState {
            heading,
            ..state.clone()
        });
    }

    let mut body = Vec::with_capacity(state.body.len() + 1);
    body.push(new_head);
    body.extend_from_slice(&state.body);

    let ate = new_head == state.food;
    if !ate {
        body.pop();
    }

    let mut next = SnakeState {
        body,
        heading,
        ticks: state.ticks + 1,
        ..state.clone()
    };

    if ate {
        next.score += POINTS_PER_FOOD;
        if next.interval_ms > state.rules.min_interval_ms {
            next.interval_ms = next
                .interval_ms
                .saturating_sub(state.rules.interval_step_ms)
                .max(state.rules.min_interval_ms);
        }
        next.food = place_food(&next, rng);
    }
    next
}

// ── Persistence ──────────────────────────────────────────────────────────────

/// Stores the run's score if it beats the persisted best and returns the best.
/// Storage failures are logged before being returned.
pub fn persist_high_score(state: &SnakeState, store: &mut impl ScoreStore) -> Result<u32> {
    match record_high_score(store, SNAKE_HIGH_KEY, state.score) {
        Ok(best) => Ok(best),
        Err(err) => {
            warn!(error = %err, "could not persist snake high score");
            Err(err)
        }
    }
}
