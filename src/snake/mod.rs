/// Nokia-style Snake on a fixed grid.

pub mod compute;
pub mod entities;

pub use compute::{
    is_tick_due, new_state, persist_high_score, place_food, start_game, tick, toggle_wall_mode,
    turn, update,
};
pub use entities::{Cell, Heading, SnakeRules, SnakeState};
