/// Terminal arcade: a sword-and-stones platformer, a run-and-gun scroller and
/// Snake, sharing one physics / combat / screen-flow engine.
///
/// Game logic is pure `&State -> State` updates. `display` turns states into
/// terminal commands; the binary owns the terminal and the frame loop.

pub mod config;
pub mod display;
pub mod engine;
pub mod input;
pub mod knight;
pub mod scores;
pub mod slug;
pub mod snake;
