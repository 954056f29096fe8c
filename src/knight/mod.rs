/// Dragon Stones Knight: a three-level sword platformer where each boss drops
/// a dragon stone that empowers the sword.

pub mod compute;
pub mod entities;
pub mod levels;

pub use compute::{
    chain_lightning, damage_multiplier, has_all_stones, load_level, new_state, start_game,
    sword_hitbox, update, GROUND_Y, WORLD_HEIGHT, WORLD_WIDTH,
};
pub use entities::{Boss, Enemy, EnemyTier, Fireball, Knight, KnightState, Stone};
