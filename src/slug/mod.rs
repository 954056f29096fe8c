/// Run & Gun: a side-scrolling shooter with weapon pickups, grenades,
/// prisoners to free and a tank to drive.

pub mod compute;
pub mod entities;
pub mod levels;

pub use compute::{
    camera_x, explode, load_level, melee_hitbox, new_state, start_game, update, GROUND_Y,
    VIEW_WIDTH, WORLD_HEIGHT,
};
pub use entities::{
    Boss, Bullet, Crate, Enemy, Grenade, Player, Pow, SlugState, SoldierKind, Tank, Weapon,
    WeaponPickup,
};
