/// Run & Gun entity types: pure data, no logic.

use crate::engine::{Body, EntityId, Facing, Health, IdGen, Particle, Rect, Screen, Swing};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weapon {
    Pistol,
    HeavyMachineGun,
    RocketLauncher,
}

impl Weapon {
    pub fn label(self) -> &'static str {
        match self {
            Weapon::Pistol => "Pistol",
            Weapon::HeavyMachineGun => "Heavy MG",
            Weapon::RocketLauncher => "Rocket",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoldierKind {
    Rifleman,
    Heavy,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub health: Health,
    pub facing: Facing,
    pub crouching: bool,
    pub weapon: Weapon,
    /// Rounds left for the heavy weapons; the pistol never runs dry.
    pub ammo: u32,
    pub grenades: u32,
    /// Frames of damage immunity left.
    pub invincible: u32,
    pub flash: u32,
    pub shoot_cooldown: u32,
    pub melee: Option<Swing>,
    pub melee_cooldown: u32,
    pub in_tank: bool,
    /// Jump and grenade fire once per key press.
    pub jump_latched: bool,
    pub grenade_latched: bool,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    pub vx: f32,
    pub damage: f32,
    /// Rockets and tank shells burst into fire on impact.
    pub explosive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grenade {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames until detonation.
    pub fuse: u32,
}

// ── Actors ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: SoldierKind,
    pub body: Body,
    pub health: Health,
    pub facing: Facing,
    pub shoot_cooldown: u32,
    pub flash: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tank {
    pub id: EntityId,
    pub body: Body,
    pub health: Health,
    pub facing: Facing,
    pub cannon_cooldown: u32,
    pub occupied: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub id: EntityId,
    pub body: Body,
    pub health: Health,
    pub attack_cooldown: u32,
    pub flash: u32,
}

// ── Pickups & props ───────────────────────────────────────────────────────────

/// A prisoner of war; freeing one hands out a reward.
#[derive(Clone, Debug, PartialEq)]
pub struct Pow {
    pub id: EntityId,
    pub rect: Rect,
    pub rescued: bool,
    /// Idle animation phase.
    pub bob: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Crate {
    pub id: EntityId,
    pub rect: Rect,
    pub broken: bool,
    pub has_item: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponPickup {
    pub rect: Rect,
    pub weapon: Weapon,
    pub ammo: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SlugState {
    pub screen: Screen,
    /// 1-based mission number.
    pub level: usize,
    pub world_width: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub grenades: Vec<Grenade>,
    pub pows: Vec<Pow>,
    pub crates: Vec<Crate>,
    pub pickups: Vec<WeaponPickup>,
    pub tank: Option<Tank>,
    pub boss: Option<Boss>,
    pub platforms: Vec<Rect>,
    pub particles: Vec<Particle>,
    /// Frames of screen shake left; also its amplitude.
    pub screen_shake: u32,
    pub ids: IdGen,
    pub frame: u64,
}
