/// Dragon Stones Knight entity types: pure data, no logic.

use crate::engine::{Body, EntityId, Facing, Health, IdGen, Rect, Screen, Swing};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stone {
    /// ×1.5 sword damage.
    Fire,
    /// ×2.0 sword damage and knockback.
    Water,
    /// ×2.5 sword damage and a chance of chain lightning.
    Lightning,
}

impl Stone {
    pub fn label(self) -> &'static str {
        match self {
            Stone::Fire => "FIRE",
            Stone::Water => "WATER",
            Stone::Lightning => "LIGHTNING",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyTier {
    Basic,
    Medium,
    Hard,
}

// ── Knight ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Knight {
    pub body: Body,
    pub health: Health,
    pub facing: Facing,
    /// Frames until another swing may start.
    pub attack_cooldown: u32,
    pub swing: Option<Swing>,
    pub stones: Vec<Stone>,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub body: Body,
    pub health: Health,
    pub tier: EnemyTier,
    pub speed: f32,
    pub attack_cooldown: u32,
}

/// A boss fireball; travels horizontally only.
#[derive(Clone, Debug, PartialEq)]
pub struct Fireball {
    pub rect: Rect,
    pub vx: f32,
    pub damage: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub id: EntityId,
    /// 1..=3; stage 3 is the Demon King.
    pub stage: usize,
    pub body: Body,
    pub health: Health,
    pub speed: f32,
    /// Frames since the last attack.
    pub attack_timer: u32,
    pub fireballs: Vec<Fireball>,
}

impl Boss {
    pub fn name(&self) -> String {
        if self.stage == 3 {
            "Demon King".to_string()
        } else {
            format!("Boss Level {}", self.stage)
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct KnightState {
    pub screen: Screen,
    /// 1-based.
    pub level: usize,
    pub knight: Knight,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub platforms: Vec<Rect>,
    /// Shown during level transitions.
    pub banner: String,
    pub ids: IdGen,
    pub frame: u64,
}
