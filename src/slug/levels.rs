/// Mission layouts for Run & Gun.

use crate::engine::Rect;
use crate::slug::entities::SoldierKind;
use crate::slug::entities::SoldierKind::{Heavy, Rifleman};

pub struct LevelLayout {
    pub world_width: f32,
    pub platforms: &'static [Rect],
    /// Enemies drop in from this x, high above the ground.
    pub enemies: &'static [(f32, SoldierKind)],
    pub pows: &'static [f32],
    /// Crate x and whether it hides a weapon.
    pub crates: &'static [(f32, bool)],
    pub tank_x: Option<f32>,
    pub boss_x: Option<f32>,
}

pub static LEVELS: [LevelLayout; 2] = [
    LevelLayout {
        world_width: 4000.0,
        platforms: &[
            Rect::new(300.0, 450.0, 120.0, 18.0),
            Rect::new(600.0, 400.0, 120.0, 18.0),
            Rect::new(1000.0, 450.0, 120.0, 18.0),
            Rect::new(1400.0, 380.0, 120.0, 18.0),
            Rect::new(2000.0, 450.0, 120.0, 18.0),
            Rect::new(2600.0, 400.0, 120.0, 18.0),
            Rect::new(3200.0, 450.0, 120.0, 18.0),
        ],
        enemies: &[
            (400.0, Rifleman),
            (700.0, Rifleman),
            (1100.0, Rifleman),
            (1500.0, Heavy),
            (2100.0, Rifleman),
            (2400.0, Rifleman),
            (2700.0, Heavy),
            (3300.0, Rifleman),
        ],
        pows: &[500.0, 1200.0, 2200.0],
        crates: &[(350.0, true), (800.0, false), (1600.0, true)],
        tank_x: Some(1800.0),
        boss_x: Some(3700.0),
    },
    LevelLayout {
        world_width: 4500.0,
        platforms: &[
            Rect::new(200.0, 460.0, 100.0, 18.0),
            Rect::new(500.0, 400.0, 100.0, 18.0),
            Rect::new(900.0, 460.0, 100.0, 18.0),
            Rect::new(1300.0, 350.0, 100.0, 18.0),
            Rect::new(1800.0, 460.0, 100.0, 18.0),
            Rect::new(2200.0, 400.0, 100.0, 18.0),
            Rect::new(2700.0, 460.0, 100.0, 18.0),
            Rect::new(3100.0, 380.0, 100.0, 18.0),
            Rect::new(3600.0, 460.0, 100.0, 18.0),
        ],
        enemies: &[
            (350.0, Rifleman),
            (600.0, Heavy),
            (1000.0, Rifleman),
            (1400.0, Rifleman),
            (1900.0, Heavy),
            (2300.0, Rifleman),
            (2800.0, Heavy),
            (3200.0, Rifleman),
            (3500.0, Heavy),
        ],
        pows: &[700.0, 1700.0, 2900.0],
        crates: &[(450.0, true), (1100.0, true), (2500.0, false)],
        tank_x: Some(2000.0),
        boss_x: Some(4200.0),
    },
];

/// Layout for a 1-based mission number; unknown numbers fall back to the
/// first mission.
pub fn layout(level: usize) -> &'static LevelLayout {
    level
        .checked_sub(1)
        .and_then(|i| LEVELS.get(i))
        .unwrap_or(&LEVELS[0])
}
