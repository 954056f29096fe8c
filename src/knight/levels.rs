/// Level layouts for Dragon Stones Knight.

use crate::engine::Rect;
use crate::knight::entities::EnemyTier;
use crate::knight::entities::EnemyTier::{Basic, Hard, Medium};

pub struct LevelLayout {
    pub platforms: &'static [Rect],
    /// Enemy spawn x and tier; enemies start standing on the ground.
    pub enemies: &'static [(f32, EnemyTier)],
    pub boss_x: f32,
}

pub static LEVELS: [LevelLayout; 3] = [
    LevelLayout {
        platforms: &[
            Rect::new(200.0, 400.0, 150.0, 20.0),
            Rect::new(500.0, 350.0, 150.0, 20.0),
            Rect::new(800.0, 300.0, 150.0, 20.0),
            Rect::new(1000.0, 400.0, 150.0, 20.0),
        ],
        enemies: &[(300.0, Basic), (600.0, Basic)],
        boss_x: 1100.0,
    },
    LevelLayout {
        platforms: &[
            Rect::new(150.0, 450.0, 120.0, 20.0),
            Rect::new(350.0, 380.0, 120.0, 20.0),
            Rect::new(550.0, 320.0, 120.0, 20.0),
            Rect::new(750.0, 380.0, 120.0, 20.0),
            Rect::new(950.0, 450.0, 120.0, 20.0),
            Rect::new(1050.0, 300.0, 120.0, 20.0),
        ],
        enemies: &[
            (250.0, Basic),
            (450.0, Medium),
            (650.0, Basic),
            (850.0, Medium),
        ],
        boss_x: 1100.0,
    },
    LevelLayout {
        platforms: &[
            Rect::new(100.0, 450.0, 100.0, 20.0),
            Rect::new(250.0, 400.0, 100.0, 20.0),
            Rect::new(400.0, 350.0, 100.0, 20.0),
            Rect::new(550.0, 400.0, 100.0, 20.0),
            Rect::new(700.0, 450.0, 100.0, 20.0),
            Rect::new(850.0, 350.0, 100.0, 20.0),
            Rect::new(1000.0, 400.0, 100.0, 20.0),
            Rect::new(1100.0, 300.0, 100.0, 20.0),
        ],
        enemies: &[
            (200.0, Basic),
            (350.0, Medium),
            (500.0, Hard),
            (650.0, Basic),
            (800.0, Medium),
            (950.0, Hard),
        ],
        boss_x: 1100.0,
    },
];

/// Layout for a 1-based level number; out-of-range numbers fall back to the
/// first level.
pub fn layout(level: usize) -> &'static LevelLayout {
    level
        .checked_sub(1)
        .and_then(|i| LEVELS.get(i))
        .unwrap_or(&LEVELS[0])
}
