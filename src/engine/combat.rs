/// Health, facing and melee hitbox bookkeeping.

use std::collections::HashSet;

use crate::engine::geometry::Rect;

// ── Identity ──────────────────────────────────────────────────────────────────

/// Stable per-level handle so a swing can remember whom it already struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

#[derive(Clone, Debug, Default)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

// ── Facing ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing toward `target_x` from `from_x`; ties keep `self`.
    pub fn toward(self, from_x: f32, target_x: f32) -> Facing {
        if target_x > from_x {
            Facing::Right
        } else if target_x < from_x {
            Facing::Left
        } else {
            self
        }
    }
}

// ── Health ────────────────────────────────────────────────────────────────────

/// Hit points, always within `0..=max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// Returns `true` if this blow depleted the pool.
    pub fn damage(&mut self, amount: f32) -> bool {
        self.current = (self.current - amount).max(0.0);
        self.is_depleted()
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn set_current(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }
}

// ── Hitboxes ──────────────────────────────────────────────────────────────────

/// A `width`×`height` box on the facing side of `owner`, `y_offset` below its
/// top. `overlap` pulls the box back into the owner by that many units.
pub fn forward_hitbox(
    owner: &Rect,
    facing: Facing,
    width: f32,
    height: f32,
    y_offset: f32,
    overlap: f32,
) -> Rect {
    let x = match facing {
        Facing::Right => owner.right() - overlap,
        Facing::Left => owner.x - width + overlap,
    };
    Rect::new(x, owner.y + y_offset, width, height)
}

/// One attack window. Each target may be struck at most once per swing.
#[derive(Clone, Debug, PartialEq)]
pub struct Swing {
    frames_left: u32,
    struck: HashSet<EntityId>,
}

impl Swing {
    pub fn start(duration: u32) -> Self {
        Self {
            frames_left: duration,
            struck: HashSet::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }

    /// Records a hit on `id`; `false` means it was already struck this swing.
    pub fn strike(&mut self, id: EntityId) -> bool {
        self.is_active() && self.struck.insert(id)
    }

    pub fn tick(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
    }
}
