/// Per-frame kinematic step shared by every falling entity.
///
/// One call to [`Body::step`] is one tick: gravity, terminal-velocity clamp,
/// position integration, world-bounds clamp, then ground and platform-top
/// landing.

use crate::engine::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
    /// Added to `vy` every tick.
    pub gravity: f32,
    /// Maximum downward speed.
    pub terminal_velocity: f32,
    /// The ground line; bodies never sink below it.
    pub ground_y: f32,
    /// Horizontal extent of the world, starting at 0.
    pub world_width: f32,
    /// How far below a platform's bottom edge a falling body may be and still
    /// snap onto its top.
    pub landing_slack: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            vx: 0.0,
            vy: 0.0,
            on_ground: false,
        }
    }

    pub fn step(&mut self, params: &PhysicsParams, platforms: &[Rect]) {
        self.vy = (self.vy + params.gravity).min(params.terminal_velocity);
        self.rect.x += self.vx;
        self.rect.y += self.vy;

        self.clamp_to_world(params.world_width);

        self.on_ground = false;
        if self.rect.bottom() >= params.ground_y {
            self.rect.y = params.ground_y - self.rect.h;
            self.vy = 0.0;
            self.on_ground = true;
        }

        for platform in platforms {
            if self.vy > 0.0 && self.lands_on(platform, params.landing_slack) {
                self.rect.y = platform.y - self.rect.h;
                self.vy = 0.0;
                self.on_ground = true;
            }
        }
    }

    pub fn clamp_to_world(&mut self, world_width: f32) {
        let max_x = (world_width - self.rect.w).max(0.0);
        self.rect.x = self.rect.x.clamp(0.0, max_x);
    }

    fn lands_on(&self, platform: &Rect, slack: f32) -> bool {
        let bottom = self.rect.bottom();
        self.rect.overlaps_horizontally(platform)
            && bottom >= platform.y
            && bottom <= platform.bottom() + slack
    }
}
