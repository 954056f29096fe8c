/// Run & Gun frame: the view follows the camera and jitters while the
/// screen shakes.

use std::io::Write;

use crossterm::style::Color;

use super::{
    clear, fill, finish, flow_overlay, ground, health_bar, hint, hud, label, particles,
    platforms, Viewport,
};
use crate::slug::{
    camera_x, melee_hitbox, SlugState, SoldierKind, Weapon, GROUND_Y, VIEW_WIDTH, WORLD_HEIGHT,
};

const C_PLAYER: Color = Color::Cyan;
const C_PLAYER_HIT: Color = Color::White;
const C_RIFLEMAN: Color = Color::Green;
const C_HEAVY: Color = Color::DarkGreen;
const C_TANK: Color = Color::DarkCyan;
const C_BOSS: Color = Color::Magenta;
const C_BULLET_PLAYER: Color = Color::Yellow;
const C_BULLET_ENEMY: Color = Color::Red;
const C_POW: Color = Color::Yellow;
const C_CRATE: Color = Color::DarkYellow;

fn shake_offset(state: &SlugState) -> f32 {
    let amount = state.screen_shake as f32;
    if state.frame % 2 == 0 {
        amount
    } else {
        -amount
    }
}

pub fn render_slug<W: Write>(
    out: &mut W,
    state: &SlugState,
    size: (u16, u16),
) -> std::io::Result<()> {
    clear(out)?;
    let origin = camera_x(state) + shake_offset(state);
    let vp = Viewport::new(size, origin, VIEW_WIDTH, WORLD_HEIGHT);

    ground(out, &vp, GROUND_Y, WORLD_HEIGHT)?;
    platforms(out, &vp, &state.platforms)?;

    for c in state.crates.iter().filter(|c| !c.broken) {
        fill(out, &vp, &c.rect, '▦', C_CRATE)?;
    }
    for pow in state.pows.iter().filter(|p| !p.rescued) {
        let mut rect = pow.rect;
        rect.y += pow.bob.sin() * 3.0;
        fill(out, &vp, &rect, '☺', C_POW)?;
        label(out, &vp, rect.x, rect.y - 12.0, "HELP!", C_POW)?;
    }
    for pu in &state.pickups {
        let glyph = match pu.weapon {
            Weapon::HeavyMachineGun => "H",
            Weapon::RocketLauncher => "R",
            Weapon::Pistol => "P",
        };
        label(out, &vp, pu.rect.x, pu.rect.y, glyph, Color::Green)?;
    }

    if let Some(tank) = &state.tank {
        let color = if tank.health.is_depleted() { Color::DarkGrey } else { C_TANK };
        fill(out, &vp, &tank.body.rect, '▆', color)?;
        if !tank.health.is_depleted() && !tank.occupied {
            label(out, &vp, tank.body.rect.x, tank.body.rect.y - 12.0, "E: board", C_TANK)?;
        }
    }

    for enemy in &state.enemies {
        let color = match (enemy.flash > 0, enemy.kind) {
            (true, _) => Color::White,
            (false, SoldierKind::Rifleman) => C_RIFLEMAN,
            (false, SoldierKind::Heavy) => C_HEAVY,
        };
        fill(out, &vp, &enemy.body.rect, '█', color)?;
    }

    if let Some(boss) = &state.boss {
        let color = if boss.flash > 0 { Color::White } else { C_BOSS };
        fill(out, &vp, &boss.body.rect, '▓', color)?;
        let bar = health_bar(boss.health.fraction(), 12);
        label(out, &vp, boss.body.rect.x, boss.body.rect.y - 12.0, &bar, C_BOSS)?;
    }

    let p = &state.player;
    let blinking = p.invincible > 0 && (state.frame / 4) % 2 == 1;
    if !p.in_tank && !blinking {
        let color = if p.flash > 0 { C_PLAYER_HIT } else { C_PLAYER };
        let glyph = if p.crouching { '▄' } else { '█' };
        fill(out, &vp, &p.body.rect, glyph, color)?;
        if let Some(knife) = melee_hitbox(p) {
            fill(out, &vp, &knife, '─', Color::White)?;
        }
    }

    for b in &state.player_bullets {
        let glyph = if b.explosive { '»' } else { '-' };
        fill(out, &vp, &b.rect, glyph, C_BULLET_PLAYER)?;
    }
    for b in &state.enemy_bullets {
        fill(out, &vp, &b.rect, '•', C_BULLET_ENEMY)?;
    }
    for g in &state.grenades {
        label(out, &vp, g.x, g.y, "o", Color::DarkGreen)?;
    }
    particles(out, &vp, &state.particles)?;

    let ammo = match p.weapon {
        Weapon::Pistol => "∞".to_string(),
        _ => p.ammo.to_string(),
    };
    let left = format!(
        "HP {} {:>3.0}   Mission {}",
        health_bar(p.health.fraction(), 20),
        p.health.current(),
        state.level
    );
    let rescued = state.pows.iter().filter(|pw| pw.rescued).count();
    let right = format!(
        "{} [{}]   Grenades {}   POW {}/{}",
        p.weapon.label(),
        ammo,
        p.grenades,
        rescued,
        state.pows.len()
    );
    hud(out, &left, &right, size)?;
    hint(
        out,
        "←→ Move  SPACE Jump  ↓ Crouch  X Shoot  C Grenade  V Knife  E Tank  P Pause  Q Menu",
        size,
    )?;

    let banner = format!("MISSION {} COMPLETE", state.level);
    flow_overlay(out, &state.screen, size, "RUN & GUN", &banner)?;
    finish(out, size)
}
