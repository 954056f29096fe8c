/// Dragon Stones Knight frame.

use std::io::Write;

use crossterm::style::Color;

use super::{
    clear, fill, finish, flow_overlay, ground, health_bar, hint, hud, label, platforms, Viewport,
};
use crate::engine::{Facing, Screen};
use crate::knight::{
    damage_multiplier, has_all_stones, sword_hitbox, EnemyTier, KnightState, Stone, GROUND_Y,
    WORLD_HEIGHT, WORLD_WIDTH,
};

const C_KNIGHT: Color = Color::White;
const C_SWORD: Color = Color::Cyan;
const C_BOSS: Color = Color::Magenta;
const C_FIREBALL: Color = Color::Red;

fn tier_color(tier: EnemyTier) -> Color {
    match tier {
        EnemyTier::Basic => Color::Green,
        EnemyTier::Medium => Color::DarkYellow,
        EnemyTier::Hard => Color::Red,
    }
}

fn stone_color(stone: Stone) -> Color {
    match stone {
        Stone::Fire => Color::Red,
        Stone::Water => Color::Blue,
        Stone::Lightning => Color::Yellow,
    }
}

pub fn render_knight<W: Write>(
    out: &mut W,
    state: &KnightState,
    size: (u16, u16),
) -> std::io::Result<()> {
    clear(out)?;
    let vp = Viewport::new(size, 0.0, WORLD_WIDTH, WORLD_HEIGHT);

    ground(out, &vp, GROUND_Y, WORLD_HEIGHT)?;
    platforms(out, &vp, &state.platforms)?;

    for enemy in &state.enemies {
        fill(out, &vp, &enemy.body.rect, '█', tier_color(enemy.tier))?;
    }

    if let Some(boss) = &state.boss {
        fill(out, &vp, &boss.body.rect, '▓', C_BOSS)?;
        let bar = health_bar(boss.health.fraction(), 10);
        label(out, &vp, boss.body.rect.x, boss.body.rect.y - 20.0, &boss.name(), C_BOSS)?;
        label(out, &vp, boss.body.rect.x, boss.body.rect.y - 10.0, &bar, C_BOSS)?;
        for f in &boss.fireballs {
            fill(out, &vp, &f.rect, '●', C_FIREBALL)?;
        }
    }

    let k = &state.knight;
    fill(out, &vp, &k.body.rect, '█', C_KNIGHT)?;
    let (cx, _) = k.body.rect.center();
    let eye = match k.facing {
        Facing::Left => "◄",
        Facing::Right => "►",
    };
    label(out, &vp, cx, k.body.rect.y, eye, Color::Black)?;
    if let Some(sword) = sword_hitbox(k) {
        let glow = k.stones.last().map(|s| stone_color(*s)).unwrap_or(C_SWORD);
        fill(out, &vp, &sword, '─', glow)?;
    }

    let stones: Vec<&str> = k.stones.iter().map(|s| s.label()).collect();
    let left = format!(
        "HP {} {:>3.0}   Level {}",
        health_bar(k.health.fraction(), 20),
        k.health.current(),
        state.level
    );
    let right = format!(
        "Stones: {} x{:.1}",
        if stones.is_empty() { "-".to_string() } else { stones.join(" ") },
        damage_multiplier(&k.stones)
    );
    hud(out, &left, &right, size)?;
    hint(out, "← → / A D : Move   SPACE : Jump   X : Attack   P : Pause   Q : Menu", size)?;

    let banner = if state.screen == Screen::Victory && has_all_stones(&k.stones) {
        "All three Dragon Stones are yours"
    } else {
        state.banner.as_str()
    };
    flow_overlay(out, &state.screen, size, "DRAGON STONES KNIGHT", banner)?;
    finish(out, size)
}
