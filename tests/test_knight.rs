use arcade_cabinet::engine::{Body, Health, Screen};
use arcade_cabinet::input::{InputSnapshot, Intent};
use arcade_cabinet::knight::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn attack() -> InputSnapshot {
    InputSnapshot::default().with_held(Intent::Attack)
}

/// A running game with no enemies and the boss parked at the far end.
fn arena() -> KnightState {
    let mut s = start_game(&new_state());
    s.enemies.clear();
    s
}

fn enemy_at(s: &mut KnightState, x: f32, hp: f32) -> Enemy {
    Enemy {
        id: s.ids.next_id(),
        body: Body::new(x, GROUND_Y - 40.0, 35.0, 40.0),
        health: Health::new(hp),
        tier: EnemyTier::Hard,
        speed: 2.5,
        attack_cooldown: 0,
    }
}

// ── setup ─────────────────────────────────────────────────────────────────────

#[test]
fn new_state_waits_on_title_with_level_one() {
    let s = new_state();
    assert_eq!(s.screen, Screen::Title);
    assert_eq!(s.level, 1);
    assert_eq!(s.enemies.len(), 2);
    let boss = s.boss.as_ref().expect("level 1 has a boss");
    assert_eq!(boss.health.max(), 50.0);
    assert_eq!(boss.name(), "Boss Level 1");
}

#[test]
fn confirm_on_title_starts_a_run() {
    let mut rng = seeded_rng();
    let s = update(&new_state(), &idle().with_press(Intent::Confirm), &mut rng);
    assert_eq!(s.screen, Screen::Playing);
    assert_eq!(s.knight.health.current(), 100.0);
    assert!(s.knight.stones.is_empty());
}

#[test]
fn level_three_boss_is_the_demon_king() {
    let s = load_level(&arena(), 3);
    let boss = s.boss.as_ref().expect("boss");
    assert_eq!(boss.name(), "Demon King");
    assert_eq!(boss.health.max(), 200.0);
    assert_eq!(boss.body.rect.w, 80.0);
    assert_eq!(s.enemies.len(), 6);
}

#[test]
fn unknown_level_loads_level_one() {
    let s = load_level(&arena(), 9);
    assert_eq!(s.level, 1);
}

#[test]
fn level_load_heals_after_the_first() {
    let mut s = arena();
    s.knight.health.set_current(50.0);
    s.knight.stones.push(Stone::Fire);
    let next = load_level(&s, 2);
    assert_eq!(next.knight.health.current(), 80.0);
    assert_eq!(next.knight.stones, vec![Stone::Fire]);
    assert_eq!(next.knight.body.rect.x, 50.0);

    s.knight.health.set_current(90.0);
    assert_eq!(load_level(&s, 2).knight.health.current(), 100.0);
}

// ── stones ────────────────────────────────────────────────────────────────────

#[test]
fn strongest_stone_sets_multiplier() {
    assert_eq!(damage_multiplier(&[]), 1.0);
    assert_eq!(damage_multiplier(&[Stone::Fire]), 1.5);
    assert_eq!(damage_multiplier(&[Stone::Fire, Stone::Water]), 2.0);
    assert_eq!(damage_multiplier(&[Stone::Lightning, Stone::Fire]), 2.5);
}

#[test]
fn all_stones_needs_every_kind() {
    assert!(!has_all_stones(&[Stone::Fire, Stone::Water]));
    assert!(has_all_stones(&[Stone::Water, Stone::Lightning, Stone::Fire]));
}

// ── sword ─────────────────────────────────────────────────────────────────────

#[test]
fn one_swing_hits_an_enemy_once() {
    let mut rng = seeded_rng();
    let mut s = arena();
    let enemy = enemy_at(&mut s, 100.0, 100.0);
    s.enemies.push(enemy);

    s = update(&s, &attack(), &mut rng);
    assert!(sword_hitbox(&s.knight).is_some());
    assert_eq!(s.enemies[0].health.current(), 75.0);

    for _ in 0..10 {
        s = update(&s, &attack(), &mut rng);
    }
    assert_eq!(s.enemies[0].health.current(), 75.0);
}

#[test]
fn water_stone_knocks_enemies_back() {
    let mut rng = seeded_rng();
    let mut s = arena();
    s.knight.stones = vec![Stone::Water];
    let enemy = enemy_at(&mut s, 100.0, 200.0);
    s.enemies.push(enemy);

    s = update(&s, &attack(), &mut rng);
    assert_eq!(s.enemies[0].health.current(), 150.0);
    assert!(s.enemies[0].body.rect.x > 120.0);
}

#[test]
fn chain_lightning_arcs_to_nearby_enemies_only() {
    let mut s = arena();
    let mut enemies = vec![
        enemy_at(&mut s, 100.0, 50.0),
        enemy_at(&mut s, 150.0, 50.0),
        enemy_at(&mut s, 400.0, 50.0),
    ];
    chain_lightning(&mut enemies, 0, 40.0);
    assert_eq!(enemies[0].health.current(), 50.0);
    assert_eq!(enemies[1].health.current(), 30.0);
    assert_eq!(enemies[2].health.current(), 50.0);
}

#[test]
fn killed_enemies_are_removed() {
    let mut rng = seeded_rng();
    let mut s = arena();
    let enemy = enemy_at(&mut s, 100.0, 20.0);
    s.enemies.push(enemy);
    s = update(&s, &attack(), &mut rng);
    assert!(s.enemies.is_empty());
}

// ── boss & outcome ────────────────────────────────────────────────────────────

#[test]
fn boss_defeat_awards_stone_and_starts_transition() {
    let mut rng = seeded_rng();
    let mut s = arena();
    s.knight.health.set_current(50.0);
    if let Some(boss) = s.boss.as_mut() {
        boss.body.rect.x = 100.0;
        boss.health.set_current(1.0);
    }

    s = update(&s, &attack(), &mut rng);
    assert!(s.boss.is_none());
    assert_eq!(s.knight.stones, vec![Stone::Fire]);
    assert!(s.banner.contains("FIRE"));
    assert!(matches!(s.screen, Screen::LevelTransition { .. }));

    for _ in 0..179 {
        s = update(&s, &idle(), &mut rng);
    }
    assert!(matches!(s.screen, Screen::LevelTransition { .. }));
    assert_eq!(s.level, 1);

    s = update(&s, &idle(), &mut rng);
    assert_eq!(s.screen, Screen::Playing);
    assert_eq!(s.level, 2);
    assert_eq!(s.knight.health.current(), 80.0);
    assert!(s.boss.is_some());
}

#[test]
fn final_boss_brings_victory() {
    let mut rng = seeded_rng();
    let mut s = load_level(&arena(), 3);
    s.enemies.clear();
    s.knight.stones = vec![Stone::Fire, Stone::Water];
    if let Some(boss) = s.boss.as_mut() {
        boss.body.rect.x = 100.0;
        boss.health.set_current(1.0);
    }

    s = update(&s, &attack(), &mut rng);
    assert_eq!(s.screen, Screen::Victory);
    assert!(has_all_stones(&s.knight.stones));
}

#[test]
fn knight_death_ends_the_run() {
    let mut rng = seeded_rng();
    let mut s = arena();
    s.knight.health.set_current(5.0);
    let enemy = enemy_at(&mut s, 80.0, 50.0);
    s.enemies.push(enemy);

    s = update(&s, &idle(), &mut rng);
    assert_eq!(s.knight.health.current(), 0.0);
    assert_eq!(s.screen, Screen::GameOver);

    let restarted = update(&s, &idle().with_press(Intent::Confirm), &mut rng);
    assert_eq!(restarted.screen, Screen::Playing);
    assert_eq!(restarted.knight.health.current(), 100.0);
}

#[test]
fn death_wins_over_simultaneous_boss_kill() {
    let mut rng = seeded_rng();
    let mut s = arena();
    s.knight.health.set_current(5.0);
    let enemy = enemy_at(&mut s, 80.0, 500.0);
    s.enemies.push(enemy);
    if let Some(boss) = s.boss.as_mut() {
        boss.body.rect.x = 100.0;
        boss.health.set_current(1.0);
    }

    s = update(&s, &attack(), &mut rng);
    assert_eq!(s.screen, Screen::GameOver);
}

#[test]
fn boss_throws_fireballs_at_a_distant_knight() {
    let mut rng = seeded_rng();
    let mut s = arena();
    if let Some(boss) = s.boss.as_mut() {
        boss.attack_timer = 150;
    }
    s = update(&s, &idle(), &mut rng);
    let boss = s.boss.as_ref().expect("boss");
    assert_eq!(boss.fireballs.len(), 1);
    assert!(boss.fireballs[0].vx < 0.0);
    assert_eq!(boss.attack_timer, 0);
}

#[test]
fn paused_game_does_not_advance() {
    let mut rng = seeded_rng();
    let s = arena();
    let paused = update(&s, &idle().with_press(Intent::Pause), &mut rng);
    assert_eq!(paused.screen, Screen::Paused);

    let held = update(&paused, &idle().with_held(Intent::Right), &mut rng);
    assert_eq!(held.knight.body.rect.x, paused.knight.body.rect.x);

    let resumed = update(&held, &idle().with_press(Intent::Pause), &mut rng);
    assert_eq!(resumed.screen, Screen::Playing);
}

#[test]
fn knight_walks_and_faces_right() {
    let mut rng = seeded_rng();
    let s = update(&arena(), &idle().with_held(Intent::Right), &mut rng);
    assert_eq!(s.knight.body.rect.x, 54.0);
    assert_eq!(s.knight.facing, arcade_cabinet::engine::Facing::Right);
}
