use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use arcade_cabinet::engine::{Body, Facing, Health, Rect, Screen};
use arcade_cabinet::input::{InputSnapshot, Intent, KeyTracker, HOLD_WINDOW, SLUG_KEYS};
use arcade_cabinet::slug::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn held(intent: Intent) -> InputSnapshot {
    InputSnapshot::default().with_held(intent)
}

fn run(mut s: SlugState, input: &InputSnapshot, frames: usize) -> SlugState {
    let mut rng = seeded_rng();
    for _ in 0..frames {
        s = update(&s, input, &mut rng);
    }
    s
}

/// A running mission emptied of everything but the player, who has landed.
fn range() -> SlugState {
    let mut s = start_game(&new_state());
    s.enemies.clear();
    s.pows.clear();
    s.crates.clear();
    s.tank = None;
    s.boss = None;
    run(s, &idle(), 15)
}

fn soldier(s: &mut SlugState, x: f32, kind: SoldierKind, hp: f32) -> Enemy {
    Enemy {
        id: s.ids.next_id(),
        kind,
        body: Body::new(x, GROUND_Y - 38.0, 26.0, 38.0),
        health: Health::new(hp),
        facing: Facing::Left,
        shoot_cooldown: 0,
        flash: 0,
    }
}

fn tank(s: &mut SlugState, x: f32) -> Tank {
    Tank {
        id: s.ids.next_id(),
        body: Body::new(x, GROUND_Y - 36.0, 56.0, 36.0),
        health: Health::new(100.0),
        facing: Facing::Right,
        cannon_cooldown: 0,
        occupied: false,
    }
}

fn weak_boss(s: &mut SlugState, x: f32) -> Boss {
    let mut health = Health::new(200.0);
    health.set_current(1.0);
    Boss {
        id: s.ids.next_id(),
        body: Body::new(x, GROUND_Y - 70.0, 80.0, 70.0),
        health,
        attack_cooldown: 0,
        flash: 0,
    }
}

fn bullet(x: f32, y: f32, vx: f32, damage: f32) -> Bullet {
    Bullet {
        rect: Rect::new(x, y, 6.0, 4.0),
        vx,
        damage,
        explosive: false,
    }
}

// ── setup ─────────────────────────────────────────────────────────────────────

#[test]
fn new_state_lays_out_mission_one() {
    let s = new_state();
    assert_eq!(s.screen, Screen::Title);
    assert_eq!(s.level, 1);
    assert_eq!(s.world_width, 4000.0);
    assert_eq!(s.enemies.len(), 8);
    assert_eq!(s.pows.len(), 3);
    assert_eq!(s.crates.len(), 3);
    assert!(s.tank.is_some());
    assert!(s.boss.is_some());
    assert_eq!(s.player.weapon, Weapon::Pistol);
}

#[test]
fn crates_rest_on_the_ground() {
    let s = new_state();
    assert!(s.crates.iter().all(|c| c.rect.bottom() == GROUND_Y));
}

#[test]
fn confirm_starts_a_fresh_run() {
    let mut rng = seeded_rng();
    let s = update(&new_state(), &idle().with_press(Intent::Confirm), &mut rng);
    assert_eq!(s.screen, Screen::Playing);
    assert_eq!(s.player.health.current(), 100.0);
    assert_eq!(s.player.grenades, 15);
}

// ── camera ────────────────────────────────────────────────────────────────────

#[test]
fn camera_follows_player_within_world() {
    let mut s = range();
    assert_eq!(camera_x(&s), 0.0);

    s.player.body.rect.x = 2000.0;
    assert_eq!(camera_x(&s), 2014.0 - VIEW_WIDTH / 2.0);

    s.player.body.rect.x = 3950.0;
    assert_eq!(camera_x(&s), 4000.0 - VIEW_WIDTH);
}

// ── movement ──────────────────────────────────────────────────────────────────

#[test]
fn player_lands_after_spawning() {
    let s = range();
    assert!(s.player.body.on_ground);
    assert_eq!(s.player.body.rect.bottom(), GROUND_Y);
}

#[test]
fn jump_needs_a_fresh_press() {
    let s = range();
    let airborne = run(s, &held(Intent::Jump), 1);
    assert!(airborne.player.body.vy < 0.0);

    let landed = run(airborne, &held(Intent::Jump), 60);
    assert!(landed.player.body.on_ground);
    assert_eq!(landed.player.body.vy, 0.0);

    let released = run(landed, &idle(), 1);
    let again = run(released, &held(Intent::Jump), 1);
    assert!(again.player.body.vy < 0.0);
}

#[test]
fn crouching_shrinks_player_and_blocks_fire() {
    let s = range();
    let input = idle().with_held(Intent::Down).with_held(Intent::Shoot);
    let s = run(s, &input, 3);
    assert!(s.player.crouching);
    assert!((s.player.body.rect.h - 42.0 * 0.6).abs() < 1e-3);
    assert!((s.player.body.rect.bottom() - GROUND_Y).abs() < 1e-3);
    assert!(s.player_bullets.is_empty());

    let standing = run(s, &idle(), 1);
    assert!(!standing.player.crouching);
    assert_eq!(standing.player.body.rect.h, 42.0);
}

// ── weapons ───────────────────────────────────────────────────────────────────

#[test]
fn pistol_respects_its_cooldown() {
    let s = range();
    let s = run(s, &held(Intent::Shoot), 8);
    assert_eq!(s.player_bullets.len(), 1);
    assert_eq!(s.player_bullets[0].damage, 8.0);
    assert!(s.player_bullets[0].vx > 0.0);

    let s = run(s, &held(Intent::Shoot), 1);
    assert_eq!(s.player_bullets.len(), 2);
}

#[test]
fn empty_heavy_weapon_falls_back_to_pistol() {
    let mut s = range();
    s.player.weapon = Weapon::HeavyMachineGun;
    s.player.ammo = 1;
    let s = run(s, &held(Intent::Shoot), 1);
    assert_eq!(s.player_bullets.len(), 1);
    assert_eq!(s.player_bullets[0].damage, 6.0);
    assert_eq!(s.player.ammo, 0);
    assert_eq!(s.player.weapon, Weapon::Pistol);
}

#[test]
fn rockets_are_explosive() {
    let mut s = range();
    s.player.weapon = Weapon::RocketLauncher;
    s.player.ammo = 5;
    let s = run(s, &held(Intent::Shoot), 1);
    assert!(s.player_bullets[0].explosive);
    assert_eq!(s.player_bullets[0].damage, 40.0);
    assert_eq!(s.player.ammo, 4);
}

#[test]
fn bullets_are_culled_past_the_world_edge() {
    let mut s = range();
    s.player_bullets.push(bullet(4045.0, 100.0, 12.0, 8.0));
    let s = run(s, &idle(), 1);
    assert!(s.player_bullets.is_empty());
}

#[test]
fn bullets_damage_enemies() {
    let mut s = range();
    let enemy = soldier(&mut s, 600.0, SoldierKind::Heavy, 30.0);
    s.enemies.push(enemy);
    s.player_bullets.push(bullet(590.0, 515.0, 12.0, 8.0));
    let s = run(s, &idle(), 1);
    assert!(s.player_bullets.is_empty());
    assert_eq!(s.enemies[0].health.current(), 22.0);
}

// ── grenades ──────────────────────────────────────────────────────────────────

#[test]
fn one_grenade_per_press() {
    let s = range();
    let before = s.player.grenades;
    let s = run(s, &held(Intent::Grenade), 2);
    assert_eq!(s.player.grenades, before - 1);
    assert_eq!(s.grenades.len(), 1);
    assert!(s.grenades[0].vx > 0.0);

    let s = run(s, &idle(), 60);
    assert!(s.grenades.is_empty());
    assert_eq!(s.player.health.current(), 100.0);
}

#[test]
fn explosion_hurts_everything_in_radius() {
    let mut rng = seeded_rng();
    let mut s = range();
    let enemy = soldier(&mut s, 600.0, SoldierKind::Heavy, 50.0);
    s.enemies.push(enemy);

    let (ex, ey) = s.enemies[0].body.rect.center();
    explode(&mut s, ex, ey, &mut rng);
    assert_eq!(s.enemies[0].health.current(), 15.0);
    assert_eq!(s.player.health.current(), 100.0);
    assert!(s.screen_shake >= 5);

    let (px, py) = s.player.body.rect.center();
    explode(&mut s, px, py, &mut rng);
    assert_eq!(s.player.health.current(), 80.0);
    assert_eq!(s.player.invincible, 90);

    explode(&mut s, px, py, &mut rng);
    assert_eq!(s.player.health.current(), 80.0);
}

// ── melee, POWs, crates ───────────────────────────────────────────────────────

#[test]
fn knife_hits_each_soldier_once_per_swing() {
    let mut s = range();
    let enemy = soldier(&mut s, 110.0, SoldierKind::Heavy, 30.0);
    s.enemies.push(enemy);

    let s = run(s, &held(Intent::Melee), 1);
    assert!(melee_hitbox(&s.player).is_some());
    assert_eq!(s.enemies[0].health.current(), 10.0);

    let s = run(s, &held(Intent::Melee), 5);
    assert_eq!(s.enemies[0].health.current(), 10.0);
}

#[test]
fn touching_a_prisoner_frees_them() {
    let mut s = range();
    let before = s.player.grenades;
    s.pows.push(Pow {
        id: s.ids.next_id(),
        rect: Rect::new(85.0, 505.0, 20.0, 28.0),
        rescued: false,
        bob: 0.0,
    });
    let s = run(s, &idle(), 1);
    assert!(s.pows[0].rescued);
    let rewarded = s.player.weapon != Weapon::Pistol || s.player.grenades == (before + 5).min(20);
    assert!(rewarded);
}

#[test]
fn knifed_crate_drops_a_weapon() {
    let mut s = range();
    s.crates.push(Crate {
        id: s.ids.next_id(),
        rect: Rect::new(110.0, GROUND_Y - 28.0, 32.0, 28.0),
        broken: false,
        has_item: true,
    });
    let mut s = run(s, &held(Intent::Melee), 1);
    assert!(s.crates[0].broken);
    assert_eq!(s.pickups.len(), 1);

    s.player.body.rect.x = 112.0;
    let s = run(s, &idle(), 1);
    assert!(s.pickups.is_empty());
    match s.player.weapon {
        Weapon::HeavyMachineGun => assert_eq!(s.player.ammo, 30),
        Weapon::RocketLauncher => assert_eq!(s.player.ammo, 5),
        Weapon::Pistol => panic!("pickup not collected"),
    }
}

#[test]
fn empty_crate_drops_nothing() {
    let mut s = range();
    s.crates.push(Crate {
        id: s.ids.next_id(),
        rect: Rect::new(110.0, GROUND_Y - 28.0, 32.0, 28.0),
        broken: false,
        has_item: false,
    });
    let s = run(s, &held(Intent::Melee), 1);
    assert!(s.crates[0].broken);
    assert!(s.pickups.is_empty());
}

// ── tank ──────────────────────────────────────────────────────────────────────

#[test]
fn mount_drive_and_dismount() {
    let mut s = range();
    let t = tank(&mut s, 90.0);
    s.tank = Some(t);

    let s = run(s, &idle().with_press(Intent::Mount), 1);
    assert!(s.player.in_tank);
    assert!(s.tank.as_ref().is_some_and(|t| t.occupied));

    let s = run(s, &held(Intent::Right), 1);
    let tank_x = s.tank.as_ref().map(|t| t.body.rect.x).unwrap_or_default();
    assert_eq!(tank_x, 95.0);
    assert_eq!(s.player.body.rect.x, tank_x + 8.0);

    let s = run(s, &idle().with_press(Intent::Mount), 1);
    let tank_right = s.tank.as_ref().map(|t| t.body.rect.right()).unwrap_or_default();
    assert!(!s.player.in_tank);
    assert_eq!(s.player.invincible, 30);
    assert!(s.player.body.rect.x >= tank_right);
}

#[test]
fn holding_mount_key_keeps_player_aboard() {
    let mut rng = seeded_rng();
    let mut s = range();
    let t = tank(&mut s, 90.0);
    s.tank = Some(t);

    let mut tracker = KeyTracker::new(SLUG_KEYS, HOLD_WINDOW);
    let e = KeyEvent::new_with_kind(
        KeyCode::Char('e'),
        KeyModifiers::NONE,
        KeyEventKind::Press,
    );
    let mut aboard = Vec::new();
    for _ in 0..6 {
        tracker.record(&e);
        s = update(&s, &tracker.snapshot(), &mut rng);
        aboard.push(s.player.in_tank);
    }
    assert_eq!(aboard, [true; 6]);
}

#[test]
fn mounted_tank_absorbs_enemy_fire() {
    let mut s = range();
    let t = tank(&mut s, 90.0);
    s.tank = Some(t);
    let mut s = run(s, &idle().with_press(Intent::Mount), 1);

    s.enemy_bullets.push(bullet(140.0, 520.0, -9.0, 8.0));
    let s = run(s, &idle(), 1);
    assert_eq!(s.player.health.current(), 100.0);
    assert_eq!(s.tank.as_ref().map(|t| t.health.current()), Some(92.0));
}

#[test]
fn destroyed_tank_ejects_player() {
    let mut rng = seeded_rng();
    let mut s = range();
    let t = tank(&mut s, 90.0);
    s.tank = Some(t);
    let mut s = run(s, &idle().with_press(Intent::Mount), 1);
    if let Some(t) = s.tank.as_mut() {
        t.health.set_current(10.0);
    }

    let (cx, cy) = s.tank.as_ref().map(|t| t.body.rect.center()).unwrap_or_default();
    explode(&mut s, cx, cy, &mut rng);
    assert!(!s.player.in_tank);
    assert_eq!(s.player.invincible, 60);
    assert_eq!(s.player.health.current(), 100.0);
    assert!(s.tank.as_ref().is_some_and(|t| !t.occupied && t.health.is_depleted()));
}

// ── outcome ───────────────────────────────────────────────────────────────────

#[test]
fn boss_kill_moves_to_next_mission_with_carry_over() {
    let mut s = range();
    let boss = weak_boss(&mut s, 300.0);
    s.boss = Some(boss);
    s.player.health.set_current(50.0);
    s.player.grenades = 18;
    s.player.weapon = Weapon::RocketLauncher;
    s.player.ammo = 3;
    s.player_bullets.push(bullet(290.0, 520.0, 12.0, 8.0));

    let s = run(s, &idle(), 1);
    assert!(s.boss.is_none());
    assert!(matches!(s.screen, Screen::LevelTransition { .. }));
    assert!(s.screen_shake > 0);

    let s = run(s, &idle(), 180);
    assert_eq!(s.screen, Screen::Playing);
    assert_eq!(s.level, 2);
    assert_eq!(s.world_width, 4500.0);
    assert_eq!(s.player.health.current(), 70.0);
    assert_eq!(s.player.grenades, 20);
    assert_eq!(s.player.weapon, Weapon::RocketLauncher);
    assert_eq!(s.player.ammo, 3);
}

#[test]
fn last_mission_boss_brings_victory() {
    let mut s = load_level(&range(), 2);
    s.enemies.clear();
    s.tank = None;
    let boss = weak_boss(&mut s, 300.0);
    s.boss = Some(boss);
    s.player_bullets.push(bullet(290.0, 520.0, 12.0, 8.0));

    let s = run(s, &idle(), 1);
    assert_eq!(s.screen, Screen::Victory);
}

#[test]
fn player_death_ends_the_run() {
    let mut s = range();
    s.player.health.set_current(5.0);
    s.enemy_bullets.push(bullet(100.0, 515.0, -9.0, 8.0));
    let s = run(s, &idle(), 1);
    assert_eq!(s.player.health.current(), 0.0);
    assert_eq!(s.screen, Screen::GameOver);
}

#[test]
fn soldiers_shoot_at_a_player_in_range() {
    let mut s = range();
    let enemy = soldier(&mut s, 300.0, SoldierKind::Rifleman, 15.0);
    s.enemies.push(enemy);
    let s = run(s, &idle(), 1);
    assert_eq!(s.enemy_bullets.len(), 1);
    assert!(s.enemy_bullets[0].vx < 0.0);
    assert_eq!(s.enemies[0].shoot_cooldown, 60);
}
