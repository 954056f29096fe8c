/// Run & Gun game logic.
///
/// Same shape as the knight: `update` routes flow keys through the shared
/// screen machine and runs one simulation tick while playing. Every random
/// roll (particles, POW rewards, crate drops) goes through the injected RNG.

use rand::Rng;
use tracing::{debug, info};

use crate::engine::{
    advance, distance, finished_transition, forward_hitbox, spawn_burst, starts_new_run,
    update_particles, Body, EntityId, Facing, FlowEvent, Health, IdGen, PhysicsParams, Rect,
    Screen, Swing, Tint,
};
use crate::input::{InputSnapshot, Intent};
use crate::slug::entities::{
    Boss, Bullet, Crate, Enemy, Grenade, Player, Pow, SlugState, SoldierKind, Tank, Weapon,
    WeaponPickup,
};
use crate::slug::levels::{self, LEVELS};

// ── World ─────────────────────────────────────────────────────────────────────

pub const VIEW_WIDTH: f32 = 1200.0;
pub const WORLD_HEIGHT: f32 = 600.0;
pub const GROUND_Y: f32 = WORLD_HEIGHT - 60.0;

const GRAVITY: f32 = 0.7;
const LANDING_SLACK: f32 = 10.0;
const BULLET_MARGIN: f32 = 50.0;

fn physics(world_width: f32, terminal_velocity: f32) -> PhysicsParams {
    PhysicsParams {
        gravity: GRAVITY,
        terminal_velocity,
        ground_y: GROUND_Y,
        world_width,
        landing_slack: LANDING_SLACK,
    }
}

// ── Player tuning ─────────────────────────────────────────────────────────────

const PLAYER_W: f32 = 28.0;
const PLAYER_H: f32 = 42.0;
const CROUCH_RATIO: f32 = 0.6;
const PLAYER_SPEED: f32 = 6.0;
const PLAYER_TERMINAL: f32 = 16.0;
const JUMP_VELOCITY: f32 = -14.0;
const FRICTION: f32 = 0.8;
const CROUCH_FRICTION: f32 = 0.5;
const MIN_SPEED: f32 = 0.2;
const PLAYER_MAX_HP: f32 = 100.0;
const INVINCIBLE_FRAMES: u32 = 90;
const SPAWN_X: f32 = 80.0;

const START_GRENADES: u32 = 10;
const MAX_GRENADES: u32 = 20;
const LEVEL_HEAL: f32 = 20.0;
const LEVEL_GRENADES: u32 = 5;

const MELEE_FRAMES: u32 = 12;
const MELEE_COOLDOWN: u32 = 25;
const MELEE_REACH: f32 = 40.0;
const MELEE_DAMAGE: f32 = 20.0;

const GRENADE_THROW_VX: f32 = 6.0;
const GRENADE_THROW_VY: f32 = -10.0;
const GRENADE_GRAVITY: f32 = 0.4;
const GRENADE_FUSE: u32 = 90;
const BLAST_RADIUS: f32 = 60.0;

struct Gun {
    speed: f32,
    damage: f32,
    cooldown: u32,
    /// Bullet footprint is `4·size × 2·size`.
    size: f32,
}

const PISTOL: Gun = Gun {
    speed: 12.0,
    damage: 8.0,
    cooldown: 8,
    size: 1.0,
};
const HEAVY_MG: Gun = Gun {
    speed: 14.0,
    damage: 6.0,
    cooldown: 4,
    size: 2.0,
};
const ROCKET_SPEED: f32 = 11.0;
const ROCKET_DAMAGE: f32 = 40.0;
const ROCKET_COOLDOWN: u32 = 30;

// ── Enemy / vehicle tuning ────────────────────────────────────────────────────

const ENEMY_W: f32 = 26.0;
const ENEMY_H: f32 = 38.0;
const ENEMY_SPAWN_Y: f32 = 100.0;
const ENEMY_SPEED: f32 = 1.2;
const ENEMY_TERMINAL: f32 = 14.0;
const ENEMY_TURN_DISTANCE: f32 = 200.0;
const ENEMY_MIN_RANGE: f32 = 50.0;
const ENEMY_MAX_RANGE: f32 = 400.0;
const ENEMY_SHOOT_COOLDOWN: u32 = 60;
const ENEMY_BULLET_SPEED: f32 = 9.0;
const ENEMY_BULLET_DAMAGE: f32 = 8.0;

fn soldier_hp(kind: SoldierKind) -> f32 {
    match kind {
        SoldierKind::Rifleman => 15.0,
        SoldierKind::Heavy => 30.0,
    }
}

const TANK_W: f32 = 56.0;
const TANK_H: f32 = 36.0;
const TANK_HP: f32 = 100.0;
const TANK_SPEED: f32 = 5.0;
const TANK_TERMINAL: f32 = 12.0;
const TANK_CANNON_COOLDOWN: u32 = 25;
const TANK_SHELL_SPEED: f32 = 13.0;
const TANK_SHELL_DAMAGE: f32 = 25.0;
const DISMOUNT_INVINCIBLE: u32 = 30;
const EJECT_INVINCIBLE: u32 = 60;

const BOSS_W: f32 = 80.0;
const BOSS_H: f32 = 70.0;
const BOSS_HP: f32 = 200.0;
const BOSS_SPEED: f32 = 0.8;
const BOSS_ATTACK_COOLDOWN: u32 = 80;
const BOSS_BULLET_SPEED: f32 = 7.0;
const BOSS_BULLET_DAMAGE: f32 = 15.0;

const POW_W: f32 = 20.0;
const POW_H: f32 = 28.0;
const POW_HOVER: f32 = 60.0;
const CRATE_W: f32 = 32.0;
const CRATE_H: f32 = 28.0;
const PICKUP_SIZE: f32 = 24.0;

// ── Constructors ──────────────────────────────────────────────────────────────

fn fresh_player() -> Player {
    Player {
        body: Body::new(SPAWN_X, GROUND_Y - 50.0, PLAYER_W, PLAYER_H),
        health: Health::new(PLAYER_MAX_HP),
        facing: Facing::Right,
        crouching: false,
        weapon: Weapon::Pistol,
        ammo: 0,
        grenades: START_GRENADES,
        invincible: 0,
        flash: 0,
        shoot_cooldown: 0,
        melee: None,
        melee_cooldown: 0,
        in_tank: false,
        jump_latched: false,
        grenade_latched: false,
    }
}

fn spawn_enemy(id: EntityId, x: f32, kind: SoldierKind) -> Enemy {
    Enemy {
        id,
        kind,
        body: Body::new(x, ENEMY_SPAWN_Y, ENEMY_W, ENEMY_H),
        health: Health::new(soldier_hp(kind)),
        facing: Facing::Left,
        shoot_cooldown: 0,
        flash: 0,
    }
}

/// Title screen with mission 1 laid out behind it.
pub fn new_state() -> SlugState {
    let base = SlugState {
        screen: Screen::Title,
        level: 1,
        world_width: LEVELS[0].world_width,
        player: fresh_player(),
        enemies: Vec::new(),
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        grenades: Vec::new(),
        pows: Vec::new(),
        crates: Vec::new(),
        pickups: Vec::new(),
        tank: None,
        boss: None,
        platforms: Vec::new(),
        particles: Vec::new(),
        screen_shake: 0,
        ids: IdGen::default(),
        frame: 0,
    };
    load_level(&base, 1)
}

pub fn start_game(state: &SlugState) -> SlugState {
    info!("run & gun started");
    let fresh = SlugState {
        screen: Screen::Playing,
        player: fresh_player(),
        ..state.clone()
    };
    load_level(&fresh, 1)
}

/// Lays out mission `level`. The player carries HP (+20), grenades (+5),
/// weapon and ammo over from the previous state.
pub fn load_level(state: &SlugState, level: usize) -> SlugState {
    let level = if (1..=LEVELS.len()).contains(&level) {
        level
    } else {
        1
    };
    let layout = levels::layout(level);
    let mut ids = IdGen::default();

    let prev = &state.player;
    let mut player = fresh_player();
    player.health.set_current(prev.health.current() + LEVEL_HEAL);
    player.grenades = (prev.grenades + LEVEL_GRENADES).min(MAX_GRENADES);
    player.weapon = prev.weapon;
    player.ammo = prev.ammo;

    let enemies: Vec<Enemy> = layout
        .enemies
        .iter()
        .map(|&(x, kind)| spawn_enemy(ids.next_id(), x, kind))
        .collect();
    let pows = layout
        .pows
        .iter()
        .map(|&x| Pow {
            id: ids.next_id(),
            rect: Rect::new(x, GROUND_Y - POW_HOVER, POW_W, POW_H),
            rescued: false,
            bob: 0.0,
        })
        .collect();
    let crates = layout
        .crates
        .iter()
        .map(|&(x, has_item)| Crate {
            id: ids.next_id(),
            rect: Rect::new(x, GROUND_Y - CRATE_H, CRATE_W, CRATE_H),
            broken: false,
            has_item,
        })
        .collect();
    let tank = layout.tank_x.map(|x| Tank {
        id: ids.next_id(),
        body: Body::new(x, GROUND_Y - TANK_H, TANK_W, TANK_H),
        health: Health::new(TANK_HP),
        facing: Facing::Right,
        cannon_cooldown: 0,
        occupied: false,
    });
    let boss = layout.boss_x.map(|x| Boss {
        id: ids.next_id(),
        body: Body::new(x, GROUND_Y - BOSS_H, BOSS_W, BOSS_H),
        health: Health::new(BOSS_HP),
        attack_cooldown: 0,
        flash: 0,
    });

    info!(level, enemies = enemies.len(), "mission loaded");

    SlugState {
        level,
        world_width: layout.world_width,
        player,
        enemies,
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        grenades: Vec::new(),
        pows,
        crates,
        pickups: Vec::new(),
        tank,
        boss,
        platforms: layout.platforms.to_vec(),
        particles: Vec::new(),
        screen_shake: 0,
        ids,
        ..state.clone()
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// Left edge of the view: centred on the player (or the tank they drive),
/// clamped to the world.
pub fn camera_x(state: &SlugState) -> f32 {
    let focus = match state.tank.as_ref().filter(|t| t.occupied) {
        Some(tank) => tank.body.rect.center().0,
        None => state.player.body.rect.center().0,
    };
    let max = (state.world_width - VIEW_WIDTH).max(0.0);
    (focus - VIEW_WIDTH / 2.0).clamp(0.0, max)
}

pub fn melee_hitbox(player: &Player) -> Option<Rect> {
    if player.in_tank {
        return None;
    }
    player
        .melee
        .as_ref()
        .filter(|m| m.is_active())
        .map(|_| {
            forward_hitbox(
                &player.body.rect,
                player.facing,
                MELEE_REACH,
                player.body.rect.h - 15.0,
                10.0,
                10.0,
            )
        })
}

// ── Per-frame update ──────────────────────────────────────────────────────────

pub fn update(state: &SlugState, input: &InputSnapshot, rng: &mut impl Rng) -> SlugState {
    let mut next = state.clone();
    next.frame += 1;

    if input.pressed(Intent::Confirm) {
        let screen = advance(&next.screen, FlowEvent::Confirm);
        if starts_new_run(&next.screen, &screen) {
            return start_game(&next);
        }
        next.screen = screen;
    }
    if input.pressed(Intent::Pause) {
        next.screen = advance(&next.screen, FlowEvent::Pause);
    }

    match next.screen {
        Screen::Playing => simulate(next, input, rng),
        Screen::LevelTransition { .. } => {
            next.particles = update_particles(&next.particles);
            let after = advance(&next.screen, FlowEvent::Tick);
            if finished_transition(&next.screen, &after) {
                let mut loaded = load_level(&next, next.level + 1);
                loaded.screen = after;
                loaded
            } else {
                next.screen = after;
                next
            }
        }
        _ => next,
    }
}

fn simulate(mut s: SlugState, input: &InputSnapshot, rng: &mut impl Rng) -> SlugState {
    // ── 1. Player and vehicle ────────────────────────────────────────────────
    if !s.player.in_tank {
        step_player(&mut s, input, rng);
    }
    step_tank(&mut s, input);

    // ── 2. Hostiles ──────────────────────────────────────────────────────────
    let world_width = s.world_width;
    let target = (!s.player.in_tank).then(|| s.player.body.rect);
    for enemy in &mut s.enemies {
        if let Some(bullet) = step_enemy(enemy, target.as_ref(), world_width, &s.platforms) {
            s.enemy_bullets.push(bullet);
        }
    }
    for pow in &mut s.pows {
        pow.bob += 0.08;
    }
    if let Some(boss) = s.boss.as_mut() {
        if let Some(bullet) = step_boss(boss, target.as_ref(), world_width) {
            s.enemy_bullets.push(bullet);
        }
    }

    // ── 3. Melee, rescues, crates, pickups ───────────────────────────────────
    resolve_melee(&mut s, rng);
    collect_pickups(&mut s, rng);

    // ── 4. Projectiles ───────────────────────────────────────────────────────
    move_player_bullets(&mut s, rng);
    move_enemy_bullets(&mut s, rng);
    move_grenades(&mut s, rng);

    // ── 5. Purge the dead ────────────────────────────────────────────────────
    let mut debris = Vec::new();
    for e in s.enemies.iter().filter(|e| e.health.is_depleted()) {
        let (cx, cy) = e.body.rect.center();
        debris.extend(spawn_burst(rng, cx, cy, Tint::Blood, 10, 5.0));
    }
    s.particles.extend(debris);
    s.enemies.retain(|e| !e.health.is_depleted());

    let boss_down = s.boss.as_ref().is_some_and(|b| b.health.is_depleted());
    if boss_down {
        if let Some(boss) = s.boss.take() {
            let (cx, cy) = boss.body.rect.center();
            s.particles.extend(spawn_burst(rng, cx, cy, Tint::Fire, 25, 10.0));
        }
        s.screen_shake = 15;
    }

    let melee_over = match s.player.melee.as_mut() {
        Some(swing) => {
            swing.tick();
            !swing.is_active()
        }
        None => false,
    };
    if melee_over {
        s.player.melee = None;
    }

    s.particles = update_particles(&s.particles);
    s.screen_shake = s.screen_shake.saturating_sub(1);

    // ── 6. Outcome ───────────────────────────────────────────────────────────
    if s.player.health.is_depleted() {
        info!(level = s.level, "player down");
        s.screen = advance(&s.screen, FlowEvent::PlayerDown);
    } else if boss_down {
        let final_stage = s.level >= LEVELS.len();
        info!(level = s.level, final_stage, "mission boss destroyed");
        s.screen = advance(&s.screen, FlowEvent::StageCleared { final_stage });
    }
    s
}

// ── Player ────────────────────────────────────────────────────────────────────

fn set_crouch(player: &mut Player, crouch: bool) {
    if crouch == player.crouching {
        return;
    }
    let low = PLAYER_H * CROUCH_RATIO;
    let drop = PLAYER_H - low;
    if crouch {
        player.body.rect.y += drop;
        player.body.rect.h = low;
    } else {
        player.body.rect.y -= drop;
        player.body.rect.h = PLAYER_H;
    }
    player.crouching = crouch;
}

fn step_player(s: &mut SlugState, input: &InputSnapshot, rng: &mut impl Rng) {
    let world_width = s.world_width;
    let p = &mut s.player;
    p.invincible = p.invincible.saturating_sub(1);
    p.flash = p.flash.saturating_sub(1);

    set_crouch(p, input.held(Intent::Down) && p.body.on_ground);

    if !p.crouching {
        if input.held(Intent::Left) {
            p.body.vx = -PLAYER_SPEED;
            p.facing = Facing::Left;
        } else if input.held(Intent::Right) {
            p.body.vx = PLAYER_SPEED;
            p.facing = Facing::Right;
        } else {
            p.body.vx *= FRICTION;
        }
        if p.body.vx.abs() < MIN_SPEED {
            p.body.vx = 0.0;
        }
    } else {
        p.body.vx *= CROUCH_FRICTION;
    }

    let jump_held = input.held(Intent::Jump);
    if jump_held && p.body.on_ground && !p.jump_latched {
        p.body.vy = JUMP_VELOCITY;
        p.body.on_ground = false;
        p.jump_latched = true;
        let (cx, _) = p.body.rect.center();
        s.particles
            .extend(spawn_burst(rng, cx, p.body.rect.bottom(), Tint::Dust, 4, 2.0));
    }
    if !jump_held {
        p.jump_latched = false;
    }

    p.body
        .step(&physics(world_width, PLAYER_TERMINAL), &s.platforms);

    // Shooting
    p.shoot_cooldown = p.shoot_cooldown.saturating_sub(1);
    if input.held(Intent::Shoot) && !p.crouching && p.shoot_cooldown == 0 {
        if let Some(bullet) = fire(p) {
            s.player_bullets.push(bullet);
        }
    }

    // Grenade
    let grenade_held = input.held(Intent::Grenade);
    if grenade_held && p.grenades > 0 && !p.grenade_latched {
        let (cx, _) = p.body.rect.center();
        s.grenades.push(Grenade {
            x: cx,
            y: p.body.rect.bottom() - 10.0,
            vx: p.facing.sign() * GRENADE_THROW_VX,
            vy: GRENADE_THROW_VY,
            fuse: GRENADE_FUSE,
        });
        p.grenades -= 1;
        p.grenade_latched = true;
    }
    if !grenade_held {
        p.grenade_latched = false;
    }

    // Melee
    p.melee_cooldown = p.melee_cooldown.saturating_sub(1);
    let swinging = p.melee.as_ref().is_some_and(|m| m.is_active());
    if input.held(Intent::Melee) && p.melee_cooldown == 0 && !swinging {
        p.melee = Some(Swing::start(MELEE_FRAMES));
        p.melee_cooldown = MELEE_COOLDOWN;
    }
}

/// Fires the current weapon, spending ammo and falling back to the pistol
/// when a heavy weapon runs dry.
fn fire(p: &mut Player) -> Option<Bullet> {
    let rect = p.body.rect;
    let muzzle_y = rect.y + rect.h / 2.0;
    let bullet = match p.weapon {
        Weapon::Pistol => {
            p.shoot_cooldown = PISTOL.cooldown;
            gun_bullet(&PISTOL, &rect, p.facing, muzzle_y)
        }
        Weapon::HeavyMachineGun if p.ammo > 0 => {
            p.shoot_cooldown = HEAVY_MG.cooldown;
            p.ammo -= 1;
            gun_bullet(&HEAVY_MG, &rect, p.facing, muzzle_y)
        }
        Weapon::RocketLauncher if p.ammo > 0 => {
            p.shoot_cooldown = ROCKET_COOLDOWN;
            p.ammo -= 1;
            let x = match p.facing {
                Facing::Right => rect.right(),
                Facing::Left => rect.x - 16.0,
            };
            Bullet {
                rect: Rect::new(x, muzzle_y - 8.0, 16.0, 8.0),
                vx: p.facing.sign() * ROCKET_SPEED,
                damage: ROCKET_DAMAGE,
                explosive: true,
            }
        }
        _ => {
            p.weapon = Weapon::Pistol;
            return None;
        }
    };
    if p.weapon != Weapon::Pistol && p.ammo == 0 {
        p.weapon = Weapon::Pistol;
    }
    Some(bullet)
}

fn gun_bullet(gun: &Gun, shooter: &Rect, facing: Facing, muzzle_y: f32) -> Bullet {
    let x = match facing {
        Facing::Right => shooter.right(),
        Facing::Left => shooter.x,
    };
    Bullet {
        rect: Rect::new(x, muzzle_y - 2.0, gun.size * 4.0, gun.size * 2.0),
        vx: facing.sign() * gun.speed,
        damage: gun.damage,
        explosive: false,
    }
}

fn hurt_player(s: &mut SlugState, amount: f32, rng: &mut impl Rng) {
    let p = &mut s.player;
    if p.invincible > 0 {
        return;
    }
    p.health.damage(amount);
    p.invincible = INVINCIBLE_FRAMES;
    p.flash = 15;
    s.screen_shake = s.screen_shake.max(8);
    let (cx, cy) = p.body.rect.center();
    s.particles.extend(spawn_burst(rng, cx, cy, Tint::Blood, 12, 6.0));
}

// ── Tank ──────────────────────────────────────────────────────────────────────

fn step_tank(s: &mut SlugState, input: &InputSnapshot) {
    let world_width = s.world_width;
    let Some(tank) = s.tank.as_mut() else {
        return;
    };
    let p = &mut s.player;

    if !tank.occupied {
        let can_mount = !p.in_tank
            && !tank.health.is_depleted()
            && input.pressed(Intent::Mount)
            && p.body.rect.overlaps(&tank.body.rect);
        if can_mount {
            debug!("player mounted tank");
            set_crouch(p, false);
            tank.occupied = true;
            p.in_tank = true;
            p.melee = None;
        }
        return;
    }

    if input.held(Intent::Left) {
        tank.body.vx = -TANK_SPEED;
        tank.facing = Facing::Left;
    } else if input.held(Intent::Right) {
        tank.body.vx = TANK_SPEED;
        tank.facing = Facing::Right;
    } else {
        tank.body.vx *= FRICTION;
    }
    if tank.body.vx.abs() < MIN_SPEED {
        tank.body.vx = 0.0;
    }
    tank.body
        .step(&physics(world_width, TANK_TERMINAL), &s.platforms);

    tank.cannon_cooldown = tank.cannon_cooldown.saturating_sub(1);
    if input.held(Intent::Shoot) && tank.cannon_cooldown == 0 {
        tank.cannon_cooldown = TANK_CANNON_COOLDOWN;
        let r = tank.body.rect;
        let x = match tank.facing {
            Facing::Right => r.right() - 8.0,
            Facing::Left => r.x - 20.0,
        };
        s.player_bullets.push(Bullet {
            rect: Rect::new(x, r.y + r.h / 2.0 - 6.0, 20.0, 12.0),
            vx: tank.facing.sign() * TANK_SHELL_SPEED,
            damage: TANK_SHELL_DAMAGE,
            explosive: true,
        });
    }

    let r = tank.body.rect;
    if input.pressed(Intent::Mount) {
        debug!("player left tank");
        tank.occupied = false;
        p.in_tank = false;
        p.body.rect.x = match tank.facing {
            Facing::Right => r.right() + 5.0,
            Facing::Left => r.x - p.body.rect.w - 5.0,
        };
        p.body.rect.y = r.bottom() - p.body.rect.h;
        p.body.vx = 0.0;
        p.body.vy = 0.0;
        p.body.clamp_to_world(world_width);
        p.invincible = DISMOUNT_INVINCIBLE;
    } else {
        p.body.rect.x = r.x + 8.0;
        p.body.rect.y = r.y + 4.0;
        p.body.vx = 0.0;
        p.body.vy = 0.0;
    }
}

fn hurt_tank(s: &mut SlugState, amount: f32, rng: &mut impl Rng) {
    let Some(tank) = s.tank.as_mut() else {
        return;
    };
    if tank.health.is_depleted() || !tank.health.damage(amount) {
        return;
    }
    let r = tank.body.rect;
    let (cx, cy) = r.center();
    if tank.occupied {
        info!("tank destroyed with player inside");
        tank.occupied = false;
        let p = &mut s.player;
        p.in_tank = false;
        p.body.rect.x = cx - p.body.rect.w / 2.0;
        p.body.rect.y = r.y - p.body.rect.h;
        p.invincible = EJECT_INVINCIBLE;
    }
    s.particles.extend(spawn_burst(rng, cx, cy, Tint::Fire, 20, 8.0));
}

// ── Hostiles ──────────────────────────────────────────────────────────────────

/// Walks, falls and maybe shoots at `target` (the player on foot).
fn step_enemy(
    enemy: &mut Enemy,
    target: Option<&Rect>,
    world_width: f32,
    platforms: &[Rect],
) -> Option<Bullet> {
    let (ex, _) = enemy.body.rect.center();
    let dx = target.map(|t| t.center().0 - ex).unwrap_or(0.0);
    if dx.abs() > ENEMY_TURN_DISTANCE {
        enemy.facing = enemy.facing.toward(ex, ex + dx);
    }
    enemy.body.vx = enemy.facing.sign() * ENEMY_SPEED;
    enemy
        .body
        .step(&physics(world_width, ENEMY_TERMINAL), platforms);
    enemy.flash = enemy.flash.saturating_sub(1);

    enemy.shoot_cooldown = enemy.shoot_cooldown.saturating_sub(1);
    let in_range = dx.abs() > ENEMY_MIN_RANGE && dx.abs() < ENEMY_MAX_RANGE;
    if target.is_none() || enemy.shoot_cooldown > 0 || !in_range {
        return None;
    }
    enemy.shoot_cooldown = ENEMY_SHOOT_COOLDOWN;
    let r = enemy.body.rect;
    let x = match enemy.facing {
        Facing::Right => r.right(),
        Facing::Left => r.x,
    };
    Some(Bullet {
        rect: Rect::new(x, r.y + r.h / 2.0 - 2.0, 6.0, 4.0),
        vx: enemy.facing.sign() * ENEMY_BULLET_SPEED,
        damage: ENEMY_BULLET_DAMAGE,
        explosive: false,
    })
}

fn hurt_enemy(enemy: &mut Enemy, amount: f32) {
    enemy.health.damage(amount);
    enemy.flash = 5;
}

fn step_boss(boss: &mut Boss, target: Option<&Rect>, world_width: f32) -> Option<Bullet> {
    let dx = target.map(|t| t.x - boss.body.rect.x).unwrap_or(0.0);
    boss.body.vx = if dx > 0.0 { BOSS_SPEED } else { -BOSS_SPEED };
    boss.body.step(&physics(world_width, PLAYER_TERMINAL), &[]);
    boss.flash = boss.flash.saturating_sub(1);

    boss.attack_cooldown = boss.attack_cooldown.saturating_sub(1);
    let target = target?;
    if boss.attack_cooldown > 0 {
        return None;
    }
    boss.attack_cooldown = BOSS_ATTACK_COOLDOWN;
    let dir = if target.x > boss.body.rect.x { 1.0 } else { -1.0 };
    let (cx, _) = boss.body.rect.center();
    Some(Bullet {
        rect: Rect::new(cx, boss.body.rect.y + 30.0, 14.0, 10.0),
        vx: dir * BOSS_BULLET_SPEED,
        damage: BOSS_BULLET_DAMAGE,
        explosive: false,
    })
}

fn hurt_boss(boss: &mut Boss, amount: f32) {
    boss.health.damage(amount);
    boss.flash = 6;
}

// ── Melee and pickups ─────────────────────────────────────────────────────────

fn resolve_melee(s: &mut SlugState, rng: &mut impl Rng) {
    let hitbox = melee_hitbox(&s.player);

    if let (Some(hitbox), Some(swing)) = (hitbox, s.player.melee.as_mut()) {
        for enemy in &mut s.enemies {
            if !enemy.health.is_depleted()
                && hitbox.overlaps(&enemy.body.rect)
                && swing.strike(enemy.id)
            {
                hurt_enemy(enemy, MELEE_DAMAGE);
            }
        }
    }

    let player_rect = s.player.body.rect;
    for i in 0..s.pows.len() {
        let pow_rect = s.pows[i].rect;
        let touched = player_rect.overlaps(&pow_rect)
            || hitbox.is_some_and(|h| h.overlaps(&pow_rect));
        if !s.pows[i].rescued && touched {
            s.pows[i].rescued = true;
            reward_rescue(&mut s.player, rng);
            let (cx, cy) = pow_rect.center();
            s.particles.extend(spawn_burst(rng, cx, cy, Tint::Gold, 8, 4.0));
        }
    }

    let Some(hitbox) = hitbox else {
        return;
    };
    for i in 0..s.crates.len() {
        let c = &s.crates[i];
        if c.broken || !hitbox.overlaps(&c.rect) {
            continue;
        }
        let rect = c.rect;
        let has_item = c.has_item;
        s.crates[i].broken = true;
        let (cx, cy) = rect.center();
        s.particles.extend(spawn_burst(rng, cx, cy, Tint::Debris, 6, 4.0));
        if has_item {
            let (weapon, ammo) = if rng.gen_bool(0.5) {
                (Weapon::HeavyMachineGun, 30)
            } else {
                (Weapon::RocketLauncher, 5)
            };
            s.pickups.push(WeaponPickup {
                rect: Rect::new(rect.x, rect.y, PICKUP_SIZE, PICKUP_SIZE),
                weapon,
                ammo,
            });
        }
    }
}

fn reward_rescue(player: &mut Player, rng: &mut impl Rng) {
    let roll: f32 = rng.gen();
    if roll < 0.4 {
        player.weapon = Weapon::HeavyMachineGun;
        player.ammo = 50;
    } else if roll < 0.7 {
        player.weapon = Weapon::RocketLauncher;
        player.ammo = 5;
    } else {
        player.grenades = (player.grenades + 5).min(MAX_GRENADES);
    }
    debug!(weapon = player.weapon.label(), ammo = player.ammo, "prisoner rescued");
}

fn collect_pickups(s: &mut SlugState, rng: &mut impl Rng) {
    if s.player.in_tank {
        return;
    }
    let player_rect = s.player.body.rect;
    let (taken, left): (Vec<WeaponPickup>, Vec<WeaponPickup>) = std::mem::take(&mut s.pickups)
        .into_iter()
        .partition(|pu| player_rect.overlaps(&pu.rect));
    s.pickups = left;
    for pu in taken {
        s.player.weapon = pu.weapon;
        s.player.ammo = pu.ammo;
        let (cx, cy) = pu.rect.center();
        s.particles.extend(spawn_burst(rng, cx, cy, Tint::Green, 6, 3.0));
        debug!(weapon = pu.weapon.label(), "weapon picked up");
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

fn in_flight(b: &Bullet, world_width: f32) -> bool {
    b.rect.x > -BULLET_MARGIN && b.rect.x < world_width + BULLET_MARGIN
}

/// Applies `b` to the first thing it touches. Returns `true` if spent.
fn player_bullet_hits(s: &mut SlugState, b: &Bullet, rng: &mut impl Rng) -> bool {
    if let Some(enemy) = s
        .enemies
        .iter_mut()
        .find(|e| !e.health.is_depleted() && b.rect.overlaps(&e.body.rect))
    {
        hurt_enemy(enemy, b.damage);
        return true;
    }
    if let Some(boss) = s.boss.as_mut() {
        if !boss.health.is_depleted() && b.rect.overlaps(&boss.body.rect) {
            hurt_boss(boss, b.damage);
            return true;
        }
    }
    let hits_empty_tank = s.tank.as_ref().is_some_and(|t| {
        !t.health.is_depleted() && !t.occupied && b.rect.overlaps(&t.body.rect)
    });
    if hits_empty_tank {
        hurt_tank(s, b.damage, rng);
        return true;
    }
    false
}

fn move_player_bullets(s: &mut SlugState, rng: &mut impl Rng) {
    let world_width = s.world_width;
    let mut survivors = Vec::new();
    for mut b in std::mem::take(&mut s.player_bullets) {
        b.rect.x += b.vx;
        if !in_flight(&b, world_width) {
            continue;
        }
        if player_bullet_hits(s, &b, rng) {
            if b.explosive {
                s.particles
                    .extend(spawn_burst(rng, b.rect.x, b.rect.y, Tint::Fire, 8, 5.0));
            }
            continue;
        }
        survivors.push(b);
    }
    s.player_bullets = survivors;
}

fn move_enemy_bullets(s: &mut SlugState, rng: &mut impl Rng) {
    let world_width = s.world_width;
    let mut survivors = Vec::new();
    for mut b in std::mem::take(&mut s.enemy_bullets) {
        b.rect.x += b.vx;
        if !in_flight(&b, world_width) {
            continue;
        }
        if !s.player.in_tank && b.rect.overlaps(&s.player.body.rect) {
            hurt_player(s, b.damage, rng);
            continue;
        }
        let hits_tank = s
            .tank
            .as_ref()
            .is_some_and(|t| t.occupied && b.rect.overlaps(&t.body.rect));
        if hits_tank {
            hurt_tank(s, b.damage, rng);
            continue;
        }
        survivors.push(b);
    }
    s.enemy_bullets = survivors;
}

fn move_grenades(s: &mut SlugState, rng: &mut impl Rng) {
    let mut live = Vec::new();
    for mut g in std::mem::take(&mut s.grenades) {
        g.x += g.vx;
        g.y += g.vy;
        g.vy += GRENADE_GRAVITY;
        g.fuse = g.fuse.saturating_sub(1);
        if g.fuse == 0 || g.y >= GROUND_Y - 5.0 {
            explode(s, g.x, g.y, rng);
        } else {
            live.push(g);
        }
    }
    s.grenades = live;
}

/// Grenade blast: damages everything whose centre lies within the radius.
pub fn explode(s: &mut SlugState, x: f32, y: f32, rng: &mut impl Rng) {
    let at = (x, y);
    s.particles.extend(spawn_burst(rng, x, y, Tint::Fire, 25, 10.0));
    s.screen_shake = s.screen_shake.max(5);

    for enemy in &mut s.enemies {
        if distance(enemy.body.rect.center(), at) < BLAST_RADIUS {
            hurt_enemy(enemy, 35.0);
        }
    }
    if let Some(boss) = s.boss.as_mut() {
        if !boss.health.is_depleted() && distance(boss.body.rect.center(), at) < BLAST_RADIUS {
            hurt_boss(boss, 40.0);
        }
    }
    let tank_caught = s.tank.as_ref().is_some_and(|t| {
        !t.health.is_depleted() && distance(t.body.rect.center(), at) < BLAST_RADIUS
    });
    if tank_caught {
        hurt_tank(s, 30.0, rng);
    }
    if !s.player.in_tank && distance(s.player.body.rect.center(), at) < BLAST_RADIUS {
        hurt_player(s, 20.0, rng);
    }
}
