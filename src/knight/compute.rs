/// Dragon Stones Knight game logic.
///
/// `update` is the only per-frame entry point: it routes flow keys through
/// the shared screen machine, then runs one simulation tick while playing.
/// Randomness (chain lightning) comes through the injected RNG.

use rand::Rng;
use tracing::{debug, info};

use crate::engine::{
    advance, finished_transition, forward_hitbox, starts_new_run, Body, EntityId, Facing,
    FlowEvent, Health, IdGen, PhysicsParams, Rect, Screen, Swing,
};
use crate::input::{InputSnapshot, Intent};
use crate::knight::entities::{
    Boss, Enemy, EnemyTier, Fireball, Knight, KnightState, Stone,
};
use crate::knight::levels::{self, LEVELS};

// ── World ─────────────────────────────────────────────────────────────────────

pub const WORLD_WIDTH: f32 = 1200.0;
pub const WORLD_HEIGHT: f32 = 600.0;
pub const GROUND_Y: f32 = WORLD_HEIGHT - 50.0;

pub const PHYSICS: PhysicsParams = PhysicsParams {
    gravity: 0.5,
    terminal_velocity: 16.0,
    ground_y: GROUND_Y,
    world_width: WORLD_WIDTH,
    landing_slack: 0.0,
};

const MOVE_SPEED: f32 = 4.0;
const JUMP_VELOCITY: f32 = -12.0;
const FRICTION: f32 = 0.8;

// ── Knight tuning ─────────────────────────────────────────────────────────────

const KNIGHT_W: f32 = 40.0;
const KNIGHT_H: f32 = 50.0;
const KNIGHT_MAX_HP: f32 = 100.0;
const SPAWN_X: f32 = 50.0;
const LEVEL_HEAL: f32 = 30.0;

const SWING_FRAMES: u32 = 15;
const SWING_COOLDOWN: u32 = 30;
const SWORD_REACH: f32 = 60.0;
const SWORD_HEIGHT: f32 = 40.0;
const SWORD_Y_OFFSET: f32 = 10.0;
const SWORD_ENEMY_DAMAGE: f32 = 25.0;
const SWORD_BOSS_DAMAGE: f32 = 30.0;

const WATER_KNOCKBACK: f32 = 30.0;
const CHAIN_CHANCE: f64 = 0.3;
const CHAIN_RANGE: f32 = 100.0;
const CHAIN_FACTOR: f32 = 0.5;

// ── Enemy tuning ──────────────────────────────────────────────────────────────

const ENEMY_W: f32 = 35.0;
const ENEMY_H: f32 = 40.0;
const ENEMY_REACH: f32 = 50.0;
const ENEMY_DAMAGE: f32 = 10.0;
const ENEMY_ATTACK_COOLDOWN: u32 = 60;

fn enemy_stats(tier: EnemyTier) -> (f32, f32) {
    // (hp, speed)
    match tier {
        EnemyTier::Basic => (20.0, 1.5),
        EnemyTier::Medium => (35.0, 2.0),
        EnemyTier::Hard => (50.0, 2.5),
    }
}

struct BossProfile {
    hp: f32,
    w: f32,
    h: f32,
    melee_range: f32,
    melee_wait: u32,
    melee_damage: f32,
    ranged_wait: u32,
    fireball_speed: f32,
    fireball_size: f32,
    fireball_damage: f32,
}

fn boss_profile(stage: usize) -> BossProfile {
    match stage {
        3 => BossProfile {
            hp: 200.0,
            w: 80.0,
            h: 90.0,
            melee_range: 80.0,
            melee_wait: 60,
            melee_damage: 15.0,
            ranged_wait: 120,
            fireball_speed: 5.0,
            fireball_size: 20.0,
            fireball_damage: 12.0,
        },
        2 => BossProfile {
            hp: 100.0,
            w: 60.0,
            h: 70.0,
            melee_range: 70.0,
            melee_wait: 50,
            melee_damage: 12.0,
            ranged_wait: 100,
            fireball_speed: 4.0,
            fireball_size: 15.0,
            fireball_damage: 8.0,
        },
        _ => BossProfile {
            hp: 50.0,
            w: 60.0,
            h: 70.0,
            melee_range: 60.0,
            melee_wait: 80,
            melee_damage: 10.0,
            ranged_wait: 150,
            fireball_speed: 3.0,
            fireball_size: 15.0,
            fireball_damage: 8.0,
        },
    }
}

const BOSS_SPEED: f32 = 1.0;
const BOSS_STANDOFF: f32 = 50.0;

// ── Stones ────────────────────────────────────────────────────────────────────

/// The strongest stone held decides the multiplier.
pub fn damage_multiplier(stones: &[Stone]) -> f32 {
    if stones.contains(&Stone::Lightning) {
        2.5
    } else if stones.contains(&Stone::Water) {
        2.0
    } else if stones.contains(&Stone::Fire) {
        1.5
    } else {
        1.0
    }
}

pub fn has_all_stones(stones: &[Stone]) -> bool {
    [Stone::Fire, Stone::Water, Stone::Lightning]
        .iter()
        .all(|s| stones.contains(s))
}

fn stone_for_level(level: usize) -> Stone {
    match level {
        1 => Stone::Fire,
        2 => Stone::Water,
        _ => Stone::Lightning,
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

fn fresh_knight() -> Knight {
    Knight {
        body: Body::new(SPAWN_X, GROUND_Y - KNIGHT_H, KNIGHT_W, KNIGHT_H),
        health: Health::new(KNIGHT_MAX_HP),
        facing: Facing::Right,
        attack_cooldown: 0,
        swing: None,
        stones: Vec::new(),
    }
}

fn spawn_enemy(id: EntityId, x: f32, tier: EnemyTier) -> Enemy {
    let (hp, speed) = enemy_stats(tier);
    Enemy {
        id,
        body: Body::new(x, GROUND_Y - ENEMY_H, ENEMY_W, ENEMY_H),
        health: Health::new(hp),
        tier,
        speed,
        attack_cooldown: 0,
    }
}

fn spawn_boss(id: EntityId, stage: usize, x: f32) -> Boss {
    let p = boss_profile(stage);
    Boss {
        id,
        stage,
        body: Body::new(x, GROUND_Y - p.h, p.w, p.h),
        health: Health::new(p.hp),
        speed: BOSS_SPEED,
        attack_timer: 0,
        fireballs: Vec::new(),
    }
}

/// Title screen with level 1 laid out behind it.
pub fn new_state() -> KnightState {
    let base = KnightState {
        screen: Screen::Title,
        level: 1,
        knight: fresh_knight(),
        enemies: Vec::new(),
        boss: None,
        platforms: Vec::new(),
        banner: String::new(),
        ids: IdGen::default(),
        frame: 0,
    };
    load_level(&base, 1)
}

/// New run from level 1 with a fresh knight.
pub fn start_game(state: &KnightState) -> KnightState {
    info!("knight run started");
    let fresh = KnightState {
        screen: Screen::Playing,
        knight: fresh_knight(),
        ..state.clone()
    };
    load_level(&fresh, 1)
}

/// Lays out `level`. The knight keeps HP and stones, returns to the spawn
/// point, and is healed on every level after the first. Unknown level
/// numbers load level 1.
pub fn load_level(state: &KnightState, level: usize) -> KnightState {
    let level = if (1..=LEVELS.len()).contains(&level) {
        level
    } else {
        1
    };
    let layout = levels::layout(level);
    let mut ids = IdGen::default();

    let mut knight = Knight {
        body: Body::new(SPAWN_X, GROUND_Y - KNIGHT_H, KNIGHT_W, KNIGHT_H),
        facing: Facing::Right,
        attack_cooldown: 0,
        swing: None,
        ..state.knight.clone()
    };
    if level > 1 {
        knight.health.heal(LEVEL_HEAL);
    }

    let enemies: Vec<Enemy> = layout
        .enemies
        .iter()
        .map(|&(x, tier)| spawn_enemy(ids.next_id(), x, tier))
        .collect();
    let boss = spawn_boss(ids.next_id(), level, layout.boss_x);

    info!(level, enemies = enemies.len(), "knight level loaded");

    KnightState {
        level,
        knight,
        enemies,
        boss: Some(boss),
        platforms: layout.platforms.to_vec(),
        banner: String::new(),
        ids,
        ..state.clone()
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// The live sword hitbox, if a swing is in progress.
pub fn sword_hitbox(knight: &Knight) -> Option<Rect> {
    knight
        .swing
        .as_ref()
        .filter(|s| s.is_active())
        .map(|_| {
            forward_hitbox(
                &knight.body.rect,
                knight.facing,
                SWORD_REACH,
                SWORD_HEIGHT,
                SWORD_Y_OFFSET,
                0.0,
            )
        })
}

// ── Per-frame update ──────────────────────────────────────────────────────────

pub fn update(state: &KnightState, input: &InputSnapshot, rng: &mut impl Rng) -> KnightState {
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

fn simulate(mut s: KnightState, input: &InputSnapshot, rng: &mut impl Rng) -> KnightState {
    // ── 1. Knight ────────────────────────────────────────────────────────────
    step_knight(&mut s.knight, input, &s.platforms);

    // ── 2. Enemies and boss act on the knight ────────────────────────────────
    for enemy in &mut s.enemies {
        step_enemy(enemy, &mut s.knight, &s.platforms);
    }
    if let Some(boss) = s.boss.as_mut() {
        step_boss(boss, &mut s.knight, &s.platforms);
    }

    // ── 3. Sword resolution, then purge the dead ─────────────────────────────
    resolve_sword(&mut s, rng);
    s.enemies.retain(|e| !e.health.is_depleted());

    let swing_over = match s.knight.swing.as_mut() {
        Some(swing) => {
            swing.tick();
            !swing.is_active()
        }
        None => false,
    };
    if swing_over {
        s.knight.swing = None;
    }

    // ── 4. Outcome ───────────────────────────────────────────────────────────
    if s.knight.health.is_depleted() {
        info!(level = s.level, "knight has fallen");
        s.screen = advance(&s.screen, FlowEvent::PlayerDown);
    } else if s.boss.as_ref().is_some_and(|b| b.health.is_depleted()) {
        s = clear_stage(s);
    }
    s
}

fn step_knight(knight: &mut Knight, input: &InputSnapshot, platforms: &[Rect]) {
    if input.held(Intent::Left) {
        knight.body.vx = -MOVE_SPEED;
        knight.facing = Facing::Left;
    } else if input.held(Intent::Right) {
        knight.body.vx = MOVE_SPEED;
        knight.facing = Facing::Right;
    } else {
        knight.body.vx *= FRICTION;
    }

    if input.held(Intent::Jump) && knight.body.on_ground {
        knight.body.vy = JUMP_VELOCITY;
        knight.body.on_ground = false;
    }

    knight.body.step(&PHYSICS, platforms);

    if input.held(Intent::Attack) && knight.attack_cooldown == 0 {
        knight.swing = Some(Swing::start(SWING_FRAMES));
        knight.attack_cooldown = SWING_COOLDOWN;
    }
    knight.attack_cooldown = knight.attack_cooldown.saturating_sub(1);
}

fn step_enemy(enemy: &mut Enemy, knight: &mut Knight, platforms: &[Rect]) {
    let kx = knight.body.rect.x;
    let ex = enemy.body.rect.x;
    if kx < ex {
        enemy.body.vx = -enemy.speed;
    } else if kx > ex {
        enemy.body.vx = enemy.speed;
    }

    enemy.body.step(&PHYSICS, platforms);

    let dist = (enemy.body.rect.x - knight.body.rect.x).abs();
    if dist < ENEMY_REACH && enemy.attack_cooldown == 0 {
        knight.health.damage(ENEMY_DAMAGE);
        enemy.attack_cooldown = ENEMY_ATTACK_COOLDOWN;
    }
    enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);
}

fn step_boss(boss: &mut Boss, knight: &mut Knight, platforms: &[Rect]) {
    let p = boss_profile(boss.stage);
    let kx = knight.body.rect.x;
    let bx = boss.body.rect.x;
    let dist = (bx - kx).abs();

    boss.body.vx = if kx < bx - BOSS_STANDOFF {
        -boss.speed
    } else if kx > bx + BOSS_STANDOFF {
        boss.speed
    } else {
        0.0
    };
    boss.body.step(&PHYSICS, platforms);

    boss.attack_timer += 1;
    if dist < p.melee_range && boss.attack_timer > p.melee_wait {
        knight.health.damage(p.melee_damage);
        boss.attack_timer = 0;
    } else if boss.attack_timer > p.ranged_wait {
        let (cx, cy) = boss.body.rect.center();
        let vx = if kx > bx {
            p.fireball_speed
        } else {
            -p.fireball_speed
        };
        boss.fireballs.push(Fireball {
            rect: Rect::new(cx, cy, p.fireball_size, p.fireball_size),
            vx,
            damage: p.fireball_damage,
        });
        boss.attack_timer = 0;
    }

    let target = knight.body.rect;
    let mut incoming = 0.0;
    boss.fireballs.retain_mut(|f| {
        f.rect.x += f.vx;
        if f.rect.overlaps(&target) {
            incoming += f.damage;
            return false;
        }
        f.rect.x >= 0.0 && f.rect.x <= WORLD_WIDTH
    });
    if incoming > 0.0 {
        knight.health.damage(incoming);
    }
}

/// Applies the current swing to everything under the sword. Each target is
/// struck at most once per swing.
fn resolve_sword(s: &mut KnightState, rng: &mut impl Rng) {
    let Some(hitbox) = sword_hitbox(&s.knight) else {
        return;
    };
    let multiplier = damage_multiplier(&s.knight.stones);
    let water = s.knight.stones.contains(&Stone::Water);
    let lightning = s.knight.stones.contains(&Stone::Lightning);
    let facing = s.knight.facing;

    let Some(swing) = s.knight.swing.as_mut() else {
        return;
    };

    for i in 0..s.enemies.len() {
        let target = &s.enemies[i];
        if target.health.is_depleted() || !hitbox.overlaps(&target.body.rect) {
            continue;
        }
        if !swing.strike(target.id) {
            continue;
        }

        let damage = SWORD_ENEMY_DAMAGE * multiplier;
        let enemy = &mut s.enemies[i];
        enemy.health.damage(damage);
        if water {
            enemy.body.rect.x += facing.sign() * WATER_KNOCKBACK;
            enemy.body.clamp_to_world(WORLD_WIDTH);
        }
        if lightning && rng.gen_bool(CHAIN_CHANCE) {
            debug!(source = i, "chain lightning");
            chain_lightning(&mut s.enemies, i, damage);
        }
    }

    if let Some(boss) = s.boss.as_mut() {
        if !boss.health.is_depleted()
            && hitbox.overlaps(&boss.body.rect)
            && swing.strike(boss.id)
        {
            boss.health.damage(SWORD_BOSS_DAMAGE * multiplier);
        }
    }
}

/// Arcs half of `damage` from `enemies[source]` to every other enemy within
/// range horizontally.
pub fn chain_lightning(enemies: &mut [Enemy], source: usize, damage: f32) {
    let Some(origin) = enemies.get(source).map(|e| e.body.rect.x) else {
        return;
    };
    for (j, other) in enemies.iter_mut().enumerate() {
        if j != source && (other.body.rect.x - origin).abs() < CHAIN_RANGE {
            other.health.damage(damage * CHAIN_FACTOR);
        }
    }
}

fn clear_stage(mut s: KnightState) -> KnightState {
    let stone = stone_for_level(s.level);
    if !s.knight.stones.contains(&stone) {
        s.knight.stones.push(stone);
    }
    let final_stage = s.level >= LEVELS.len();
    info!(level = s.level, stone = stone.label(), final_stage, "boss defeated");

    s.banner = format!("Dragon Stone Acquired: {}", stone.label());
    s.boss = None;
    s.screen = advance(&s.screen, FlowEvent::StageCleared { final_stage });
    s
}
