use arcade_cabinet::engine::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn open_sky() -> PhysicsParams {
    PhysicsParams {
        gravity: 0.5,
        terminal_velocity: 16.0,
        ground_y: 10_000.0,
        world_width: 1200.0,
        landing_slack: 0.0,
    }
}

// ── geometry ──────────────────────────────────────────────────────────────────

#[test]
fn rects_sharing_an_edge_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 10.0, 10.0);
    assert!(!a.overlaps(&b));
    assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
}

#[test]
fn distance_is_euclidean() {
    assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
}

// ── physics ───────────────────────────────────────────────────────────────────

#[test]
fn falling_speed_grows_until_terminal_velocity() {
    let params = open_sky();
    let mut body = Body::new(100.0, 0.0, 10.0, 10.0);
    let mut last = body.vy;
    for _ in 0..32 {
        body.step(&params, &[]);
        assert!(body.vy > last, "vy {} should exceed {}", body.vy, last);
        last = body.vy;
    }
    assert_eq!(body.vy, 16.0);
    body.step(&params, &[]);
    assert_eq!(body.vy, 16.0);
}

#[test]
fn falling_body_lands_on_platform_top() {
    let platform = Rect::new(0.0, 100.0, 50.0, 10.0);
    let mut body = Body::new(10.0, 85.0, 10.0, 10.0);
    body.vy = 5.0;
    body.step(&open_sky(), &[platform]);
    assert_eq!(body.vy, 0.0);
    assert_eq!(body.rect.bottom(), platform.y);
    assert!(body.on_ground);
}

#[test]
fn rising_body_passes_through_platform() {
    let platform = Rect::new(0.0, 100.0, 50.0, 10.0);
    let mut body = Body::new(10.0, 100.0, 10.0, 10.0);
    body.vy = -8.0;
    body.step(&open_sky(), &[platform]);
    assert!(body.vy < 0.0);
    assert!(!body.on_ground);
}

#[test]
fn landing_slack_catches_fast_fallers() {
    let platform = Rect::new(0.0, 100.0, 50.0, 10.0);
    let mut params = open_sky();
    params.landing_slack = 10.0;
    let mut body = Body::new(10.0, 94.0, 10.0, 10.0);
    body.vy = 14.0;
    body.step(&params, &[platform]);
    assert_eq!(body.rect.bottom(), 100.0);
}

#[test]
fn ground_stops_the_fall() {
    let mut params = open_sky();
    params.ground_y = 50.0;
    let mut body = Body::new(0.0, 38.0, 10.0, 10.0);
    body.vy = 6.0;
    body.step(&params, &[]);
    assert_eq!(body.rect.bottom(), 50.0);
    assert_eq!(body.vy, 0.0);
    assert!(body.on_ground);
}

#[test]
fn bodies_stay_inside_the_world() {
    let mut body = Body::new(1195.0, 0.0, 10.0, 10.0);
    body.vx = 20.0;
    body.step(&open_sky(), &[]);
    assert_eq!(body.rect.right(), 1200.0);

    body.vx = -5000.0;
    body.step(&open_sky(), &[]);
    assert_eq!(body.rect.x, 0.0);
}

// ── combat ────────────────────────────────────────────────────────────────────

#[test]
fn health_never_drops_below_zero() {
    let mut hp = Health::new(100.0);
    assert!(!hp.damage(40.0));
    assert!(hp.damage(150.0));
    assert_eq!(hp.current(), 0.0);
    assert!(hp.is_depleted());
}

#[test]
fn heal_is_capped_at_max() {
    let mut hp = Health::new(100.0);
    hp.damage(10.0);
    hp.heal(500.0);
    assert_eq!(hp.current(), 100.0);
    hp.set_current(-3.0);
    assert_eq!(hp.current(), 0.0);
}

#[test]
fn swing_strikes_each_target_once() {
    let mut swing = Swing::start(3);
    let mut ids = IdGen::default();
    let a = ids.next_id();
    let b = ids.next_id();

    assert!(swing.strike(a));
    assert!(!swing.strike(a));
    swing.tick();
    assert!(!swing.strike(a));
    assert!(swing.strike(b));
}

#[test]
fn expired_swing_strikes_nothing() {
    let mut swing = Swing::start(1);
    swing.tick();
    assert!(!swing.is_active());
    assert!(!swing.strike(EntityId(7)));
}

#[test]
fn forward_hitbox_sits_on_facing_side() {
    let owner = Rect::new(100.0, 50.0, 40.0, 50.0);
    let right = forward_hitbox(&owner, Facing::Right, 60.0, 40.0, 10.0, 0.0);
    assert_eq!(right, Rect::new(140.0, 60.0, 60.0, 40.0));
    let left = forward_hitbox(&owner, Facing::Left, 60.0, 40.0, 10.0, 0.0);
    assert_eq!(left.right(), owner.x);
}

#[test]
fn facing_turns_toward_target() {
    assert_eq!(Facing::Left.toward(10.0, 20.0), Facing::Right);
    assert_eq!(Facing::Right.toward(10.0, 5.0), Facing::Left);
    assert_eq!(Facing::Left.toward(10.0, 10.0), Facing::Left);
}

// ── flow ──────────────────────────────────────────────────────────────────────

#[test]
fn confirm_starts_from_title_and_end_screens() {
    for screen in [Screen::Title, Screen::GameOver, Screen::Victory] {
        let next = advance(&screen, FlowEvent::Confirm);
        assert_eq!(next, Screen::Playing);
        assert!(starts_new_run(&screen, &next));
    }
}

#[test]
fn pause_toggles() {
    let paused = advance(&Screen::Playing, FlowEvent::Pause);
    assert_eq!(paused, Screen::Paused);
    assert_eq!(advance(&paused, FlowEvent::Pause), Screen::Playing);
    assert!(!starts_new_run(&paused, &Screen::Playing));
}

#[test]
fn stage_clear_leads_to_transition_or_victory() {
    assert_eq!(
        advance(&Screen::Playing, FlowEvent::StageCleared { final_stage: false }),
        Screen::LevelTransition {
            frames_left: TRANSITION_FRAMES
        }
    );
    assert_eq!(
        advance(&Screen::Playing, FlowEvent::StageCleared { final_stage: true }),
        Screen::Victory
    );
}

#[test]
fn transition_counts_down_to_playing() {
    let mut screen = advance(&Screen::Playing, FlowEvent::StageCleared { final_stage: false });
    for _ in 0..TRANSITION_FRAMES - 1 {
        screen = advance(&screen, FlowEvent::Tick);
        assert!(matches!(screen, Screen::LevelTransition { .. }));
    }
    let done = advance(&screen, FlowEvent::Tick);
    assert_eq!(done, Screen::Playing);
    assert!(finished_transition(&screen, &done));
}

#[test]
fn irrelevant_events_leave_screen_alone() {
    assert_eq!(advance(&Screen::Title, FlowEvent::PlayerDown), Screen::Title);
    assert_eq!(advance(&Screen::Paused, FlowEvent::Tick), Screen::Paused);
    assert_eq!(advance(&Screen::GameOver, FlowEvent::Dismiss), Screen::Title);
}

// ── particles ─────────────────────────────────────────────────────────────────

#[test]
fn burst_spawns_requested_count() {
    let mut rng = seeded_rng();
    let burst = spawn_burst(&mut rng, 10.0, 20.0, Tint::Fire, 12, 5.0);
    assert_eq!(burst.len(), 12);
    assert!(burst.iter().all(|p| p.life >= 15.0 && p.life < 40.0));
    assert!(burst.iter().all(|p| p.x == 10.0 && p.y == 20.0));
}

#[test]
fn particles_age_and_expire() {
    let dying = Particle {
        x: 0.0,
        y: 0.0,
        vx: 1.0,
        vy: 0.0,
        life: 1.0,
        tint: Tint::Dust,
        size: 2.0,
    };
    let living = Particle {
        life: 10.0,
        ..dying.clone()
    };
    let next = update_particles(&[dying, living]);
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].life, 9.0);
    assert_eq!(next[0].x, 1.0);
    assert!(next[0].vy > 0.0);
}
