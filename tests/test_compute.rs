use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use swarm_defender::assets::Textures;
use swarm_defender::clock::ShotTimer;
use swarm_defender::compute::*;
use swarm_defender::config::GameConfig;
use swarm_defender::entities::*;
use swarm_defender::input::TickInput;
use swarm_defender::sprite::Sprite;

const ENEMY_SIZE: Vec2 = Vec2::new(100.0, 100.0);

fn rules() -> RoundRules {
    RoundRules {
        screen: Vec2::new(1000.0, 1000.0),
        laser_size: Vec2::new(6.0, 18.0),
        player_shot_velocity: 400.0,
        enemy_shot_velocity: -300.0,
        spawn_offset: 10.0,
    }
}

fn enemy_at(x: f32, y: f32) -> Enemy {
    Enemy::new(Vec2::new(x, y), ENEMY_SIZE, EnemyKind::Spacecraft)
}

fn swarm_of(enemies: Vec<Enemy>, direction: MarchDirection) -> Swarm {
    Swarm {
        enemies,
        formation: Formation {
            speed: 300.0,
            direction,
            step_down: -20.0,
        },
    }
}

/// Player at (500, 100), 100x100; enemy fire effectively disabled.
fn round_with(enemies: Vec<Enemy>) -> RoundState {
    RoundState {
        player: Player::new(Vec2::new(500.0, 100.0), Vec2::new(100.0, 100.0), 450.0),
        swarm: swarm_of(enemies, MarchDirection::Right),
        player_shots: Vec::new(),
        enemy_shots: Vec::new(),
        enemy_fire: ShotTimer::new(1000.0),
        rules: rules(),
        status: RoundStatus::Running,
        frame: 0,
    }
}

fn shot(owner: LaserOwner, x: f32, y: f32, vy: f32) -> Laser {
    let mut l = Laser::new(Vec2::new(x, y), Vec2::new(6.0, 18.0), owner);
    l.set_velocity(Vec2::new(0.0, vy));
    l
}

fn seeded_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

// ── create_swarm / init_round ─────────────────────────────────────────────────

#[test]
fn create_swarm_builds_full_grid() {
    let cfg = GameConfig::default();
    let swarm = create_swarm(&cfg.swarm, &Textures::default(), Vec2::new(1920.0, 1080.0));

    assert_eq!(swarm.enemies.len(), 32); // 8 x 4
    assert!(swarm.enemies.iter().all(|e| e.is_alive()));
    assert_eq!(swarm.formation.direction, MarchDirection::Right);
    assert_eq!(swarm.formation.step_down, -20.0);
}

#[test]
fn create_swarm_layout_and_row_kinds() {
    let cfg = GameConfig::default();
    let swarm = create_swarm(&cfg.swarm, &Textures::default(), Vec2::new(1920.0, 1080.0));

    let first = &swarm.enemies[0];
    assert!((first.position() - Vec2::new(120.0, 702.0)).length() < 1e-3);
    assert_eq!(first.kind, EnemyKind::Spacecraft);

    // Last column of the first row
    assert!((swarm.enemies[7].position().x - 960.0).abs() < 1e-3);

    // Second row sits one spacing higher and uses the other variant
    let second_row = &swarm.enemies[8];
    assert!((second_row.position().y - 822.0).abs() < 1e-3);
    assert_eq!(second_row.kind, EnemyKind::Octopus);
    assert_eq!(swarm.enemies[16].kind, EnemyKind::Spacecraft);
}

#[test]
fn create_swarm_scales_to_window() {
    let cfg = GameConfig::default();
    let swarm = create_swarm(&cfg.swarm, &Textures::default(), Vec2::new(1920.0, 1080.0));
    // 64px art fitted into 10% of 1080
    let size = swarm.enemies[0].body.size;
    assert!((size.x - 108.0).abs() < 1e-3);
    assert!((size.y - 108.0).abs() < 1e-3);
}

#[test]
fn init_round_places_player_low_and_centred() {
    let s = init_round(&GameConfig::default(), &Textures::default());
    assert!((s.player.position() - Vec2::new(960.0, 270.0)).length() < 1e-3);
    assert_eq!(s.player.speed, 450.0);
    assert_eq!(s.rules.screen, Vec2::new(1920.0, 1080.0));
}

#[test]
fn init_round_empty_collections() {
    let s = init_round(&GameConfig::default(), &Textures::default());
    assert!(s.player_shots.is_empty());
    assert!(s.enemy_shots.is_empty());
    assert_eq!(s.status, RoundStatus::Running);
    assert_eq!(s.frame, 0);
    assert_eq!(s.enemy_fire.interval, 0.5);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn player_laser_leaves_swarm_facing_edge() {
    let s = round_with(Vec::new());
    let l = fire_player_laser(&s.player, &s.rules);
    assert_eq!(l.position(), Vec2::new(500.0, 160.0)); // 100 + 50 + 10
    assert_eq!(l.velocity(), Vec2::new(0.0, 400.0));
    assert!(l.from_player());
    assert_eq!(l.body.size, Vec2::new(6.0, 18.0));
}

#[test]
fn enemy_laser_none_when_swarm_dead() {
    let mut swarm = swarm_of(vec![enemy_at(100.0, 600.0)], MarchDirection::Right);
    swarm.enemies[0].kill();
    assert!(spawn_enemy_laser(&swarm, &rules(), &mut seeded_rng()).is_none());
}

#[test]
fn enemy_laser_leaves_player_facing_edge() {
    let swarm = swarm_of(vec![enemy_at(300.0, 600.0)], MarchDirection::Right);
    let l = spawn_enemy_laser(&swarm, &rules(), &mut seeded_rng()).unwrap();
    assert_eq!(l.position(), Vec2::new(300.0, 540.0)); // 600 - 50 - 10
    assert_eq!(l.velocity(), Vec2::new(0.0, -300.0));
    assert!(!l.from_player());
}

#[test]
fn enemy_laser_only_from_alive_enemies() {
    let mut swarm = swarm_of(
        vec![enemy_at(100.0, 600.0), enemy_at(300.0, 600.0), enemy_at(500.0, 600.0)],
        MarchDirection::Right,
    );
    swarm.enemies[1].kill();

    let mut rng = seeded_rng();
    let mut seen = Vec::new();
    for _ in 0..200 {
        let l = spawn_enemy_laser(&swarm, &rules(), &mut rng).unwrap();
        seen.push(l.position().x);
    }
    assert!(seen.iter().all(|&x| x == 100.0 || x == 500.0));
    // Both survivors get picked eventually
    assert!(seen.contains(&100.0));
    assert!(seen.contains(&500.0));
}

// ── update_lasers ─────────────────────────────────────────────────────────────

#[test]
fn update_lasers_moves_and_culls() {
    let mut shots = vec![
        shot(LaserOwner::Player, 10.0, 500.0, 400.0),
        shot(LaserOwner::Player, 20.0, 990.0, 400.0), // leaves the top this frame
    ];
    update_lasers(&mut shots, 0.25, 1000.0);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].position(), Vec2::new(10.0, 600.0));
}

#[test]
fn update_lasers_culls_below_zero() {
    let mut shots = vec![shot(LaserOwner::Enemy, 10.0, 5.0, -300.0)];
    update_lasers(&mut shots, 0.25, 1000.0);
    assert!(shots.is_empty());
}

// ── advance_swarm ─────────────────────────────────────────────────────────────

#[test]
fn swarm_envelope_covers_alive_only() {
    let mut swarm = swarm_of(
        vec![enemy_at(100.0, 600.0), enemy_at(300.0, 600.0), enemy_at(900.0, 600.0)],
        MarchDirection::Right,
    );
    assert_eq!(swarm_envelope(&swarm), Some((50.0, 950.0)));

    swarm.enemies[2].kill();
    assert_eq!(swarm_envelope(&swarm), Some((50.0, 350.0)));

    swarm.enemies[0].kill();
    swarm.enemies[1].kill();
    assert_eq!(swarm_envelope(&swarm), None);
}

#[test]
fn swarm_marches_without_vertical_change() {
    let mut swarm = swarm_of(vec![enemy_at(500.0, 600.0)], MarchDirection::Right);
    advance_swarm(&mut swarm, 0.25, 1000.0);
    assert_eq!(swarm.enemies[0].position(), Vec2::new(575.0, 600.0));
    assert_eq!(swarm.formation.direction, MarchDirection::Right);
}

#[test]
fn swarm_dead_enemies_do_not_move() {
    let mut swarm = swarm_of(
        vec![enemy_at(200.0, 600.0), enemy_at(400.0, 600.0)],
        MarchDirection::Right,
    );
    swarm.enemies[1].kill();
    advance_swarm(&mut swarm, 0.25, 1000.0);
    assert_eq!(swarm.enemies[0].position().x, 275.0);
    assert_eq!(swarm.enemies[1].position().x, 400.0);
}

#[test]
fn swarm_bounces_off_right_wall() {
    // Right edge at 990; a 75px step would overshoot to 1065.
    let mut swarm = swarm_of(vec![enemy_at(940.0, 600.0)], MarchDirection::Right);
    advance_swarm(&mut swarm, 0.25, 1000.0);

    let b = swarm.enemies[0].bounds();
    assert_eq!(b.max.x, 1000.0);
    assert_eq!(swarm.enemies[0].position().y, 580.0); // stepped toward the player
    assert_eq!(swarm.formation.direction, MarchDirection::Left);
}

#[test]
fn swarm_bounces_off_left_wall_to_exactly_zero() {
    let mut swarm = swarm_of(
        vec![enemy_at(60.0, 600.0), enemy_at(260.0, 600.0)],
        MarchDirection::Left,
    );
    advance_swarm(&mut swarm, 0.25, 1000.0);

    assert_eq!(swarm_envelope(&swarm).map(|(lo, _)| lo), Some(0.0));
    // The whole block shifts by the same correction
    assert_eq!(swarm.enemies[1].bounds().min.x, 200.0);
    assert!(swarm.enemies.iter().all(|e| e.position().y == 580.0));
    assert_eq!(swarm.formation.direction, MarchDirection::Right);
}

#[test]
fn swarm_bounce_uses_group_envelope() {
    // The left enemy is far from the wall, but the right one would cross it.
    let mut swarm = swarm_of(
        vec![enemy_at(100.0, 600.0), enemy_at(920.0, 600.0)],
        MarchDirection::Right,
    );
    advance_swarm(&mut swarm, 0.25, 1000.0);
    assert_eq!(swarm.enemies[0].position().x, 130.0);
    assert_eq!(swarm.enemies[1].position().x, 950.0);
    assert_eq!(swarm.formation.direction, MarchDirection::Left);
}

#[test]
fn swarm_reaches_wall_then_flips_next_frame() {
    // Right edge starts at 550 and moves 75 per frame: exactly 1000 after 6 frames.
    let mut swarm = swarm_of(vec![enemy_at(500.0, 600.0)], MarchDirection::Right);
    for _ in 0..6 {
        advance_swarm(&mut swarm, 0.25, 1000.0);
    }
    assert_eq!(swarm.enemies[0].bounds().max.x, 1000.0);
    assert_eq!(swarm.formation.direction, MarchDirection::Right);

    advance_swarm(&mut swarm, 0.25, 1000.0);
    assert_eq!(swarm.enemies[0].bounds().max.x, 1000.0);
    assert_eq!(swarm.enemies[0].position().y, 580.0);
    assert_eq!(swarm.formation.direction, MarchDirection::Left);
}

#[test]
fn swarm_with_no_alive_enemies_is_noop() {
    let mut swarm = swarm_of(vec![enemy_at(10.0, 600.0)], MarchDirection::Left);
    swarm.enemies[0].kill();
    let before = swarm.clone();
    advance_swarm(&mut swarm, 1.0, 1000.0);
    assert_eq!(swarm, before);
}

proptest! {
    #[test]
    fn dead_swarm_never_moves(
        xs in proptest::collection::vec(-2000.0f32..3000.0, 0..12),
        dt in 0.0f32..5.0,
        width in 1.0f32..4000.0,
    ) {
        let enemies = xs.iter().map(|&x| {
            let mut e = enemy_at(x, 600.0);
            e.kill();
            e
        }).collect();
        let mut swarm = swarm_of(enemies, MarchDirection::Left);
        let before = swarm.clone();
        advance_swarm(&mut swarm, dt, width);
        prop_assert_eq!(swarm, before);
    }
}

// ── Collisions ────────────────────────────────────────────────────────────────

#[test]
fn player_shot_kills_enemy_and_is_removed() {
    let mut swarm = swarm_of(vec![enemy_at(500.0, 600.0)], MarchDirection::Right);
    let mut shots = vec![
        shot(LaserOwner::Player, 500.0, 545.0, 400.0), // overlaps by a sliver
        shot(LaserOwner::Player, 100.0, 300.0, 400.0),
    ];
    let kills = check_player_shot_collisions(&mut shots, &mut swarm);

    assert_eq!(kills, 1);
    assert!(!swarm.enemies[0].is_alive());
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].position().x, 100.0);
}

#[test]
fn player_shot_touching_edge_misses() {
    let mut swarm = swarm_of(vec![enemy_at(500.0, 600.0)], MarchDirection::Right);
    // Top of the laser at exactly 550, the enemy's bottom edge
    let mut shots = vec![shot(LaserOwner::Player, 500.0, 541.0, 400.0)];
    assert_eq!(check_player_shot_collisions(&mut shots, &mut swarm), 0);
    assert!(swarm.enemies[0].is_alive());
    assert_eq!(shots.len(), 1);
}

#[test]
fn one_shot_kills_at_most_one_enemy() {
    // Two overlapping enemies; the laser sits inside both.
    let mut swarm = swarm_of(
        vec![enemy_at(480.0, 600.0), enemy_at(520.0, 600.0)],
        MarchDirection::Right,
    );
    let mut shots = vec![shot(LaserOwner::Player, 500.0, 600.0, 400.0)];
    assert_eq!(check_player_shot_collisions(&mut shots, &mut swarm), 1);
    assert!(!swarm.enemies[0].is_alive()); // first in grid order wins
    assert!(swarm.enemies[1].is_alive());
    assert!(shots.is_empty());
}

#[test]
fn dead_enemies_do_not_absorb_shots() {
    let mut swarm = swarm_of(vec![enemy_at(500.0, 600.0)], MarchDirection::Right);
    let mut shots = vec![
        shot(LaserOwner::Player, 500.0, 600.0, 400.0),
        shot(LaserOwner::Player, 500.0, 610.0, 400.0),
    ];
    assert_eq!(check_player_shot_collisions(&mut shots, &mut swarm), 1);
    assert_eq!(shots.len(), 1); // second laser flies through the wreck
}

#[test]
fn enemy_shot_hits_player_once_per_frame() {
    let s = round_with(Vec::new());
    let mut shots = vec![
        shot(LaserOwner::Enemy, 500.0, 100.0, -300.0),
        shot(LaserOwner::Enemy, 510.0, 110.0, -300.0),
        shot(LaserOwner::Enemy, 900.0, 800.0, -300.0),
    ];
    assert!(check_enemy_shot_collisions(&mut shots, &s.player));
    assert_eq!(shots.len(), 2);
    // The second overlapping laser is still there for the next check
    assert!(check_enemy_shot_collisions(&mut shots, &s.player));
    assert_eq!(shots.len(), 1);
    assert!(!check_enemy_shot_collisions(&mut shots, &s.player));
}

#[test]
fn player_touching_alive_enemy_collides() {
    let s = round_with(Vec::new());
    let mut swarm = swarm_of(vec![enemy_at(550.0, 180.0)], MarchDirection::Right);
    assert!(check_player_enemy_collision(&s.player, &swarm));

    swarm.enemies[0].kill();
    assert!(!check_player_enemy_collision(&s.player, &swarm));
}

#[test]
fn win_only_when_all_dead() {
    let mut swarm = swarm_of(
        vec![enemy_at(100.0, 600.0), enemy_at(300.0, 600.0)],
        MarchDirection::Right,
    );
    assert!(!check_win(&swarm));
    swarm.enemies[0].kill();
    assert!(!check_win(&swarm));
    swarm.enemies[1].kill();
    assert!(check_win(&swarm));
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame_and_leaves_input_state_untouched() {
    let s = round_with(vec![enemy_at(500.0, 800.0)]);
    let s2 = tick(&s, &TickInput::default(), 0.016, &mut seeded_rng());
    assert_eq!(s2.frame, 1);
    assert_eq!(s.frame, 0);
    assert_eq!(s.swarm.enemies[0].position().x, 500.0);
}

#[test]
fn tick_quit_ends_round_immediately() {
    let s = round_with(vec![enemy_at(500.0, 800.0)]);
    let input = TickInput {
        quit: true,
        fire: true,
        ..Default::default()
    };
    let s2 = tick(&s, &input, 0.016, &mut seeded_rng());
    assert_eq!(s2.status, RoundStatus::Ended(RoundOutcome::Quit));
    assert!(s2.player_shots.is_empty());
    assert_eq!(s2.frame, 0);
}

#[test]
fn tick_on_ended_round_is_identity() {
    let mut s = round_with(vec![enemy_at(500.0, 800.0)]);
    s.status = RoundStatus::Ended(RoundOutcome::Lose);
    let input = TickInput {
        fire: true,
        right: true,
        ..Default::default()
    };
    let s2 = tick(&s, &input, 0.5, &mut seeded_rng());
    assert_eq!(s2, s);
}

#[test]
fn tick_fire_spawns_player_laser() {
    let s = round_with(vec![enemy_at(100.0, 800.0)]);
    let input = TickInput {
        fire: true,
        ..Default::default()
    };
    let s2 = tick(&s, &input, 0.0, &mut seeded_rng());
    assert_eq!(s2.player_shots.len(), 1);
    assert!(s2.player_shots[0].from_player());
}

#[test]
fn tick_moves_player_with_held_keys() {
    let s = round_with(vec![enemy_at(100.0, 800.0)]);
    let input = TickInput {
        left: true,
        ..Default::default()
    };
    let s2 = tick(&s, &input, 0.1, &mut seeded_rng());
    assert!(s2.player.position().x < 500.0);
}

#[test]
fn tick_enemy_fires_on_interval() {
    let mut s = round_with(vec![enemy_at(500.0, 800.0)]);
    s.enemy_fire = ShotTimer::new(0.5);
    let mut rng = seeded_rng();

    let s = tick(&s, &TickInput::default(), 0.25, &mut rng);
    assert!(s.enemy_shots.is_empty());

    let s = tick(&s, &TickInput::default(), 0.25, &mut rng);
    assert_eq!(s.enemy_shots.len(), 1);
    assert_eq!(s.enemy_fire.elapsed, 0.0);
}

#[test]
fn tick_slow_frame_spawns_single_enemy_shot() {
    let mut s = round_with(vec![enemy_at(500.0, 900.0)]);
    s.enemy_fire = ShotTimer::new(0.1);
    s.swarm.formation.speed = 0.0;
    // Four intervals' worth of time still produces one shot
    let s2 = tick(&s, &TickInput::default(), 0.4, &mut seeded_rng());
    assert_eq!(s2.enemy_shots.len(), 1);
}

#[test]
fn tick_hit_takes_precedence_over_win() {
    // Last enemy dies this frame while an enemy laser reaches the player.
    let mut s = round_with(vec![enemy_at(500.0, 600.0)]);
    s.swarm.formation.speed = 0.0;
    s.player_shots.push(shot(LaserOwner::Player, 500.0, 600.0, 0.0));
    s.enemy_shots.push(shot(LaserOwner::Enemy, 500.0, 100.0, 0.0));

    let s2 = tick(&s, &TickInput::default(), 0.016, &mut seeded_rng());
    assert!(check_win(&s2.swarm));
    assert_eq!(s2.status, RoundStatus::Ended(RoundOutcome::Lose));
}

#[test]
fn tick_body_contact_loses() {
    let mut s = round_with(vec![enemy_at(500.0, 190.0)]);
    s.swarm.formation.speed = 0.0;
    let s2 = tick(&s, &TickInput::default(), 0.016, &mut seeded_rng());
    assert_eq!(s2.status, RoundStatus::Ended(RoundOutcome::Lose));
}

#[test]
fn tick_is_deterministic_with_same_seed() {
    let cfg = GameConfig::default();
    let start = init_round(&cfg, &Textures::default());
    let input = TickInput::default();

    let mut a = start.clone();
    let mut b = start;
    let mut rng_a = ChaCha8Rng::seed_from_u64(7);
    let mut rng_b = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..120 {
        a = tick(&a, &input, 1.0 / 60.0, &mut rng_a);
        b = tick(&b, &input, 1.0 / 60.0, &mut rng_b);
    }
    assert_eq!(a, b);
}
