//! Game-logic functions.
//!
//! The helpers work in place on the piece of state they own (a laser list,
//! the swarm, the player).  [`tick`] strings them together for one frame and,
//! like the rest of the public round API, takes the current `RoundState` by
//! reference and returns a new one.  Randomness only comes in through the
//! injected RNG, so a seeded RNG gives a reproducible round.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::assets::Textures;
use crate::clock::ShotTimer;
use crate::config::{GameConfig, SwarmConfig};
use crate::entities::{
    Enemy, EnemyKind, Formation, Laser, LaserOwner, MarchDirection, Player, RoundOutcome,
    RoundRules, RoundState, RoundStatus, Swarm,
};
use crate::input::TickInput;
use crate::sprite::{scale_for_window, Sprite};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Lay out the enemy grid.  Even rows use the first texture, odd rows the second.
pub fn create_swarm(cfg: &SwarmConfig, textures: &Textures, window: Vec2) -> Swarm {
    let start_y = window.y * cfg.start_y_frac;
    let mut enemies = Vec::with_capacity(cfg.cols * cfg.rows);

    for r in 0..cfg.rows {
        let (kind, intrinsic) = if r % 2 == 0 {
            (EnemyKind::Spacecraft, textures.enemy1)
        } else {
            (EnemyKind::Octopus, textures.enemy2)
        };
        let scale = scale_for_window(intrinsic, window, cfg.size_frac, cfg.size_frac);
        for c in 0..cfg.cols {
            let pos = Vec2::new(
                cfg.left_margin + c as f32 * cfg.x_spacing,
                start_y + r as f32 * cfg.y_spacing,
            );
            enemies.push(Enemy::new(pos, intrinsic * scale, kind));
        }
    }

    Swarm {
        enemies,
        formation: Formation {
            speed: cfg.speed,
            direction: MarchDirection::Right,
            step_down: cfg.step_down,
        },
    }
}

/// Build a fresh round: player centred low, full swarm, no lasers.
pub fn init_round(config: &GameConfig, textures: &Textures) -> RoundState {
    let window = Vec2::new(config.world.width, config.world.height);

    let p = &config.player;
    let scale = scale_for_window(textures.player, window, p.size_frac, p.size_frac);
    let player = Player::new(
        Vec2::new(window.x * 0.5, window.y * p.start_y_frac),
        textures.player * scale,
        p.speed,
    );

    let swarm = create_swarm(&config.swarm, textures, window);
    info!(enemies = swarm.enemies.len(), "round started");

    let l = &config.lasers;
    RoundState {
        player,
        swarm,
        player_shots: Vec::new(),
        enemy_shots: Vec::new(),
        enemy_fire: ShotTimer::new(l.enemy_interval),
        rules: RoundRules {
            screen: window,
            laser_size: Vec2::new(l.width, l.height),
            player_shot_velocity: l.player_velocity,
            enemy_shot_velocity: l.enemy_velocity,
            spawn_offset: l.spawn_offset,
        },
        status: RoundStatus::Running,
        frame: 0,
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// A player laser leaving the swarm-facing edge of the player.
pub fn fire_player_laser(player: &Player, rules: &RoundRules) -> Laser {
    let p = player.position();
    let y = p.y + player.body.size.y * 0.5 + rules.spawn_offset;
    let mut laser = Laser::new(Vec2::new(p.x, y), rules.laser_size, LaserOwner::Player);
    laser.set_velocity(Vec2::new(0.0, rules.player_shot_velocity));
    laser
}

/// A laser from a uniformly random alive enemy, or `None` if the swarm is wiped out.
pub fn spawn_enemy_laser(swarm: &Swarm, rules: &RoundRules, rng: &mut impl Rng) -> Option<Laser> {
    let alive: Vec<&Enemy> = swarm.alive().collect();
    let shooter = alive.choose(rng)?;

    let p = shooter.position();
    let y = p.y - shooter.body.size.y * 0.5 - rules.spawn_offset;
    let mut laser = Laser::new(Vec2::new(p.x, y), rules.laser_size, LaserOwner::Enemy);
    laser.set_velocity(Vec2::new(0.0, rules.enemy_shot_velocity));
    debug!(x = p.x, y = p.y, "enemy fired");
    Some(laser)
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Integrate every laser and drop the ones that left the play field.
pub fn update_lasers(shots: &mut Vec<Laser>, dt: f32, screen_height: f32) {
    for shot in shots.iter_mut() {
        shot.update(dt);
    }
    shots.retain(|shot| !shot.is_off_screen(screen_height));
}

/// Horizontal extent `[min_left, max_right]` covering every alive enemy.
pub fn swarm_envelope(swarm: &Swarm) -> Option<(f32, f32)> {
    swarm.alive().fold(None, |acc, enemy| {
        let b = enemy.bounds();
        Some(match acc {
            None => (b.min.x, b.max.x),
            Some((lo, hi)) => (lo.min(b.min.x), hi.max(b.max.x)),
        })
    })
}

/// March the swarm as one rigid block.
///
/// If this frame's step would push the envelope past either wall, the frame
/// is spent on the bounce instead: the block is shifted so the touching edge
/// sits exactly on the wall, stepped vertically, and its direction flips.
pub fn advance_swarm(swarm: &mut Swarm, dt: f32, screen_width: f32) {
    let Some((min_left, max_right)) = swarm_envelope(swarm) else {
        return;
    };

    let f = swarm.formation;
    let dx = f.speed * f.direction.sign() * dt;
    let next_left = min_left + dx;
    let next_right = max_right + dx;

    let offset = if next_left < 0.0 || next_right > screen_width {
        let correction = if next_left < 0.0 {
            -min_left
        } else {
            screen_width - max_right
        };
        swarm.formation.direction = f.direction.flipped();
        debug!(
            correction,
            step = f.step_down,
            direction = ?swarm.formation.direction,
            "swarm bounced"
        );
        Vec2::new(correction, f.step_down)
    } else {
        Vec2::new(dx, 0.0)
    };

    for enemy in swarm.enemies.iter_mut().filter(|e| e.is_alive()) {
        enemy.body.translate(offset);
    }
}

// ── Collisions & round state ─────────────────────────────────────────────────

/// Player lasers against alive enemies.  Each laser kills at most the first
/// enemy it overlaps and is then removed; misses stay in flight.
/// Returns the number of enemies killed.
pub fn check_player_shot_collisions(shots: &mut Vec<Laser>, swarm: &mut Swarm) -> usize {
    let mut kills = 0;
    shots.retain(|shot| {
        let bounds = shot.bounds();
        let target = swarm
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && e.bounds().intersects(&bounds));
        match target {
            Some(enemy) => {
                enemy.kill();
                kills += 1;
                false
            }
            None => true,
        }
    });
    kills
}

/// True if any alive enemy overlaps the player.
pub fn check_player_enemy_collision(player: &Player, swarm: &Swarm) -> bool {
    let pb = player.bounds();
    swarm.alive().any(|e| e.bounds().intersects(&pb))
}

/// Enemy lasers against the player.  Stops at the first overlapping laser,
/// removes it and reports a hit; further overlapping lasers are left for
/// later frames.
pub fn check_enemy_shot_collisions(shots: &mut Vec<Laser>, player: &Player) -> bool {
    let pb = player.bounds();
    match shots.iter().position(|s| s.bounds().intersects(&pb)) {
        Some(i) => {
            shots.remove(i);
            true
        }
        None => false,
    }
}

pub fn check_win(swarm: &Swarm) -> bool {
    swarm.enemies.iter().all(|e| !e.is_alive())
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance a running round by one frame of `dt` seconds.
///
/// Order matters: quit, fire, enemy fire, movement (player, lasers, swarm),
/// then collisions.  A hit or body contact ends the round as a loss even if
/// the same frame also cleared the swarm.  Ended rounds are returned as-is.
pub fn tick(state: &RoundState, input: &TickInput, dt: f32, rng: &mut impl Rng) -> RoundState {
    let mut next = state.clone();
    if next.status != RoundStatus::Running {
        return next;
    }

    if input.quit {
        info!(frame = next.frame, "round quit");
        next.status = RoundStatus::Ended(RoundOutcome::Quit);
        return next;
    }

    next.frame += 1;
    let screen = next.rules.screen;

    // ── 1. Spawns ────────────────────────────────────────────────────────────
    if input.fire {
        let laser = fire_player_laser(&next.player, &next.rules);
        next.player_shots.push(laser);
    }
    if next.enemy_fire.advance(dt) {
        if let Some(laser) = spawn_enemy_laser(&next.swarm, &next.rules, rng) {
            next.enemy_shots.push(laser);
        }
    }

    // ── 2. Movement ──────────────────────────────────────────────────────────
    next.player.update(dt, screen.x, input);
    update_lasers(&mut next.player_shots, dt, screen.y);
    update_lasers(&mut next.enemy_shots, dt, screen.y);
    advance_swarm(&mut next.swarm, dt, screen.x);

    // ── 3. Collisions ────────────────────────────────────────────────────────
    let kills = check_player_shot_collisions(&mut next.player_shots, &mut next.swarm);
    if kills > 0 {
        debug!(kills, remaining = next.swarm.alive_count(), "enemies destroyed");
    }

    let shot = check_enemy_shot_collisions(&mut next.enemy_shots, &next.player);
    let touched = check_player_enemy_collision(&next.player, &next.swarm);

    // ── 4. Outcome ───────────────────────────────────────────────────────────
    let outcome = if shot || touched {
        debug!(shot, touched, "player hit");
        Some(RoundOutcome::Lose)
    } else if check_win(&next.swarm) {
        Some(RoundOutcome::Win)
    } else {
        None
    };

    if let Some(outcome) = outcome {
        info!(
            ?outcome,
            frame = next.frame,
            killed = next.swarm.killed_count(),
            "round over"
        );
        next.status = RoundStatus::Ended(outcome);
    }

    next
}
