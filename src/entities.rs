//! Game entity types.
//!
//! Mostly plain data.  The only behaviour kept here is what an entity can do
//! on its own (move, die, integrate); anything involving several entities
//! lives in `compute`.

use glam::Vec2;

use crate::clock::ShotTimer;
use crate::input::{Key, KeyboardState};
use crate::sprite::{Body, Sprite, SpriteKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Spacecraft,
    Octopus,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    /// Horizontal speed in world units per second.
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            body: Body::new(pos, size),
            speed,
        }
    }

    /// Moves horizontally according to the held arrow keys, keeping the whole
    /// sprite inside `[0, screen_width]`.  Left and right together cancel.
    pub fn update(&mut self, dt: f32, screen_width: f32, keys: &impl KeyboardState) {
        let mut dx = 0.0;
        if keys.is_held(Key::Left) {
            dx -= self.speed * dt;
        }
        if keys.is_held(Key::Right) {
            dx += self.speed * dt;
        }

        let half = self.body.size.x * 0.5;
        let lo = half;
        let hi = screen_width - half;
        self.body.pos.x = if lo <= hi {
            (self.body.pos.x + dx).clamp(lo, hi)
        } else {
            // Screen narrower than the sprite: the only stable spot is the middle.
            screen_width * 0.5
        };
    }
}

impl Sprite for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Player
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    alive: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, size: Vec2, kind: EnemyKind) -> Self {
        Self {
            body: Body::new(pos, size),
            kind,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }
}

impl Sprite for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Enemy(self.kind)
    }
}

// ── Lasers ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaserOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    pub body: Body,
    velocity: Vec2,
    owner: LaserOwner,
}

impl Laser {
    pub fn new(pos: Vec2, size: Vec2, owner: LaserOwner) -> Self {
        Self {
            body: Body::new(pos, size),
            velocity: Vec2::ZERO,
            owner,
        }
    }

    pub fn set_velocity(&mut self, v: Vec2) {
        self.velocity = v;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn owner(&self) -> LaserOwner {
        self.owner
    }

    pub fn from_player(&self) -> bool {
        self.owner == LaserOwner::Player
    }

    pub fn update(&mut self, dt: f32) {
        self.body.translate(self.velocity * dt);
    }

    /// True once the laser is entirely above or below the play field.
    /// Horizontal exits are not checked; lasers only travel vertically.
    pub fn is_off_screen(&self, screen_height: f32) -> bool {
        let b = self.body.bounds();
        b.max.y < 0.0 || b.min.y > screen_height
    }
}

impl Sprite for Laser {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> SpriteKind {
        match self.owner {
            LaserOwner::Player => SpriteKind::PlayerShot,
            LaserOwner::Enemy => SpriteKind::EnemyShot,
        }
    }
}

// ── Swarm ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarchDirection {
    Left,
    Right,
}

impl MarchDirection {
    pub fn sign(self) -> f32 {
        match self {
            MarchDirection::Left => -1.0,
            MarchDirection::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            MarchDirection::Left => MarchDirection::Right,
            MarchDirection::Right => MarchDirection::Left,
        }
    }
}

/// Shared movement state of the swarm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Formation {
    pub speed: f32,
    pub direction: MarchDirection,
    /// Vertical offset applied on each bounce (negative = toward the player).
    pub step_down: f32,
}

/// The enemy grid.  Its size never changes during a round: dead enemies stay
/// in `enemies` with their alive flag cleared.
#[derive(Clone, Debug, PartialEq)]
pub struct Swarm {
    pub enemies: Vec<Enemy>,
    pub formation: Formation,
}

impl Swarm {
    pub fn alive(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn killed_count(&self) -> usize {
        self.enemies.len() - self.alive_count()
    }
}

// ── Round state ───────────────────────────────────────────────────────────────

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Win,
    Lose,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    Ended(RoundOutcome),
}

/// Fixed per-round parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundRules {
    /// Play field size in world units.
    pub screen: Vec2,
    pub laser_size: Vec2,
    pub player_shot_velocity: f32,
    pub enemy_shot_velocity: f32,
    pub spawn_offset: f32,
}

/// Everything that changes during a round.  Cloneable so `tick` can hand
/// back a new state without touching the caller's copy.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    pub player: Player,
    pub swarm: Swarm,
    pub player_shots: Vec<Laser>,
    pub enemy_shots: Vec<Laser>,
    pub enemy_fire: ShotTimer,
    pub rules: RoundRules,
    pub status: RoundStatus,
    pub frame: u64,
}
