//! The shared "moving sprite" shape.
//!
//! Every on-screen entity has a centre position and a scaled size, which
//! together give an axis-aligned bounding box.  Entities embed a [`Body`]
//! and implement [`Sprite`] instead of inheriting from a common base.

use glam::Vec2;

use crate::entities::EnemyKind;

// ── Bounding boxes ────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// True when the two boxes share a region of positive area.
    /// Boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x.max(other.min.x) < self.max.x.min(other.max.x)
            && self.min.y.max(other.min.y) < self.max.y.min(other.max.y)
    }
}

// ── Body & capability trait ───────────────────────────────────────────────────

/// Position (centre) plus scaled size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.pos, self.size)
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.pos += offset;
    }
}

/// What the renderer should draw for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyKind),
    PlayerShot,
    EnemyShot,
}

pub trait Sprite {
    fn body(&self) -> &Body;

    fn kind(&self) -> SpriteKind;

    fn position(&self) -> Vec2 {
        self.body().pos
    }

    fn bounds(&self) -> Bounds {
        self.body().bounds()
    }
}

// ── Scaling ───────────────────────────────────────────────────────────────────

/// Uniform scale factor that fits an image of `intrinsic` pixels inside a
/// box of `frac_w x frac_h` of the window, preserving aspect ratio.
pub fn scale_for_window(intrinsic: Vec2, window: Vec2, frac_w: f32, frac_h: f32) -> f32 {
    let sx = window.x * frac_w / intrinsic.x;
    let sy = window.y * frac_h / intrinsic.y;
    sx.min(sy)
}
