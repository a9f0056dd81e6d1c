//! Art asset metadata.
//!
//! The terminal front-end draws glyphs, so all the game needs from an image
//! is its intrinsic pixel size (which drives sprite scaling).  Images are
//! still opened and validated so a broken asset directory fails at startup
//! rather than mid-round.

use std::path::Path;

use glam::Vec2;
use tracing::{debug, info};

use crate::error::{GameError, Result};

pub const PLAYER_IMAGE: &str = "player.png";
pub const ENEMY1_IMAGE: &str = "enemy1.png";
pub const ENEMY2_IMAGE: &str = "enemy2.png";
pub const LASER_IMAGE: &str = "laser.png";
pub const BACKGROUND_IMAGE: &str = "background.png";
pub const START_SCREEN_IMAGE: &str = "start_screen.png";
pub const LOSE_SCREEN_IMAGE: &str = "lose_screen.png";
pub const WIN_SCREEN_IMAGE: &str = "win_screen.png";

/// Intrinsic sizes (in pixels) of every image the game uses.
/// Loaded once, reused for every round.
#[derive(Clone, Debug, PartialEq)]
pub struct Textures {
    pub player: Vec2,
    pub enemy1: Vec2,
    pub enemy2: Vec2,
    pub laser: Vec2,
    pub background: Vec2,
    pub start_screen: Vec2,
    pub lose_screen: Vec2,
    pub win_screen: Vec2,
}

impl Default for Textures {
    /// Built-in sizes used when no asset directory is configured.
    fn default() -> Self {
        let sprite = Vec2::new(64.0, 64.0);
        let screen = Vec2::new(1920.0, 1080.0);
        Self {
            player: sprite,
            enemy1: sprite,
            enemy2: sprite,
            laser: Vec2::new(8.0, 24.0),
            background: screen,
            start_screen: screen,
            lose_screen: screen,
            win_screen: screen,
        }
    }
}

pub fn load_textures(dir: Option<&Path>) -> Result<Textures> {
    let Some(dir) = dir else {
        info!("no asset directory configured, using built-in sprite sizes");
        return Ok(Textures::default());
    };

    let textures = Textures {
        player: image_size(dir, PLAYER_IMAGE)?,
        enemy1: image_size(dir, ENEMY1_IMAGE)?,
        enemy2: image_size(dir, ENEMY2_IMAGE)?,
        laser: image_size(dir, LASER_IMAGE)?,
        background: image_size(dir, BACKGROUND_IMAGE)?,
        start_screen: image_size(dir, START_SCREEN_IMAGE)?,
        lose_screen: image_size(dir, LOSE_SCREEN_IMAGE)?,
        win_screen: image_size(dir, WIN_SCREEN_IMAGE)?,
    };
    info!(dir = %dir.display(), "assets loaded");
    Ok(textures)
}

fn image_size(dir: &Path, name: &str) -> Result<Vec2> {
    let path = dir.join(name);
    let (w, h) = image::image_dimensions(&path).map_err(|source| GameError::AssetLoad {
        path: path.clone(),
        source,
    })?;
    if w == 0 || h == 0 {
        return Err(GameError::InvalidConfig(format!(
            "asset {} has zero size",
            path.display()
        )));
    }
    debug!(asset = name, width = w, height = h, "image size read");
    Ok(Vec2::new(w as f32, h as f32))
}
