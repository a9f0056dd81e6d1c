//! Game configuration.
//!
//! Every value has a default, so an empty (or absent) TOML file gives the
//! stock game.  Sections mirror the things they tune:
//!
//! ```toml
//! seed = 7
//!
//! [world]
//! width = 1920.0
//! height = 1080.0
//!
//! [swarm]
//! cols = 8
//! rows = 4
//! speed = 300.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed in world units per second.
    pub speed: f32,
    /// Fraction of the window (both axes) the sprite is fitted into.
    pub size_frac: f32,
    /// Vertical position as a fraction of the window height.
    pub start_y_frac: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 450.0,
            size_frac: 0.10,
            start_y_frac: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub cols: usize,
    pub rows: usize,
    /// Height of the first row as a fraction of the window height.
    pub start_y_frac: f32,
    pub left_margin: f32,
    pub x_spacing: f32,
    pub y_spacing: f32,
    pub size_frac: f32,
    /// Horizontal marching speed in world units per second.
    pub speed: f32,
    /// Vertical offset applied on every wall bounce (negative = toward the player).
    pub step_down: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            cols: 8,
            rows: 4,
            start_y_frac: 0.65,
            left_margin: 120.0,
            x_spacing: 120.0,
            y_spacing: 120.0,
            size_frac: 0.10,
            speed: 300.0,
            step_down: -20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    pub width: f32,
    pub height: f32,
    /// Vertical velocity of player shots (positive = toward the swarm).
    pub player_velocity: f32,
    /// Vertical velocity of enemy shots (negative = toward the player).
    pub enemy_velocity: f32,
    /// Gap between the shooter's edge and a freshly spawned shot.
    pub spawn_offset: f32,
    /// Seconds between enemy shots.
    pub enemy_interval: f32,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 18.0,
            player_velocity: 400.0,
            enemy_velocity: -300.0,
            spawn_offset: 10.0,
            enemy_interval: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Directory holding the PNG art.  `None` uses built-in sprite sizes.
    pub assets_dir: Option<PathBuf>,
    pub log_file: PathBuf,
    /// Target frame duration in milliseconds.
    pub frame_ms: u64,
    /// Upper bound on a single frame's delta time, in seconds.
    pub max_dt: f32,
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub swarm: SwarmConfig,
    pub lasers: LaserConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            assets_dir: None,
            log_file: PathBuf::from("swarm_defender.log"),
            frame_ms: 16,
            max_dt: 0.1,
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            swarm: SwarmConfig::default(),
            lasers: LaserConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "world size must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.swarm.cols == 0 || self.swarm.rows == 0 {
            return Err(GameError::InvalidConfig(
                "swarm needs at least one row and one column".to_string(),
            ));
        }
        if !(self.lasers.enemy_interval > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "enemy shot interval must be positive, got {}",
                self.lasers.enemy_interval
            )));
        }
        if !(self.max_dt > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "max_dt must be positive, got {}",
                self.max_dt
            )));
        }
        Ok(())
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub assets_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl GameConfig {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(dir) = overrides.assets_dir {
            self.assets_dir = Some(dir);
        }
        if let Some(path) = overrides.log_file {
            self.log_file = path;
        }
    }
}
