//! Swarm Defender: a single-screen arcade shooter.
//!
//! The library holds everything that can be tested without a terminal:
//! entity data, per-frame game logic, input tracking, timing, asset
//! metadata and configuration.  The `swarm_defender` binary adds the
//! crossterm front-end on top.

pub mod assets;
pub mod clock;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod sprite;

pub use error::{GameError, Result};
