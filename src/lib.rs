//! Ricochet - a single-screen turret block breaker
//!
//! Core modules:
//! - `sim`: Deterministic session engine (projectiles, blocks, layout rotation, state machine)
//! - `config`: Data-driven session configuration (JSON)
//! - `game_log`: Bounded rolling log of gameplay events
//! - `arena`: Reference contact source standing in for a physics engine

pub mod arena;
pub mod config;
pub mod game_log;
pub mod sim;

pub use config::{ConfigError, ConfigFault, SessionConfig};
pub use game_log::GameLog;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics tick)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Projectiles pre-spawned in the pool
    pub const DEFAULT_POOL_CAPACITY: usize = 200;
    /// Seconds between the last block breaking and the game-over screen
    pub const DEFAULT_ENDING_DELAY: f32 = 3.0;

    /// Valid block health range (inclusive)
    pub const MIN_BLOCK_HEALTH: i32 = 1;
    pub const MAX_BLOCK_HEALTH: i32 = 5;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const PROJECTILE_LIFETIME: f32 = 6.0;
    pub const PROJECTILE_DAMAGE: i32 = 1;
    pub const PROJECTILE_RADIUS: f32 = 0.15;
    /// Distance in front of the turret where projectiles appear
    pub const PROJECTILE_SPAWN_OFFSET: f32 = 0.6;

    /// Messages kept by the on-screen game log
    pub const MAX_VISIBLE_LOG_MESSAGES: usize = 10;
}

/// Signed angle (radians, counter-clockwise positive) from world up to `dir`
#[inline]
pub fn angle_from_up(dir: Vec2) -> f32 {
    (-dir.x).atan2(dir.y)
}

/// Unit heading for an angle measured from world up (inverse of [`angle_from_up`])
#[inline]
pub fn heading_from_angle(angle: f32) -> Vec2 {
    Vec2::new(-angle.sin(), angle.cos())
}
