//! Session configuration
//!
//! Loaded from JSON by the host and validated by the engine at session start.
//! Validation never rejects a config: it lists the faults so the operator can
//! fix content while the game keeps running.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::block::health_in_range;
use crate::sim::layout::{BlockSpec, LayoutTemplate};
use crate::sim::rotation::ProgressionMode;

/// Projectile tuning shared by every pooled projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// World units per second
    pub move_speed: f32,
    /// Seconds before the projectile returns to the pool
    pub lifetime: f32,
    /// Health removed from a block per hit
    pub damage: i32,
    /// Collision radius (used by contact sources, not the engine)
    pub radius: f32,
    /// Distance in front of the turret where projectiles appear
    pub spawn_offset: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            move_speed: PROJECTILE_SPEED,
            lifetime: PROJECTILE_LIFETIME,
            damage: PROJECTILE_DAMAGE,
            radius: PROJECTILE_RADIUS,
            spawn_offset: PROJECTILE_SPAWN_OFFSET,
        }
    }
}

/// Game log display/retention settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub enabled: bool,
    /// Oldest messages are dropped beyond this count
    pub max_visible_messages: usize,
    /// Also forward every message to the `log` facade
    pub mirror_to_console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_visible_messages: MAX_VISIBLE_LOG_MESSAGES,
            mirror_to_console: false,
        }
    }
}

/// Everything the session engine is configured with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ordered layout catalog
    pub layouts: Vec<LayoutTemplate>,
    pub progression: ProgressionMode,
    /// Projectiles pre-spawned in the pool
    pub pool_capacity: usize,
    /// Seconds between clearing the layout and the game-over screen
    pub ending_delay: f32,
    /// Debug only: play this catalog index every session, ignoring rotation
    pub debug_layout_override: Option<usize>,
    pub projectile: ProjectileTuning,
    /// Recycle a projectile as soon as it damages a block
    pub release_on_block_hit: bool,
    /// Seed for the shuffled rotation; random when absent
    pub seed: Option<u64>,
    pub log: LogSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layouts: default_catalog(),
            progression: ProgressionMode::Sequential,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            ending_delay: DEFAULT_ENDING_DELAY,
            debug_layout_override: None,
            projectile: ProjectileTuning::default(),
            release_on_block_hit: false,
            seed: None,
            log: LogSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Seed for the layout rotation RNG
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Ending delay with negative values treated as zero
    pub fn effective_ending_delay(&self) -> f32 {
        self.ending_delay.max(0.0)
    }

    /// List every configuration fault
    pub fn validate(&self) -> Vec<ConfigFault> {
        let mut faults = Vec::new();

        if self.layouts.is_empty() {
            faults.push(ConfigFault::EmptyCatalog);
        }
        if let Some(index) = self.debug_layout_override {
            if index >= self.layouts.len() {
                faults.push(ConfigFault::InvalidLayoutOverride {
                    index,
                    catalog_len: self.layouts.len(),
                });
            }
        }

        for layout in &self.layouts {
            if layout.breakable_count() == 0 {
                faults.push(ConfigFault::NoBreakableBlocks {
                    layout: layout.name.clone(),
                });
            }
            for (block, spec) in layout.blocks.iter().enumerate() {
                if !spec.invincible && !health_in_range(spec.health) {
                    faults.push(ConfigFault::HealthOutOfRange {
                        layout: layout.name.clone(),
                        block,
                        health: spec.health,
                    });
                }
            }
        }

        if self.pool_capacity == 0 {
            faults.push(ConfigFault::ZeroPoolCapacity);
        }
        if self.ending_delay < 0.0 {
            faults.push(ConfigFault::NegativeEndingDelay(self.ending_delay));
        }
        if self.projectile.move_speed.abs() < f32::EPSILON {
            faults.push(ConfigFault::ZeroMoveSpeed);
        }
        if self.projectile.lifetime.abs() < f32::EPSILON {
            faults.push(ConfigFault::ZeroLifetime);
        }
        if self.projectile.damage <= 0 {
            faults.push(ConfigFault::NonPositiveDamage(self.projectile.damage));
        }

        faults
    }
}

/// A content/configuration problem; reported, never fatal
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigFault {
    EmptyCatalog,
    NoBreakableBlocks { layout: String },
    HealthOutOfRange { layout: String, block: usize, health: i32 },
    InvalidLayoutOverride { index: usize, catalog_len: usize },
    ZeroPoolCapacity,
    NegativeEndingDelay(f32),
    ZeroMoveSpeed,
    ZeroLifetime,
    NonPositiveDamage(i32),
}

impl fmt::Display for ConfigFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFault::EmptyCatalog => write!(f, "layout catalog is empty and no layout override is set"),
            ConfigFault::NoBreakableBlocks { layout } => {
                write!(f, "layout '{layout}' has no breakable blocks; the session can never be won")
            }
            ConfigFault::HealthOutOfRange { layout, block, health } => write!(
                f,
                "layout '{layout}' block {block}: health {health} outside {MIN_BLOCK_HEALTH}..={MAX_BLOCK_HEALTH}"
            ),
            ConfigFault::InvalidLayoutOverride { index, catalog_len } => {
                write!(f, "layout override {index} is out of range for a catalog of {catalog_len}")
            }
            ConfigFault::ZeroPoolCapacity => write!(f, "projectile pool capacity is zero; every shot will grow the pool"),
            ConfigFault::NegativeEndingDelay(d) => write!(f, "ending delay {d} is negative, using 0"),
            ConfigFault::ZeroMoveSpeed => write!(f, "projectile move speed is zero; projectiles will not move"),
            ConfigFault::ZeroLifetime => write!(f, "projectile lifetime is zero; projectiles expire immediately"),
            ConfigFault::NonPositiveDamage(d) => {
                write!(f, "projectile damage {d} is not positive; blocks cannot be damaged")
            }
        }
    }
}

/// Failure to read or parse a config file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Built-in layouts, sized for the default 16x10 arena
pub fn default_catalog() -> Vec<LayoutTemplate> {
    let brick = Vec2::new(1.6, 0.6);
    let turret_spawn = Vec2::new(0.0, -4.0);

    let row = LayoutTemplate {
        name: "Row".into(),
        turret_spawn,
        blocks: (0..5)
            .map(|i| {
                let x = -4.0 + i as f32 * 2.0;
                BlockSpec::new(Vec2::new(x, 3.0), brick, 1 + (i % 3))
            })
            .collect(),
    };

    let fortress = LayoutTemplate {
        name: "Fortress".into(),
        turret_spawn,
        blocks: vec![
            BlockSpec::invincible(Vec2::new(-3.0, 1.0), Vec2::new(0.4, 3.0)),
            BlockSpec::invincible(Vec2::new(3.0, 1.0), Vec2::new(0.4, 3.0)),
            BlockSpec::new(Vec2::new(-1.0, 1.5), brick, 3),
            BlockSpec::new(Vec2::new(1.0, 1.5), brick, 3),
            BlockSpec::new(Vec2::new(-1.0, 0.5), brick, 2),
            BlockSpec::new(Vec2::new(1.0, 0.5), brick, 2),
        ],
    };

    let columns = LayoutTemplate {
        name: "Columns".into(),
        turret_spawn,
        blocks: (0..6)
            .map(|i| {
                let x = if i % 2 == 0 { -5.0 } else { 5.0 };
                let y = 3.5 - (i / 2) as f32 * 1.5;
                BlockSpec::new(Vec2::new(x, y), brick, 5 - (i / 2) as i32)
            })
            .collect(),
    };

    vec![row, fortress, columns]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        let config = SessionConfig::default();
        assert_eq!(config.validate(), vec![]);
        assert_eq!(config.layouts.len(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SessionConfig::from_json(r#"{ "progression": "Shuffled", "pool_capacity": 16 }"#).unwrap();
        assert_eq!(config.progression, ProgressionMode::Shuffled);
        assert_eq!(config.pool_capacity, 16);
        assert_eq!(config.layouts.len(), 3);
        assert_eq!(config.ending_delay, DEFAULT_ENDING_DELAY);
    }

    #[test]
    fn test_json_round_trip_keeps_catalog() {
        let config = SessionConfig::default();
        let json = config.to_json_pretty().unwrap();
        let back = SessionConfig::from_json(&json).unwrap();
        assert_eq!(back.layouts, config.layouts);
    }

    #[test]
    fn test_validate_reports_content_faults() {
        let mut config = SessionConfig::default();
        config.layouts[0].blocks[0].health = 9;
        config.layouts[1].blocks.retain(|b| b.invincible);
        config.debug_layout_override = Some(7);
        config.projectile.damage = 0;

        let faults = config.validate();
        assert!(faults.contains(&ConfigFault::HealthOutOfRange {
            layout: "Row".into(),
            block: 0,
            health: 9
        }));
        assert!(faults.contains(&ConfigFault::NoBreakableBlocks { layout: "Fortress".into() }));
        assert!(faults.contains(&ConfigFault::InvalidLayoutOverride { index: 7, catalog_len: 3 }));
        assert!(faults.contains(&ConfigFault::NonPositiveDamage(0)));
    }

    #[test]
    fn test_empty_catalog_fault() {
        let config = SessionConfig {
            layouts: vec![],
            ..Default::default()
        };
        assert_eq!(config.validate(), vec![ConfigFault::EmptyCatalog]);
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        let err = SessionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse config"));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = SessionConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
