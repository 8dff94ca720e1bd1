//! Session Configuration
//!
//! The immutable tuning bundle handed to the simulation at construction.
//! Every struct deserializes with `#[serde(default)]`, so a JSON document
//! only needs the keys it wants to override.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::core::vec2::{Real, Vec2};
use crate::TICK_RATE;

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid JSON for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its permitted range.
    #[error("Invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Arena dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width in units
    pub width: Real,
    /// Arena height in units
    pub height: Real,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Player-controlled actor tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Spawn X
    pub start_x: Real,
    /// Spawn Y, `None` for the vertical centre of the arena
    pub start_y: Option<Real>,
    /// Units moved per tick per input axis
    pub speed: Real,
    /// Starting and maximum health
    pub max_health: Real,
    /// Collision radius, also the clamp margin at the arena edge
    pub radius: Real,
    /// Minimum time between shots (milliseconds)
    pub fire_interval_ms: u64,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            start_x: 150.0,
            start_y: None,
            speed: 5.0,
            max_health: 100.0,
            radius: 40.0,
            fire_interval_ms: 300,
        }
    }
}

/// Projectile tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Units travelled per tick
    pub speed: Real,
    /// Damage applied on hit
    pub damage: Real,
    /// Collision radius
    pub radius: Real,
    /// Distance past the arena edge before a projectile expires
    pub offscreen_margin: Real,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            damage: 25.0,
            radius: 8.0,
            offscreen_margin: 50.0,
        }
    }
}

/// Pursuer (enemy) tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    /// Units moved per tick towards the actor
    pub speed: Real,
    /// Starting and maximum health
    pub max_health: Real,
    /// Collision radius
    pub radius: Real,
    /// Nominal damage per second while touching the actor
    pub contact_damage_per_second: Real,
    /// Score granted for a kill
    pub kill_reward: u32,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            max_health: 50.0,
            radius: 30.0,
            contact_damage_per_second: 10.0,
            kill_reward: 10,
        }
    }
}

/// Spawn cadence and placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Minimum time between spawns (milliseconds)
    pub interval_ms: u64,
    /// Distance beyond the right arena edge where pursuers appear
    pub offset_x: Real,
    /// Smallest spawn Y
    pub top_margin: Real,
    /// Spawn Y stays at least this far above the bottom edge
    pub bottom_margin: Real,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            offset_x: 30.0,
            top_margin: 50.0,
            bottom_margin: 50.0,
        }
    }
}

/// Complete session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Arena dimensions
    pub arena: ArenaConfig,
    /// Actor tuning
    pub actor: ActorConfig,
    /// Projectile tuning
    pub projectile: ProjectileConfig,
    /// Pursuer tuning
    pub pursuer: PursuerConfig,
    /// Spawn cadence
    pub spawn: SpawnConfig,
    /// Ticks per second assumed when converting per-second contact damage
    pub assumed_tick_rate: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            actor: ActorConfig::default(),
            projectile: ProjectileConfig::default(),
            pursuer: PursuerConfig::default(),
            spawn: SpawnConfig::default(),
            assumed_tick_rate: TICK_RATE,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Contact damage applied per tick of overlap.
    ///
    /// Uses the assumed tick rate, not measured frame time.
    #[inline]
    pub fn contact_damage_per_tick(&self) -> Real {
        self.pursuer.contact_damage_per_second / self.assumed_tick_rate as Real
    }

    /// Where the actor starts, before clamping into bounds.
    #[inline]
    pub fn actor_start(&self) -> Vec2 {
        let y = self.actor.start_y.unwrap_or(self.arena.height / 2.0);
        Vec2::new(self.actor.start_x, y)
    }

    /// Lowest corner the actor's centre may occupy.
    #[inline]
    pub fn actor_min_position(&self) -> Vec2 {
        Vec2::new(self.actor.radius, self.actor.radius)
    }

    /// Highest corner the actor's centre may occupy.
    #[inline]
    pub fn actor_max_position(&self) -> Vec2 {
        Vec2::new(
            self.arena.width - self.actor.radius,
            self.arena.height - self.actor.radius,
        )
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: Real) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must be finite and positive" })
            }
        }

        fn non_negative(field: &'static str, value: Real) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must be finite and non-negative" })
            }
        }

        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;

        non_negative("actor.start_x", self.actor.start_x)?;
        if let Some(start_y) = self.actor.start_y {
            non_negative("actor.start_y", start_y)?;
        }
        non_negative("actor.speed", self.actor.speed)?;
        positive("actor.max_health", self.actor.max_health)?;
        non_negative("actor.radius", self.actor.radius)?;
        if self.arena.width <= 2.0 * self.actor.radius {
            return Err(ConfigError::Invalid {
                field: "actor.radius",
                reason: "arena is too narrow to hold the actor",
            });
        }
        if self.arena.height <= 2.0 * self.actor.radius {
            return Err(ConfigError::Invalid {
                field: "actor.radius",
                reason: "arena is too short to hold the actor",
            });
        }

        positive("projectile.speed", self.projectile.speed)?;
        non_negative("projectile.damage", self.projectile.damage)?;
        non_negative("projectile.radius", self.projectile.radius)?;
        non_negative("projectile.offscreen_margin", self.projectile.offscreen_margin)?;

        non_negative("pursuer.speed", self.pursuer.speed)?;
        positive("pursuer.max_health", self.pursuer.max_health)?;
        non_negative("pursuer.radius", self.pursuer.radius)?;
        non_negative("pursuer.contact_damage_per_second", self.pursuer.contact_damage_per_second)?;

        non_negative("spawn.offset_x", self.spawn.offset_x)?;
        non_negative("spawn.top_margin", self.spawn.top_margin)?;
        non_negative("spawn.bottom_margin", self.spawn.bottom_margin)?;
        if self.spawn.top_margin > self.arena.height - self.spawn.bottom_margin {
            return Err(ConfigError::Invalid {
                field: "spawn.top_margin",
                reason: "spawn band is empty",
            });
        }

        if self.assumed_tick_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "assumed_tick_rate",
                reason: "must be at least 1",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.actor_start(), Vec2::new(150.0, 360.0));
        assert_eq!(config.assumed_tick_rate, 60);
    }

    #[test]
    fn test_contact_damage_per_tick_uses_fixed_divisor() {
        let config = GameConfig::default();
        assert_eq!(config.contact_damage_per_tick(), 10.0 / 60.0);
    }

    #[test]
    fn test_partial_json_overrides_only_named_keys() {
        let config = GameConfig::from_json_str(
            r#"{ "pursuer": { "speed": 3.0 }, "spawn": { "interval_ms": 500 } }"#,
        )
        .unwrap();

        assert_eq!(config.pursuer.speed, 3.0);
        assert_eq!(config.pursuer.max_health, 50.0);
        assert_eq!(config.spawn.interval_ms, 500);
        assert_eq!(config.arena, ArenaConfig::default());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(GameConfig::from_json_str("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut config = GameConfig::default();
        config.arena.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "arena.width", .. })
        ));

        let mut config = GameConfig::default();
        config.pursuer.speed = Real::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "pursuer.speed", .. })
        ));

        let mut config = GameConfig::default();
        config.actor.radius = 400.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "actor.radius", .. })
        ));

        let mut config = GameConfig::default();
        config.spawn.top_margin = 700.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "spawn.top_margin", .. })
        ));

        let mut config = GameConfig::default();
        config.projectile.speed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "projectile.speed", .. })
        ));

        let mut config = GameConfig::default();
        config.assumed_tick_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_y_follows_arena_height() {
        let config = GameConfig::from_json_str(r#"{ "arena": { "height": 400 } }"#).unwrap();
        assert_eq!(config.actor.start_y, None);
        assert_eq!(config.actor_start(), Vec2::new(150.0, 200.0));

        let config = GameConfig::from_json_str(r#"{ "actor": { "start_y": 90.0 } }"#).unwrap();
        assert_eq!(config.actor_start(), Vec2::new(150.0, 90.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load("/nonexistent/archer-survival.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_actor_bounds() {
        let config = GameConfig::default();
        assert_eq!(config.actor_min_position(), Vec2::new(40.0, 40.0));
        assert_eq!(config.actor_max_position(), Vec2::new(1240.0, 680.0));
    }
}
