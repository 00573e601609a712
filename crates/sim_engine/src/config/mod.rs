//! Configuration system
//!
//! All numeric defaults for the simulation live here: behavior priorities,
//! entity mass and limits, and world friction/gravity. Values are read once
//! at construction time and passed by reference to the `World` and `Entity`
//! factories; there is no process-wide mutable state.
//!
//! Loading from a file is best-effort: a missing or malformed file falls
//! back to the built-in defaults, so callers can always rely on a usable
//! configuration.

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Configuration schema version
    pub version: u32,

    /// Behavior module settings
    pub behavior: BehaviorConfig,

    /// Entity defaults
    pub entity: EntityConfig,

    /// World attributes
    pub world: WorldConfig,
}

/// Behavior module settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Default scheduling priority for behavior modules (lower runs first)
    pub default_priority: i8,

    /// Scheduling priority for the player input module
    pub player_input_priority: i8,

    /// Standoff distance for the follow behavior
    pub follow_distance: f32,
}

/// Entity defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Mass in kilograms
    pub mass: f32,

    /// Characteristic radius used to derive moment of inertia
    pub radius: f32,

    /// Material friction coefficient, conventionally in [0, 1]
    pub friction: f32,

    /// Material restitution coefficient, conventionally in [0, 1]
    pub restitution: f32,

    /// Maximum acceleration in meters per second squared
    pub max_acceleration: f32,

    /// Maximum speed in meters per second
    pub max_speed: f32,

    /// Maximum angular velocity in radians per second
    pub max_angular_velocity: f32,

    /// Name of the visual resource for this entity
    pub visual_name: String,
}

/// World attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World friction coefficient applied to all entities
    pub friction: f32,

    /// Gravity constant in meters per second squared
    pub gravity: f32,

    /// World width (boundary extent along x, origin at 0)
    pub width: f32,

    /// World height (boundary extent along y, origin at 0)
    pub height: f32,

    /// Display scale in meters per pixel
    pub meters_per_pixel: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            version: 1,
            behavior: BehaviorConfig::default(),
            entity: EntityConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_priority: 5,
            player_input_priority: 1,
            follow_distance: 20.0,
        }
    }
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            mass: 5.0,
            radius: 16.0,
            friction: 0.4,
            restitution: 0.9,
            max_acceleration: 100.0,
            max_speed: 300.0,
            max_angular_velocity: 6.0,
            visual_name: "default_entity.png".to_string(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            friction: 0.5,
            gravity: 9.8,
            width: 800.0,
            height: 600.0,
            meters_per_pixel: 0.1,
        }
    }
}

impl SimConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load configuration from file, falling back to defaults on any error
    ///
    /// The simulation contract only requires defaults; a config file is an
    /// optional override. Failures are logged and never propagated.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config from {}: {}; using defaults", path, e);
                Self::default()
            }
        }
    }
}
