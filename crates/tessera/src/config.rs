//! # World Configuration
//!
//! Every tunable of the simulation, loaded once from TOML at start-up.
//!
//! ```toml
//! seed = 1024
//! zone_seeding = "hashed"   # or "legacy"
//! terrain = "noise"         # or "drunken_walk", "boulders"
//! max_enemies_per_zone = 4
//! ```
//!
//! Missing fields fall back to [`WorldConfig::production`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_procedural::{
    GeneratorSettings, TerrainStyle, WorldSeed, ZoneSeeding, MAX_SPAWNS_PER_ZONE, ZONE_HEIGHT, ZONE_WIDTH,
};

use crate::error::{ConfigError, ConfigResult};

/// Simulation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// World seed all generation derives from.
    pub seed: u64,
    /// Per-zone seed derivation.
    pub zone_seeding: ZoneSeeding,
    /// Terrain layout algorithm.
    pub terrain: TerrainStyle,
    /// Upper bound of enemies rolled per zone.
    pub max_enemies_per_zone: u32,
    /// Horizontal reach of enemy aggro around a moving player.
    pub aggro_range_x: i32,
    /// Vertical reach of enemy aggro around a moving player.
    pub aggro_range_y: i32,
    /// Percent chance a bumped player loses one health.
    pub bump_damage_chance: u32,
    /// Items a player can carry.
    pub inventory_capacity: usize,
    /// Health of a freshly joined player.
    pub player_health: u32,
    /// Glyph drawn for players.
    pub player_glyph: String,
    /// Glyph drawn for dropped loot.
    pub loot_glyph: String,
    /// Commands the game loop buffers between ticks.
    pub command_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl WorldConfig {
    /// The shipped defaults.
    #[must_use]
    pub fn production() -> Self {
        Self {
            seed: 1024,
            zone_seeding: ZoneSeeding::Hashed,
            terrain: TerrainStyle::Noise,
            max_enemies_per_zone: 4,
            aggro_range_x: 10,
            aggro_range_y: 8,
            bump_damage_chance: 10,
            inventory_capacity: tessera_economy::DEFAULT_CAPACITY,
            player_health: 20,
            player_glyph: "@".to_string(),
            loot_glyph: "+".to_string(),
            command_capacity: 1024,
        }
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed TOML or unknown keys,
    /// `ConfigError::Invalid` if a value is out of range.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise
    /// the errors of [`WorldConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), seed = config.seed, "world config loaded");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &'static str, reason: &str| -> ConfigResult<()> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.bump_damage_chance > 100 {
            return invalid("bump_damage_chance", "must be a percentage (0-100)");
        }
        if self.aggro_range_x < 0 || self.aggro_range_y < 0 {
            return invalid("aggro_range", "must not be negative");
        }
        if self.aggro_range_x > ZONE_WIDTH as i32 {
            return invalid("aggro_range_x", "must not exceed the zone width");
        }
        if self.aggro_range_y > ZONE_HEIGHT as i32 {
            return invalid("aggro_range_y", "must not exceed the zone height");
        }
        if self.max_enemies_per_zone > MAX_SPAWNS_PER_ZONE {
            return invalid("max_enemies_per_zone", "too many enemies for one zone");
        }
        if self.inventory_capacity == 0 {
            return invalid("inventory_capacity", "must be at least 1");
        }
        if self.player_health == 0 {
            return invalid("player_health", "must be at least 1");
        }
        if self.command_capacity == 0 {
            return invalid("command_capacity", "must be at least 1");
        }
        if self.player_glyph.is_empty() {
            return invalid("player_glyph", "must not be empty");
        }
        if self.loot_glyph.is_empty() {
            return invalid("loot_glyph", "must not be empty");
        }
        Ok(())
    }

    /// The world seed.
    #[must_use]
    pub const fn world_seed(&self) -> WorldSeed {
        WorldSeed::new(self.seed)
    }

    /// Zone generator settings derived from this config.
    #[must_use]
    pub const fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            seeding: self.zone_seeding,
            style: self.terrain,
            max_enemies: self.max_enemies_per_zone,
        }
    }
}
