//! # Template Catalog
//!
//! Immutable enemy and item templates, loaded once at process start.
//!
//! ## File Format
//!
//! ```toml
//! [enemies.rat]
//! health = 2
//! level = 1
//! sign = "r"
//! color = "yellow"
//! type = 0
//!
//! [items.bandage]
//! name = "dirty bandage"
//! rate = 60
//! enemies = [0, 1]
//! condition = "health < 10"
//! attributes = { heal = 3 }
//! ```
//!
//! Tables are keyed by name and iterated in name order, so every index
//! handed out by the catalog is stable for a given file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};

/// Enemy class ordinal. Drives experience rewards and loot eligibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum EnemyClass {
    /// Type 0.
    Minion = 0,
    /// Type 1.
    Soldier = 1,
    /// Type 2.
    Elite = 2,
    /// Type 3.
    Boss = 3,
}

impl EnemyClass {
    /// All classes in ordinal order.
    pub const ALL: [Self; 4] = [Self::Minion, Self::Soldier, Self::Elite, Self::Boss];

    /// Experience granted for a kill.
    #[inline]
    #[must_use]
    pub const fn experience_reward(self) -> u32 {
        match self {
            Self::Minion => 10,
            Self::Soldier => 30,
            Self::Elite => 50,
            Self::Boss => 100,
        }
    }

    /// Ordinal as stored in catalog files.
    #[inline]
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EnemyClass {
    type Error = EconomyError;

    fn try_from(value: u8) -> EconomyResult<Self> {
        match value {
            0 => Ok(Self::Minion),
            1 => Ok(Self::Soldier),
            2 => Ok(Self::Elite),
            3 => Ok(Self::Boss),
            other => Err(EconomyError::UnknownEnemyClass(other)),
        }
    }
}

impl From<EnemyClass> for u8 {
    fn from(class: EnemyClass) -> Self {
        class.ordinal()
    }
}

/// Terminal colour for an enemy glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphColor {
    /// ANSI red.
    Red,
    /// ANSI green.
    Green,
    /// ANSI yellow.
    Yellow,
    /// ANSI blue.
    Blue,
    /// ANSI magenta.
    Magenta,
    /// ANSI cyan.
    Cyan,
    /// ANSI white.
    White,
}

impl GlyphColor {
    /// Escape sequence that switches to this colour.
    #[must_use]
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Blue => "\x1b[34m",
            Self::Magenta => "\x1b[35m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
        }
    }
}

/// Immutable enemy template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    /// Catalog key. Filled in from the table name.
    #[serde(skip)]
    pub key: String,
    /// Starting health of every instance.
    pub health: u32,
    /// Enemy level.
    pub level: u32,
    /// Display sign.
    pub sign: char,
    /// Optional tint for the sign.
    #[serde(default)]
    pub color: Option<GlyphColor>,
    /// Enemy class.
    #[serde(rename = "type")]
    pub class: EnemyClass,
}

impl EnemyTemplate {
    /// The sign wrapped in its colour codes, ready for a terminal.
    #[must_use]
    pub fn glyph(&self) -> String {
        match self.color {
            Some(color) => format!("{}{}\x1b[0m", color.ansi(), self.sign),
            None => self.sign.to_string(),
        }
    }
}

/// Immutable item template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Catalog key. Filled in from the table name.
    #[serde(skip)]
    pub key: String,
    /// Human readable name.
    pub name: String,
    /// Free-form attribute bag.
    #[serde(default)]
    pub attributes: toml::Table,
    /// Drop rate in percent (0-100).
    pub rate: u8,
    /// Enemy classes that can drop this item.
    pub enemies: BTreeSet<EnemyClass>,
    /// Spawn condition, interpreted by the caller.
    #[serde(default)]
    pub condition: String,
}

impl ItemTemplate {
    /// Returns true if enemies of `class` may drop this item.
    #[inline]
    #[must_use]
    pub fn drops_from(&self, class: EnemyClass) -> bool {
        self.enemies.contains(&class)
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    enemies: BTreeMap<String, EnemyTemplate>,
    #[serde(default)]
    items: BTreeMap<String, ItemTemplate>,
}

/// The complete, validated template catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    enemies: BTreeMap<String, Arc<EnemyTemplate>>,
    items: BTreeMap<String, Arc<ItemTemplate>>,
    enemy_order: Vec<Arc<EnemyTemplate>>,
}

impl Catalog {
    /// Builds a catalog from already-constructed templates.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::InvalidConfig` if validation fails.
    pub fn from_templates(
        enemies: impl IntoIterator<Item = EnemyTemplate>,
        items: impl IntoIterator<Item = ItemTemplate>,
    ) -> EconomyResult<Self> {
        let enemies: BTreeMap<_, _> = enemies
            .into_iter()
            .map(|e| (e.key.clone(), Arc::new(e)))
            .collect();
        let items: BTreeMap<_, _> = items
            .into_iter()
            .map(|i| (i.key.clone(), Arc::new(i)))
            .collect();
        let enemy_order = enemies.values().cloned().collect();

        let catalog = Self {
            enemies,
            items,
            enemy_order,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::Parse` on malformed TOML, or
    /// `EconomyError::InvalidConfig` if validation fails.
    pub fn from_toml_str(text: &str) -> EconomyResult<Self> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| EconomyError::Parse(e.to_string()))?;

        let enemies = file.enemies.into_iter().map(|(key, mut enemy)| {
            enemy.key = key;
            enemy
        });
        let items = file.items.into_iter().map(|(key, mut item)| {
            item.key = key;
            item
        });
        Self::from_templates(enemies, items)
    }

    /// Loads a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::Io` if the file cannot be read, otherwise
    /// the errors of [`Catalog::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EconomyError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            enemies = catalog.enemy_count(),
            items = catalog.items.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    fn validate(&self) -> EconomyResult<()> {
        if self.enemies.is_empty() {
            return Err(EconomyError::InvalidConfig(
                "catalog defines no enemies".into(),
            ));
        }
        for (key, enemy) in &self.enemies {
            if enemy.health == 0 {
                return Err(EconomyError::InvalidConfig(format!(
                    "enemy {key} has zero health"
                )));
            }
        }
        for (key, item) in &self.items {
            if item.rate > 100 {
                return Err(EconomyError::InvalidConfig(format!(
                    "item {key} has drop rate {} above 100",
                    item.rate
                )));
            }
            if item.name.trim().is_empty() {
                return Err(EconomyError::InvalidConfig(format!(
                    "item {key} has no readable name"
                )));
            }
        }
        Ok(())
    }

    /// Looks up an enemy template by key.
    #[must_use]
    pub fn enemy(&self, key: &str) -> Option<&Arc<EnemyTemplate>> {
        self.enemies.get(key)
    }

    /// Looks up an item template by key.
    #[must_use]
    pub fn item(&self, key: &str) -> Option<&Arc<ItemTemplate>> {
        self.items.get(key)
    }

    /// Enemy template at a stable index (key order).
    #[must_use]
    pub fn enemy_at(&self, index: usize) -> Option<&Arc<EnemyTemplate>> {
        self.enemy_order.get(index)
    }

    /// Number of enemy templates.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemy_order.len()
    }

    /// All enemy templates in key order.
    pub fn enemies(&self) -> impl Iterator<Item = &Arc<EnemyTemplate>> {
        self.enemy_order.iter()
    }

    /// All item templates in key order.
    pub fn items(&self) -> impl Iterator<Item = &Arc<ItemTemplate>> {
        self.items.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [enemies.rat]
        health = 2
        level = 1
        sign = "r"
        color = "yellow"
        type = 0

        [enemies.troll]
        health = 12
        level = 5
        sign = "T"
        type = 2

        [items.bandage]
        name = "dirty bandage"
        rate = 60
        enemies = [0, 1]
        attributes = { heal = 3 }

        [items.club]
        name = "troll club"
        rate = 25
        enemies = [2]
        condition = "level > 3"
    "#;

    #[test]
    fn test_parse_sample() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.enemy_count(), 2);

        let rat = catalog.enemy("rat").unwrap();
        assert_eq!(rat.key, "rat");
        assert_eq!(rat.class, EnemyClass::Minion);
        assert_eq!(rat.glyph(), "\x1b[33mr\x1b[0m");

        let troll = catalog.enemy("troll").unwrap();
        assert_eq!(troll.glyph(), "T");

        let club = catalog.item("club").unwrap();
        assert_eq!(club.name, "troll club");
        assert!(club.drops_from(EnemyClass::Elite));
        assert!(!club.drops_from(EnemyClass::Minion));
        assert_eq!(club.condition, "level > 3");
        assert_eq!(
            catalog.item("bandage").unwrap().attributes.get("heal"),
            Some(&toml::Value::Integer(3))
        );
    }

    #[test]
    fn test_enemy_order_is_key_order() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        let keys: Vec<_> = catalog.enemies().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["rat", "troll"]);
        assert_eq!(catalog.enemy_at(1).unwrap().key, "troll");
        assert!(catalog.enemy_at(2).is_none());
    }

    #[test]
    fn test_rejects_unknown_class() {
        let text = "[enemies.ghost]\nhealth = 1\nlevel = 1\nsign = \"g\"\ntype = 7\n";
        assert!(matches!(Catalog::from_toml_str(text), Err(EconomyError::Parse(_))));
    }

    #[test]
    fn test_rejects_rate_above_hundred() {
        let text = "[enemies.rat]\nhealth = 1\nlevel = 1\nsign = \"r\"\ntype = 0\n\
                    [items.gem]\nname = \"gem\"\nrate = 101\nenemies = [0]\n";
        assert!(matches!(
            Catalog::from_toml_str(text),
            Err(EconomyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_empty_enemy_table() {
        assert!(matches!(
            Catalog::from_toml_str(""),
            Err(EconomyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Catalog::load("/definitely/not/here.toml"),
            Err(EconomyError::Io { .. })
        ));
    }

    #[test]
    fn test_class_rewards() {
        let rewards: Vec<_> = EnemyClass::ALL.iter().map(|c| c.experience_reward()).collect();
        assert_eq!(rewards, [10, 30, 50, 100]);
        assert_eq!(EnemyClass::try_from(4), Err(EconomyError::UnknownEnemyClass(4)));
    }
}
