//! # Entities
//!
//! A positioned actor and the closed set of payloads it can carry.
//!
//! Entities live in the `World` arena and are addressed by [`EntityId`].
//! Zones only hold an id and a glyph per occupied cell, so the arena is
//! the single owner of all entity state.

use std::fmt;
use std::sync::Arc;

use tessera_economy::{EnemyClass, EnemyTemplate, Inventory, ItemTemplate};
use tessera_procedural::ZoneCoord;

/// Unique identifier of an entity within one world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Player state. Owned by a session, mutated by the world.
#[derive(Clone, Debug)]
pub struct PlayerBasis {
    /// Display name.
    pub name: String,
    /// Current health. Zero means downed.
    pub health: u32,
    /// Accumulated experience.
    pub experience: u32,
    /// Level derived from experience.
    pub level: u32,
    /// Carried items.
    pub inventory: Inventory,
    /// Last status line shown to the player.
    pub info: String,
    /// Zone the player stands in, kept in step with the entity.
    pub zone: ZoneCoord,
}

impl PlayerBasis {
    /// A fresh level 1 player.
    #[must_use]
    pub fn new(name: impl Into<String>, health: u32, inventory_capacity: usize) -> Self {
        Self {
            name: name.into(),
            health,
            experience: 0,
            level: 1,
            inventory: Inventory::new(inventory_capacity),
            info: String::new(),
            zone: ZoneCoord::default(),
        }
    }

    /// Returns true once health has run out.
    #[must_use]
    pub const fn is_downed(&self) -> bool {
        self.health == 0
    }
}

/// Per-instance enemy state over a shared template.
#[derive(Clone, Debug)]
pub struct EnemyBasis {
    /// The catalog entry this enemy was spawned from.
    pub template: Arc<EnemyTemplate>,
    /// Remaining health.
    pub health: u32,
}

impl EnemyBasis {
    /// Spawns an instance with the template's starting health.
    #[must_use]
    pub fn new(template: Arc<EnemyTemplate>) -> Self {
        Self {
            health: template.health,
            template,
        }
    }

    /// Enemy class.
    #[must_use]
    pub fn class(&self) -> EnemyClass {
        self.template.class
    }

    /// Enemy level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.template.level
    }

    /// Elemental sign.
    #[must_use]
    pub fn sign(&self) -> char {
        self.template.sign
    }
}

/// An item lying in the world.
#[derive(Clone, Debug)]
pub struct ItemBasis {
    /// The catalog entry.
    pub template: Arc<ItemTemplate>,
}

impl ItemBasis {
    /// Wraps a template.
    #[must_use]
    pub const fn new(template: Arc<ItemTemplate>) -> Self {
        Self { template }
    }

    /// Readable item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.template.name
    }
}

/// The payload an entity carries.
#[derive(Clone, Debug)]
pub enum Basis {
    /// A connected player.
    Player(PlayerBasis),
    /// A hostile creature.
    Enemy(EnemyBasis),
    /// Loot on the ground.
    Item(ItemBasis),
}

/// Discriminant of [`Basis`], for decisions taken before mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasisKind {
    /// [`Basis::Player`].
    Player,
    /// [`Basis::Enemy`].
    Enemy,
    /// [`Basis::Item`].
    Item,
}

impl Basis {
    /// Which variant this is.
    #[must_use]
    pub const fn kind(&self) -> BasisKind {
        match self {
            Self::Player(_) => BasisKind::Player,
            Self::Enemy(_) => BasisKind::Enemy,
            Self::Item(_) => BasisKind::Item,
        }
    }

    /// Current health, if this basis has any.
    #[must_use]
    pub const fn health(&self) -> Option<u32> {
        match self {
            Self::Player(player) => Some(player.health),
            Self::Enemy(enemy) => Some(enemy.health),
            Self::Item(_) => None,
        }
    }
}

/// A positioned actor.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Arena id.
    pub id: EntityId,
    /// Zone containing the entity.
    pub zone: ZoneCoord,
    /// Local X inside the zone.
    pub x: i32,
    /// Local Y inside the zone.
    pub y: i32,
    /// Display glyph, possibly with colour codes.
    pub glyph: Arc<str>,
    /// Payload.
    pub basis: Basis,
    /// True while the entity occupies a cell.
    pub linked: bool,
}

impl Entity {
    /// Player payload, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerBasis> {
        match &self.basis {
            Basis::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Mutable player payload, if this is a player.
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerBasis> {
        match &mut self.basis {
            Basis::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Enemy payload, if this is an enemy.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyBasis> {
        match &self.basis {
            Basis::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Item payload, if this is an item.
    #[must_use]
    pub const fn as_item(&self) -> Option<&ItemBasis> {
        match &self.basis {
            Basis::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Returns true for player entities.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.basis, Basis::Player(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Arc<EnemyTemplate> {
        Arc::new(EnemyTemplate {
            key: "rat".into(),
            health: 3,
            level: 1,
            sign: 'r',
            color: None,
            class: EnemyClass::Soldier,
        })
    }

    #[test]
    fn test_enemy_instance_does_not_touch_template() {
        let template = template();
        let mut enemy = EnemyBasis::new(Arc::clone(&template));
        enemy.health -= 2;
        assert_eq!(enemy.health, 1);
        assert_eq!(template.health, 3);
        assert_eq!(enemy.class(), EnemyClass::Soldier);
    }

    #[test]
    fn test_basis_kind_and_health() {
        let player = Basis::Player(PlayerBasis::new("ada", 20, 8));
        assert_eq!(player.kind(), BasisKind::Player);
        assert_eq!(player.health(), Some(20));

        let enemy = Basis::Enemy(EnemyBasis::new(template()));
        assert_eq!(enemy.kind(), BasisKind::Enemy);
        assert_eq!(enemy.health(), Some(3));
    }

    #[test]
    fn test_fresh_player() {
        let player = PlayerBasis::new("ada", 5, 8);
        assert_eq!(player.level, 1);
        assert_eq!(player.experience, 0);
        assert!(player.inventory.is_empty());
        assert!(!player.is_downed());
    }
}
