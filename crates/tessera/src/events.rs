//! # World Events
//!
//! Notable things that happened during simulation, in the order they
//! happened. The world buffers them and the caller drains them once per
//! tick, typically to fan out to connected sessions.

use tessera_procedural::ZoneCoord;

use crate::entity::EntityId;

/// Something observable that happened in the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    // =========================================================================
    // Generation
    // =========================================================================
    /// A zone was generated on first access.
    ZoneGenerated {
        /// The new zone.
        zone: ZoneCoord,
        /// Enemies spawned into it.
        enemies: usize,
    },

    // =========================================================================
    // Combat
    // =========================================================================
    /// An enemy was hit and survived.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EntityId,
        /// Health left.
        health_remaining: u32,
    },

    /// An enemy died.
    EnemyKilled {
        /// Enemy that died.
        enemy: EntityId,
        /// Player credited with the kill, if any.
        killer: Option<EntityId>,
        /// Experience awarded to the killer.
        experience: u32,
    },

    /// A slain enemy left loot behind.
    LootDropped {
        /// The new item entity.
        item: EntityId,
        /// Zone it lies in.
        zone: ZoneCoord,
        /// Local position.
        position: (i32, i32),
        /// Readable item name.
        name: String,
    },

    /// Something walked into a player.
    PlayerBumped {
        /// Player that was bumped.
        player: EntityId,
        /// Entity that walked into it.
        by: EntityId,
        /// Whether the bump cost health.
        damaged: bool,
    },

    /// A player's health reached zero.
    PlayerDowned {
        /// The player.
        player: EntityId,
    },

    // =========================================================================
    // Items
    // =========================================================================
    /// A player picked up an item.
    ItemPickedUp {
        /// The player.
        player: EntityId,
        /// Readable item name.
        name: String,
    },

    /// A player stepped on an item but had no room for it.
    InventoryFull {
        /// The player.
        player: EntityId,
        /// Readable item name.
        name: String,
    },

    // =========================================================================
    // Movement
    // =========================================================================
    /// An entity moved into a different zone.
    ZoneCrossed {
        /// The entity.
        entity: EntityId,
        /// Zone it left.
        from: ZoneCoord,
        /// Zone it entered.
        to: ZoneCoord,
    },
}
