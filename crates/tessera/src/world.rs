//! # World
//!
//! The lazily generated zone lattice and the arena of every entity in it.
//!
//! ## Ownership
//!
//! ```text
//! World
//!  ├─ zones:    ZoneCoord -> Zone      (terrain + occupancy, never evicted)
//!  ├─ registry: EntityId  -> Entity    (all entity state)
//!  │            enemies[], items[]     (live bookkeeping)
//!  └─ rng:      one stream for every rule roll
//! ```
//!
//! Occupancy truth lives in the zones. An entity is *linked* while it
//! holds a tile; registering an entity and linking it are separate steps.
//!
//! All operations take `&mut self` and run to completion, so a caller
//! that shares a world between threads must serialise access to it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_economy::{Catalog, LootTable};
use tessera_procedural::{GeneratedZone, ZoneCoord, ZoneGenerator};

use crate::config::WorldConfig;
use crate::entity::{Basis, BasisKind, EnemyBasis, Entity, EntityId, PlayerBasis};
use crate::events::WorldEvent;
use crate::zone::Zone;

/// Sub-seed purpose for the rule roll stream.
const RULES_STREAM: u64 = 0x7275_6c65_73;

/// Entity arena plus the enemy and item lists.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    pub(crate) entities: HashMap<EntityId, Entity>,
    pub(crate) enemies: Vec<EntityId>,
    pub(crate) items: Vec<EntityId>,
    next_id: u64,
}

impl Registry {
    fn insert(&mut self, zone: ZoneCoord, x: i32, y: i32, glyph: Arc<str>, basis: Basis) -> EntityId {
        self.next_id += 1;
        let id = EntityId::new(self.next_id);
        match basis.kind() {
            BasisKind::Enemy => self.enemies.push(id),
            BasisKind::Item => self.items.push(id),
            BasisKind::Player => {}
        }
        self.entities.insert(
            id,
            Entity {
                id,
                zone,
                x,
                y,
                glyph,
                basis,
                linked: false,
            },
        );
        id
    }

    pub(crate) fn forget(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        match entity.basis.kind() {
            BasisKind::Enemy => self.enemies.retain(|e| *e != id),
            BasisKind::Item => self.items.retain(|i| *i != id),
            BasisKind::Player => {}
        }
        Some(entity)
    }
}

/// The simulated world.
#[derive(Debug)]
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) loot: LootTable,
    generator: ZoneGenerator,
    pub(crate) zones: HashMap<ZoneCoord, Zone>,
    pub(crate) registry: Registry,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) events: Vec<WorldEvent>,
    player_glyph: Arc<str>,
    pub(crate) loot_glyph: Arc<str>,
}

impl World {
    /// Creates an empty world. Zones are generated on first access.
    #[must_use]
    pub fn new(config: WorldConfig, catalog: Arc<Catalog>) -> Self {
        let seed = config.world_seed();
        let generator = ZoneGenerator::new(seed, config.generator_settings());
        tracing::info!(
            seed = seed.value(),
            seeding = ?config.zone_seeding,
            terrain = ?config.terrain,
            enemy_kinds = catalog.enemy_count(),
            "world created"
        );

        Self {
            loot: LootTable::new(&catalog),
            rng: ChaCha8Rng::seed_from_u64(seed.derive(RULES_STREAM).value()),
            player_glyph: Arc::from(config.player_glyph.as_str()),
            loot_glyph: Arc::from(config.loot_glyph.as_str()),
            generator,
            zones: HashMap::new(),
            registry: Registry::default(),
            events: Vec::new(),
            config,
            catalog,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Template catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    // =========================================================================
    // Zones
    // =========================================================================

    /// Returns a zone, generating it on first access.
    pub fn get_zone(&mut self, coord: ZoneCoord) -> &Zone {
        self.zone_mut(coord)
    }

    /// Mutable access to a zone, generating it on first access.
    pub fn zone_mut(&mut self, coord: ZoneCoord) -> &mut Zone {
        match self.zones.entry(coord) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let generated = self.generator.generate(coord, self.catalog.enemy_count());
                let zone = populate(generated, &self.catalog, &mut self.registry, &mut self.events);
                entry.insert(zone)
            }
        }
    }

    /// A zone if it has already been generated.
    #[must_use]
    pub fn zone(&self, coord: ZoneCoord) -> Option<&Zone> {
        self.zones.get(&coord)
    }

    /// Number of generated zones.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Registers an entity without placing it on the map.
    ///
    /// The target zone is generated if needed. Call [`World::link_entity`]
    /// to occupy the tile.
    pub fn add_entity(
        &mut self,
        coord: ZoneCoord,
        x: i32,
        y: i32,
        glyph: impl Into<Arc<str>>,
        basis: Basis,
    ) -> EntityId {
        self.zone_mut(coord);
        self.registry.insert(coord, x, y, glyph.into(), basis)
    }

    /// Places a registered entity on its tile.
    ///
    /// Returns false if the entity is unknown, its tile is out of bounds
    /// or another entity holds the tile.
    pub fn link_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.registry.entities.get(&id) else {
            return false;
        };
        let (coord, x, y, glyph) = (entity.zone, entity.x, entity.y, Arc::clone(&entity.glyph));

        let placed = self.zone_mut(coord).set_entity(id, glyph, x, y);
        if !placed {
            return false;
        }
        if let Some(entity) = self.registry.entities.get_mut(&id) {
            entity.linked = true;
            if let Some(player) = entity.as_player_mut() {
                player.zone = coord;
            }
        }
        true
    }

    /// Lifts an entity off the map, keeping it registered.
    ///
    /// Returns true if the entity was holding a tile.
    pub fn unlink_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.registry.entities.get_mut(&id) else {
            return false;
        };
        if !entity.linked {
            return false;
        }
        entity.linked = false;
        let (coord, x, y) = (entity.zone, entity.x, entity.y);
        self.zones
            .get_mut(&coord)
            .is_some_and(|zone| zone.remove_entity(id, x, y))
    }

    /// Unlinks and forgets an entity, handing its final state back.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.unlink_entity(id);
        self.registry.forget(id)
    }

    /// Registers a fresh player on a random free tile of `coord` and
    /// links it.
    ///
    /// Returns `None` if the zone has no free tile left.
    pub fn spawn_player(&mut self, name: impl Into<String>, coord: ZoneCoord) -> Option<EntityId> {
        self.zone_mut(coord);
        let (x, y) = self
            .zones
            .get(&coord)
            .and_then(|zone| zone.find_free_place(&mut self.rng))?;

        let name = name.into();
        let mut basis = PlayerBasis::new(
            name.clone(),
            self.config.player_health,
            self.config.inventory_capacity,
        );
        basis.zone = coord;

        let glyph = Arc::clone(&self.player_glyph);
        let id = self.add_entity(coord, x, y, glyph, Basis::Player(basis));
        self.link_entity(id);
        tracing::info!(%id, %name, zone_x = coord.x, zone_y = coord.y, x, y, "player joined");
        Some(id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Any entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.entities.get(&id)
    }

    /// Player state by id.
    #[must_use]
    pub fn player(&self, id: EntityId) -> Option<&PlayerBasis> {
        self.entity(id).and_then(Entity::as_player)
    }

    /// Mutable player state, for the session that owns the player.
    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut PlayerBasis> {
        self.registry
            .entities
            .get_mut(&id)
            .and_then(Entity::as_player_mut)
    }

    /// Live enemies, in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[EntityId] {
        &self.registry.enemies
    }

    /// Items lying on the ground, in drop order.
    #[must_use]
    pub fn items(&self) -> &[EntityId] {
        &self.registry.items
    }

    /// Number of registered entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.registry.entities.len()
    }

    /// Renders the zone an entity stands in.
    #[must_use]
    pub fn render_world(&self, id: EntityId) -> Option<String> {
        let entity = self.entity(id)?;
        self.zone(entity.zone).map(Zone::render)
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Turns generated terrain into a live zone with its enemies linked.
fn populate(
    mut generated: GeneratedZone,
    catalog: &Catalog,
    registry: &mut Registry,
    events: &mut Vec<WorldEvent>,
) -> Zone {
    let coord = generated.coord;
    let spawns = std::mem::take(&mut generated.spawns);
    let mut zone = Zone::new(generated);

    let mut spawned = 0;
    for spawn in spawns {
        let Some(template) = catalog.enemy_at(spawn.template) else {
            continue;
        };
        if !zone.is_free(spawn.x, spawn.y) {
            continue;
        }
        let glyph: Arc<str> = Arc::from(template.glyph());
        let basis = Basis::Enemy(EnemyBasis::new(Arc::clone(template)));
        let id = registry.insert(coord, spawn.x, spawn.y, Arc::clone(&glyph), basis);
        if zone.set_entity(id, glyph, spawn.x, spawn.y) {
            if let Some(entity) = registry.entities.get_mut(&id) {
                entity.linked = true;
            }
            spawned += 1;
        }
    }

    tracing::debug!(
        zone_x = coord.x,
        zone_y = coord.y,
        seed = zone.seed().value(),
        enemies = spawned,
        "zone populated"
    );
    events.push(WorldEvent::ZoneGenerated {
        zone: coord,
        enemies: spawned,
    });
    zone
}
