//! # Collision and Combat Rules
//!
//! Every interaction between a mover and a target tile, checked in order:
//!
//! | Target                         | Effect                               | Blocks |
//! |--------------------------------|--------------------------------------|--------|
//! | Outside the zone / not open    | none                                 | yes    |
//! | Player (not the mover)         | bump, may cost the player 1 health   | yes    |
//! | Enemy, mover is a player       | 1 damage; experience on a kill       | see below |
//! | Item, mover is a player        | pick up if the inventory has room    | only if full |
//! | Anything else                  | none                                 | yes    |
//! | Nobody                         | none                                 | no     |
//!
//! Hitting an enemy blocks while it survives. A kill that leaves loot
//! still blocks, because the loot now holds the tile. A kill without
//! loot clears the tile and the mover steps in. Both kinds of kill pay
//! out experience.

use std::sync::Arc;

use rand::Rng;
use tessera_economy::{level_for_experience, EnemyClass};
use tessera_procedural::{TileKind, ZoneCoord};

use crate::entity::{Basis, BasisKind, EnemyBasis, Entity, EntityId, ItemBasis};
use crate::events::WorldEvent;
use crate::world::World;

/// Result of damaging an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The target has no health (an item) or does not exist.
    Absorbed,
    /// The target took the hit and lives.
    Survived {
        /// Health left.
        health: u32,
    },
    /// A player ran out of health. It stays on the map.
    Downed,
    /// An enemy died and left nothing behind.
    Slain,
    /// An enemy died and dropped loot on its tile.
    SlainWithDrop {
        /// The dropped item entity.
        item: EntityId,
    },
}

impl DamageOutcome {
    /// Whether a mover attacking the target stays where it is.
    #[inline]
    #[must_use]
    pub const fn blocks(&self) -> bool {
        !matches!(self, Self::Slain)
    }

    /// Whether the attacker earns experience.
    #[inline]
    #[must_use]
    pub const fn awards_experience(&self) -> bool {
        matches!(self, Self::Slain | Self::SlainWithDrop { .. })
    }
}

/// What a mover ran into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    /// Open ground, nobody there.
    Clear,
    /// Target lies outside the zone.
    OutOfBounds,
    /// Target terrain is not open ground.
    Terrain(TileKind),
    /// Target is a player.
    Bumped {
        /// The player that was bumped.
        player: EntityId,
        /// Whether it lost health.
        damaged: bool,
    },
    /// Target is an enemy and the mover a player.
    Fought {
        /// The enemy.
        enemy: EntityId,
        /// What the hit did.
        outcome: DamageOutcome,
        /// Experience paid to the mover.
        experience: u32,
    },
    /// Target is an item the mover picked up.
    PickedUp {
        /// The item entity, now gone.
        item: EntityId,
        /// Readable item name.
        name: String,
    },
    /// Target is an item the mover has no room for.
    InventoryFull {
        /// The item entity.
        item: EntityId,
        /// Readable item name.
        name: String,
    },
    /// Target holds an entity this mover cannot interact with.
    Occupied(EntityId),
}

impl Collision {
    /// Whether the mover must stay where it is.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        match self {
            Self::Clear | Self::PickedUp { .. } => false,
            Self::Fought { outcome, .. } => outcome.blocks(),
            Self::OutOfBounds
            | Self::Terrain(_)
            | Self::Bumped { .. }
            | Self::InventoryFull { .. }
            | Self::Occupied(_) => true,
        }
    }
}

impl World {
    /// Resolves `mover` entering tile `(x, y)` of zone `coord`.
    ///
    /// Applies every side effect of the interaction (damage, experience,
    /// pickup) but never moves the mover itself.
    pub fn collide(&mut self, mover: EntityId, coord: ZoneCoord, x: i32, y: i32) -> Collision {
        let mover_kind = self.entity(mover).map(|e| e.basis.kind());
        let zone = self.zone_mut(coord);

        let occupant = match zone.tile(x, y) {
            None => return Collision::OutOfBounds,
            Some(kind) if !kind.is_empty() => return Collision::Terrain(kind),
            Some(_) => zone.occupant(x, y).map(|o| o.id),
        };
        let Some(occupant) = occupant else {
            return Collision::Clear;
        };
        if occupant == mover {
            return Collision::Occupied(occupant);
        }

        match (self.entity(occupant).map(|e| e.basis.kind()), mover_kind) {
            (Some(BasisKind::Player), _) => self.bump(occupant, mover),
            (Some(BasisKind::Enemy), Some(BasisKind::Player)) => self.fight(mover, occupant),
            (Some(BasisKind::Item), Some(BasisKind::Player)) => self.pick_up(mover, occupant),
            _ => Collision::Occupied(occupant),
        }
    }

    /// Deals `amount` damage to an entity with no one credited.
    pub fn damage(&mut self, id: EntityId, amount: u32) -> DamageOutcome {
        self.apply_damage(id, amount, None)
    }

    fn apply_damage(&mut self, id: EntityId, amount: u32, killer: Option<EntityId>) -> DamageOutcome {
        let Some(entity) = self.registry.entities.get_mut(&id) else {
            return DamageOutcome::Absorbed;
        };

        match &mut entity.basis {
            Basis::Item(_) => DamageOutcome::Absorbed,
            Basis::Player(player) => {
                if player.health > amount {
                    player.health -= amount;
                    DamageOutcome::Survived {
                        health: player.health,
                    }
                } else {
                    if player.health > 0 {
                        tracing::info!(player = %id, name = %player.name, "player downed");
                        self.events.push(WorldEvent::PlayerDowned { player: id });
                    }
                    player.health = 0;
                    DamageOutcome::Downed
                }
            }
            Basis::Enemy(enemy) => {
                if enemy.health > amount {
                    enemy.health -= amount;
                    let health = enemy.health;
                    self.events.push(WorldEvent::EnemyDamaged {
                        enemy: id,
                        health_remaining: health,
                    });
                    DamageOutcome::Survived { health }
                } else {
                    let class = enemy.class();
                    self.slay(id, class, killer)
                }
            }
        }
    }

    /// Removes a dead enemy, pays the killer and rolls its loot.
    fn slay(&mut self, id: EntityId, class: EnemyClass, killer: Option<EntityId>) -> DamageOutcome {
        self.unlink_entity(id);
        let Some(enemy) = self.registry.forget(id) else {
            return DamageOutcome::Absorbed;
        };

        let experience = killer.map_or(0, |killer| self.award_experience(killer, class));
        tracing::debug!(enemy = %id, ?class, experience, "enemy slain");
        self.events.push(WorldEvent::EnemyKilled {
            enemy: id,
            killer,
            experience,
        });

        let Some(template) = self.loot.roll(class, &mut self.rng) else {
            return DamageOutcome::Slain;
        };
        let name = template.name.clone();
        let glyph = Arc::clone(&self.loot_glyph);
        let item = self.add_entity(enemy.zone, enemy.x, enemy.y, glyph, Basis::Item(ItemBasis::new(template)));
        self.link_entity(item);

        tracing::debug!(%item, %name, x = enemy.x, y = enemy.y, "loot dropped");
        self.events.push(WorldEvent::LootDropped {
            item,
            zone: enemy.zone,
            position: (enemy.x, enemy.y),
            name,
        });
        DamageOutcome::SlainWithDrop { item }
    }

    /// Credits a kill to a player and recomputes its level.
    fn award_experience(&mut self, player: EntityId, class: EnemyClass) -> u32 {
        let Some(player) = self.player_mut(player) else {
            return 0;
        };
        let reward = class.experience_reward();
        player.experience = player.experience.saturating_add(reward);
        player.level = level_for_experience(player.experience);
        reward
    }

    fn bump(&mut self, player: EntityId, by: EntityId) -> Collision {
        let damaged = self.rng.gen_range(0..100) < self.config.bump_damage_chance;
        self.events.push(WorldEvent::PlayerBumped { player, by, damaged });
        if damaged {
            self.apply_damage(player, 1, None);
        }
        Collision::Bumped { player, damaged }
    }

    fn fight(&mut self, mover: EntityId, enemy: EntityId) -> Collision {
        let class = self
            .entity(enemy)
            .and_then(Entity::as_enemy)
            .map(EnemyBasis::class);
        let outcome = self.apply_damage(enemy, 1, Some(mover));
        let experience = match class {
            Some(class) if outcome.awards_experience() => class.experience_reward(),
            _ => 0,
        };
        Collision::Fought {
            enemy,
            outcome,
            experience,
        }
    }

    fn pick_up(&mut self, player_id: EntityId, item: EntityId) -> Collision {
        let Some(template) = self
            .entity(item)
            .and_then(Entity::as_item)
            .map(|basis| Arc::clone(&basis.template))
        else {
            return Collision::Occupied(item);
        };
        let name = template.name.clone();
        let Some(player) = self.player_mut(player_id) else {
            return Collision::Occupied(item);
        };

        match player.inventory.try_add(template) {
            Ok(()) => {
                player.info = format!("found {name}");
                self.remove_entity(item);
                tracing::debug!(player = %player_id, %name, "item picked up");
                self.events.push(WorldEvent::ItemPickedUp {
                    player: player_id,
                    name: name.clone(),
                });
                Collision::PickedUp { item, name }
            }
            Err(err) => {
                player.info = format!(
                    "found {name}. you carry {} items, can't carry any more",
                    player.inventory.len()
                );
                tracing::debug!(player = %player_id, %name, %err, "pickup refused");
                self.events.push(WorldEvent::InventoryFull {
                    player: player_id,
                    name: name.clone(),
                });
                Collision::InventoryFull { item, name }
            }
        }
    }
}
