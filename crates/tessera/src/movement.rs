//! # Movement
//!
//! Stepping entities across the lattice.
//!
//! A move is resolved in three phases:
//!
//! 1. **Pursuit** - when a player moves, every enemy within aggro range in
//!    the player's zone takes one step toward it, first horizontally and
//!    then vertically
//! 2. **Collision** - the destination tile is resolved against the rules
//!    in [`crate::combat`]
//! 3. **Relink** - if nothing blocked, the mover leaves its old tile and
//!    takes the new one, possibly in a neighbouring zone
//!
//! A blocked move leaves the mover's position and both occupancy grids
//! untouched.

use tessera_procedural::{ZoneCoord, ZONE_HEIGHT, ZONE_WIDTH};

use crate::combat::Collision;
use crate::entity::{BasisKind, EntityId};
use crate::events::WorldEvent;
use crate::world::World;

/// Result of a move request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mover now stands on the destination tile.
    Moved {
        /// Destination zone.
        zone: ZoneCoord,
        /// Destination local X.
        x: i32,
        /// Destination local Y.
        y: i32,
        /// What was on the tile before the mover arrived.
        collision: Collision,
    },
    /// The mover stayed put.
    Blocked(Collision),
    /// The entity does not exist or holds no tile.
    NotInWorld,
}

impl MoveOutcome {
    /// Returns true if the mover changed tile.
    #[must_use]
    pub const fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Applies a local offset, carrying overflow into the zone coordinate.
#[must_use]
pub fn wrap(zone: ZoneCoord, x: i32, y: i32) -> (ZoneCoord, i32, i32) {
    let w = ZONE_WIDTH as i32;
    let h = ZONE_HEIGHT as i32;
    (
        zone.offset(x.div_euclid(w), y.div_euclid(h)),
        x.rem_euclid(w),
        y.rem_euclid(h),
    )
}

impl World {
    /// Moves an entity by `(dx, dy)`.
    pub fn move_entity(&mut self, id: EntityId, dx: i32, dy: i32) -> MoveOutcome {
        let is_player = match self.entity(id) {
            Some(entity) if entity.linked => entity.is_player(),
            _ => return MoveOutcome::NotInWorld,
        };
        if is_player {
            self.pursue(id);
        }

        let Some(entity) = self.entity(id) else {
            return MoveOutcome::NotInWorld;
        };
        let from = entity.zone;
        let (to, x, y) = wrap(from, entity.x + dx, entity.y + dy);

        let collision = self.collide(id, to, x, y);
        if collision.is_blocked() {
            return MoveOutcome::Blocked(collision);
        }

        self.relocate(id, to, x, y);
        if to != from {
            tracing::debug!(entity = %id, from_x = from.x, from_y = from.y, to_x = to.x, to_y = to.y, "zone crossed");
            self.events.push(WorldEvent::ZoneCrossed { entity: id, from, to });
        }
        MoveOutcome::Moved {
            zone: to,
            x,
            y,
            collision,
        }
    }

    /// Steps every enemy near a player one tile toward it.
    fn pursue(&mut self, player: EntityId) {
        let Some(entity) = self.entity(player) else {
            return;
        };
        let (coord, px, py) = (entity.zone, entity.x, entity.y);
        let Some(zone) = self.zone(coord) else {
            return;
        };

        let rx = self.config.aggro_range_x;
        let ry = self.config.aggro_range_y;
        let xs = px.saturating_sub(rx).max(0)..=px.saturating_add(rx).min(ZONE_WIDTH as i32 - 1);
        let ys = py.saturating_sub(ry).max(0)..=py.saturating_add(ry).min(ZONE_HEIGHT as i32 - 1);

        // Snapshot first so an enemy that steps into unscanned rows is
        // not moved twice
        let mut chasers = Vec::new();
        for ex in xs {
            for ey in ys.clone() {
                let Some(occupant) = zone.occupant(ex, ey) else {
                    continue;
                };
                if self.entity(occupant.id).map(|e| e.basis.kind()) == Some(BasisKind::Enemy) {
                    chasers.push((occupant.id, ex, ey));
                }
            }
        }

        for (enemy, ex, ey) in chasers {
            let step_x = (px - ex).signum();
            if step_x != 0 {
                self.move_entity(enemy, step_x, 0);
            }
            let step_y = (py - ey).signum();
            if step_y != 0 {
                self.move_entity(enemy, 0, step_y);
            }
        }
    }

    /// Moves a linked entity to a tile already known to be free.
    fn relocate(&mut self, id: EntityId, to: ZoneCoord, x: i32, y: i32) {
        let Some(entity) = self.registry.entities.get_mut(&id) else {
            return;
        };
        let (from, old_x, old_y) = (entity.zone, entity.x, entity.y);
        let glyph = std::sync::Arc::clone(&entity.glyph);
        entity.zone = to;
        entity.x = x;
        entity.y = y;
        if let Some(player) = entity.as_player_mut() {
            player.zone = to;
        }

        if let Some(zone) = self.zones.get_mut(&from) {
            zone.remove_entity(id, old_x, old_y);
        }
        self.zone_mut(to).set_entity(id, glyph, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_inside_zone() {
        let origin = ZoneCoord::new(0, 0);
        assert_eq!(wrap(origin, 5, 7), (origin, 5, 7));
    }

    #[test]
    fn test_wrap_each_edge() {
        let origin = ZoneCoord::new(0, 0);
        assert_eq!(wrap(origin, -1, 3), (ZoneCoord::new(-1, 0), 47, 3));
        assert_eq!(wrap(origin, 48, 3), (ZoneCoord::new(1, 0), 0, 3));
        assert_eq!(wrap(origin, 3, -1), (ZoneCoord::new(0, -1), 3, 17));
        assert_eq!(wrap(origin, 3, 18), (ZoneCoord::new(0, 1), 3, 0));
        assert_eq!(wrap(ZoneCoord::new(4, -2), -1, -1), (ZoneCoord::new(3, -3), 47, 17));
    }
}
