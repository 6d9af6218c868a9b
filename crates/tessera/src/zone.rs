//! # Zone
//!
//! One cell of the zone lattice: static terrain plus an occupancy grid
//! holding at most one entity per tile.

use std::sync::Arc;

use rand::Rng;
use tessera_procedural::{GeneratedZone, TileGrid, TileKind, WorldSeed, ZoneCoord, ZONE_HEIGHT, ZONE_WIDTH};

use crate::entity::EntityId;

/// Random probes made by [`Zone::find_free_place`] before it scans.
const FREE_PLACE_PROBES: u32 = 256;

/// What the occupancy grid records for a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupant {
    /// Entity standing here.
    pub id: EntityId,
    /// Glyph to draw for it.
    pub glyph: Arc<str>,
}

/// A generated zone and the entities standing in it.
#[derive(Clone, Debug)]
pub struct Zone {
    coord: ZoneCoord,
    seed: WorldSeed,
    terrain: TileGrid<TileKind>,
    occupancy: TileGrid<Occupant>,
}

impl Zone {
    /// Wraps freshly generated terrain with an empty occupancy grid.
    ///
    /// Spawn points are ignored here; the world turns them into entities.
    #[must_use]
    pub fn new(generated: GeneratedZone) -> Self {
        Self {
            coord: generated.coord,
            seed: generated.seed,
            terrain: generated.terrain,
            occupancy: TileGrid::new(ZONE_WIDTH, ZONE_HEIGHT),
        }
    }

    /// Lattice coordinate.
    #[must_use]
    pub const fn coord(&self) -> ZoneCoord {
        self.coord
    }

    /// Seed the terrain was generated from.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Static terrain.
    #[must_use]
    pub const fn terrain(&self) -> &TileGrid<TileKind> {
        &self.terrain
    }

    /// Terrain at a tile. `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn tile(&self, x: i32, y: i32) -> Option<TileKind> {
        self.terrain.get_copied(x, y)
    }

    /// Who stands on a tile.
    #[inline]
    #[must_use]
    pub fn occupant(&self, x: i32, y: i32) -> Option<&Occupant> {
        self.occupancy.get(x, y)
    }

    /// Returns true if the tile is open ground with nobody on it.
    #[must_use]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) == Some(TileKind::Empty) && self.occupant(x, y).is_none()
    }

    /// Places an entity on a tile.
    ///
    /// Returns false, changing nothing, if the tile is out of bounds or
    /// held by a different entity.
    pub fn set_entity(&mut self, id: EntityId, glyph: Arc<str>, x: i32, y: i32) -> bool {
        if !self.occupancy.in_bounds(x, y) {
            return false;
        }
        if self.occupant(x, y).is_some_and(|o| o.id != id) {
            return false;
        }
        self.occupancy.set(x, y, Occupant { id, glyph });
        true
    }

    /// Clears a tile if `id` stands there.
    ///
    /// Returns true if the entity was removed.
    pub fn remove_entity(&mut self, id: EntityId, x: i32, y: i32) -> bool {
        if self.occupant(x, y).is_some_and(|o| o.id == id) {
            self.occupancy.take(x, y);
            true
        } else {
            false
        }
    }

    /// All occupants in row-major order.
    pub fn occupants(&self) -> impl Iterator<Item = (i32, i32, &Occupant)> + '_ {
        self.occupancy.iter()
    }

    /// Picks a random free tile.
    ///
    /// Probes random tiles first and falls back to a row-major scan, so
    /// the result is `None` only when every open tile is taken.
    pub fn find_free_place<R: Rng>(&self, rng: &mut R) -> Option<(i32, i32)> {
        let w = ZONE_WIDTH as i32;
        let h = ZONE_HEIGHT as i32;
        for _ in 0..FREE_PLACE_PROBES {
            let x = rng.gen_range(0..w);
            let y = rng.gen_range(0..h);
            if self.is_free(x, y) {
                return Some((x, y));
            }
        }
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .find(|&(x, y)| self.is_free(x, y))
    }

    /// Draws the zone with colour codes, one line per row.
    #[must_use]
    pub fn render(&self) -> String {
        self.draw(|kind, out| out.push_str(kind.glyph()))
    }

    /// Draws the zone without colour codes on terrain.
    ///
    /// Occupant glyphs are drawn as stored.
    #[must_use]
    pub fn render_plain(&self) -> String {
        self.draw(|kind, out| out.push(kind.plain_glyph()))
    }

    fn draw(&self, terrain_glyph: impl Fn(TileKind, &mut String)) -> String {
        let mut out = String::with_capacity((ZONE_WIDTH + 1) * ZONE_HEIGHT * 4);
        for y in 0..ZONE_HEIGHT as i32 {
            for x in 0..ZONE_WIDTH as i32 {
                if let Some(occupant) = self.occupant(x, y) {
                    out.push_str(&occupant.glyph);
                } else if let Some(kind) = self.tile(x, y) {
                    terrain_glyph(kind, &mut out);
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tessera_procedural::{GeneratorSettings, ZoneGenerator};

    fn zone() -> Zone {
        let generator = ZoneGenerator::new(WorldSeed::new(1024), GeneratorSettings::default());
        Zone::new(generator.generate(ZoneCoord::new(0, 0), 0))
    }

    #[test]
    fn test_set_and_remove() {
        let mut zone = zone();
        let a = EntityId::new(1);
        let b = EntityId::new(2);
        let glyph: Arc<str> = Arc::from("@");

        assert!(zone.set_entity(a, Arc::clone(&glyph), 3, 3));
        assert!(!zone.set_entity(b, Arc::clone(&glyph), 3, 3), "tile already held");
        assert!(!zone.set_entity(b, Arc::clone(&glyph), -1, 3));
        assert!(!zone.remove_entity(b, 3, 3), "only the holder can be removed");
        assert_eq!(zone.occupant(3, 3).map(|o| o.id), Some(a));
        assert!(zone.remove_entity(a, 3, 3));
        assert!(zone.occupant(3, 3).is_none());
    }

    #[test]
    fn test_find_free_place() {
        let mut zone = zone();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for i in 0..50 {
            let (x, y) = zone.find_free_place(&mut rng).unwrap();
            assert!(zone.is_free(x, y));
            zone.set_entity(EntityId::new(i), Arc::from("e"), x, y);
        }
        assert_eq!(zone.occupants().count(), 50);
    }

    #[test]
    fn test_full_zone_has_no_free_place() {
        let mut zone = zone();
        let mut id = 0;
        for y in 0..ZONE_HEIGHT as i32 {
            for x in 0..ZONE_WIDTH as i32 {
                id += 1;
                zone.set_entity(EntityId::new(id), Arc::from("e"), x, y);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(zone.find_free_place(&mut rng), None);
    }

    #[test]
    fn test_render_shape() {
        let mut zone = zone();
        zone.set_entity(EntityId::new(1), Arc::from("@"), 0, ZONE_HEIGHT as i32 / 2);

        let plain = zone.render_plain();
        let lines: Vec<_> = plain.lines().collect();
        assert_eq!(lines.len(), ZONE_HEIGHT);
        assert!(lines.iter().all(|line| line.chars().count() == ZONE_WIDTH));
        assert!(lines[ZONE_HEIGHT / 2].starts_with('@'));
        assert!(lines[0].chars().all(|c| c == '#' || c == ' '));

        let coloured = zone.render();
        assert_eq!(coloured.lines().count(), ZONE_HEIGHT);
        assert!(coloured.contains('@'));
    }
}
