//! # Zone Generation
//!
//! The world is an infinite lattice of fixed-size zones. Each zone is
//! generated independently from the world seed and its lattice coordinate:
//!
//! 1. Derive the zone seed (see [`ZoneSeeding`])
//! 2. Lay down terrain according to the [`TerrainStyle`]
//! 3. Carve border corridors so every edge opens into its neighbour
//! 4. Roll up to `max_enemies` spawn points on open ground
//!
//! Generation never fails. A spawn that lands on blocked terrain is
//! dropped, not retried, so a zone may simply end up with fewer enemies.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::TileGrid;
use crate::noise::{PerlinNoise, WorldSeed};

/// Zone width in tiles.
pub const ZONE_WIDTH: usize = 48;

/// Zone height in tiles.
pub const ZONE_HEIGHT: usize = 18;

/// Sample depth on the noise field's z axis.
const NOISE_DEPTH: f64 = 0.8;

/// Noise frequency across one zone.
const NOISE_SCALE: f64 = 4.0;

/// Corridor carving stops after this many already-open cells.
const CORRIDOR_OPEN_LIMIT: u32 = 3;

/// Number of wall discs scattered by [`TerrainStyle::Boulders`].
const BOULDER_COUNT: u32 = 10;

/// Hard ceiling on enemies rolled for one zone, whatever the settings say.
pub const MAX_SPAWNS_PER_ZONE: u32 = 64;

/// Zone coordinate (identifies a zone in the world lattice).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneCoord {
    /// X coordinate (in zones, not tiles).
    pub x: i32,
    /// Y coordinate (in zones, not tiles).
    pub y: i32,
}

impl ZoneCoord {
    /// Creates a new zone coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate shifted by whole zones.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Packs both axes into one 64-bit key.
    #[inline]
    #[must_use]
    pub const fn packed(self) -> u64 {
        ((self.x as u32 as u64) << 32) | self.y as u32 as u64
    }
}

/// Static terrain of a single tile.
///
/// The discriminants are a fixed contract with external renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Open ground.
    Empty = 0,
    /// Light wall, also used for zone borders.
    Wall = 1,
    /// Water.
    Water = 2,
    /// Heavy rock.
    Rock = 3,
}

impl TileKind {
    /// Returns true if entities may stand here.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Classifies a normalised noise sample into a terrain band.
    #[must_use]
    pub fn from_noise(n: f64) -> Self {
        if n < 0.30 {
            Self::Water
        } else if n < 0.6 {
            Self::Empty
        } else if n < 0.8 {
            Self::Wall
        } else {
            Self::Rock
        }
    }

    /// Terminal glyph with colour codes.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Empty => " ",
            Self::Wall => concat!("\x1b[32m", "#", "\x1b[0m"),
            Self::Water => concat!("\x1b[34m", "~", "\x1b[0m"),
            Self::Rock => "#",
        }
    }

    /// Glyph without colour codes.
    #[must_use]
    pub const fn plain_glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall | Self::Rock => '#',
            Self::Water => '~',
        }
    }
}

/// How a zone's seed is derived from the world seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSeeding {
    /// Mixes both axes separately. Distinct zones never share a seed.
    #[default]
    Hashed,
    /// `world_seed * (x + y)`. Zones on the same anti-diagonal share a
    /// seed and therefore a layout. Kept for worlds created that way.
    Legacy,
}

impl ZoneSeeding {
    /// Derives the seed for one zone.
    #[must_use]
    pub fn zone_seed(self, world: WorldSeed, coord: ZoneCoord) -> WorldSeed {
        match self {
            Self::Hashed => world.derive(coord.packed()),
            Self::Legacy => {
                let sum = i64::from(coord.x) + i64::from(coord.y);
                WorldSeed::new((world.value() as i64).wrapping_mul(sum) as u64)
            }
        }
    }
}

/// Terrain layout algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainStyle {
    /// Banded Perlin noise: water, open ground, walls and rock.
    #[default]
    Noise,
    /// Solid wall with four wandering tunnels meeting near the centre.
    DrunkenWalk,
    /// Open field scattered with round wall clusters.
    Boulders,
}

/// Tunable generator settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Zone seed derivation.
    pub seeding: ZoneSeeding,
    /// Terrain layout algorithm.
    pub style: TerrainStyle,
    /// Upper bound of enemies rolled per zone.
    pub max_enemies: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seeding: ZoneSeeding::Hashed,
            style: TerrainStyle::Noise,
            max_enemies: 4,
        }
    }
}

/// An enemy placement rolled during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    /// Local X within the zone.
    pub x: i32,
    /// Local Y within the zone.
    pub y: i32,
    /// Index into the caller's enemy template list.
    pub template: usize,
}

/// Output of zone generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedZone {
    /// Zone this terrain belongs to.
    pub coord: ZoneCoord,
    /// Seed the zone was generated from.
    pub seed: WorldSeed,
    /// Terrain for every tile.
    pub terrain: TileGrid<TileKind>,
    /// Enemy placements, in roll order.
    pub spawns: Vec<EnemySpawn>,
}

/// Deterministic zone generator.
#[derive(Clone, Debug)]
pub struct ZoneGenerator {
    world_seed: WorldSeed,
    settings: GeneratorSettings,
}

impl ZoneGenerator {
    /// Creates a generator for one world.
    #[must_use]
    pub const fn new(world_seed: WorldSeed, settings: GeneratorSettings) -> Self {
        Self {
            world_seed,
            settings,
        }
    }

    /// The world seed all zones derive from.
    #[must_use]
    pub const fn world_seed(&self) -> WorldSeed {
        self.world_seed
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generates a zone.
    ///
    /// `enemy_kinds` is the number of enemy templates spawns may pick
    /// from. With zero kinds no spawns are rolled.
    #[must_use]
    pub fn generate(&self, coord: ZoneCoord, enemy_kinds: usize) -> GeneratedZone {
        let seed = self.settings.seeding.zone_seed(self.world_seed, coord);
        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());

        let mut terrain = TileGrid::new(ZONE_WIDTH, ZONE_HEIGHT);
        match self.settings.style {
            TerrainStyle::Noise => generate_noise(&mut terrain, seed),
            TerrainStyle::DrunkenWalk => generate_drunken_walk(&mut terrain, &mut rng),
            TerrainStyle::Boulders => generate_boulders(&mut terrain, &mut rng),
        }
        carve_corridors(&mut terrain);

        let spawns = if enemy_kinds == 0 {
            Vec::new()
        } else {
            roll_spawns(&terrain, &mut rng, self.settings.max_enemies, enemy_kinds)
        };

        tracing::debug!(
            zone_x = coord.x,
            zone_y = coord.y,
            seed = seed.value(),
            spawns = spawns.len(),
            "zone generated"
        );

        GeneratedZone {
            coord,
            seed,
            terrain,
            spawns,
        }
    }
}

#[inline]
fn is_border(x: usize, y: usize) -> bool {
    x == 0 || x == ZONE_WIDTH - 1 || y == 0 || y == ZONE_HEIGHT - 1
}

/// Bands the noise field into terrain and walls off the border.
fn generate_noise(terrain: &mut TileGrid<TileKind>, seed: WorldSeed) {
    let noise = PerlinNoise::new(seed);
    for x in 0..ZONE_WIDTH {
        for y in 0..ZONE_HEIGHT {
            let kind = if is_border(x, y) {
                TileKind::Wall
            } else {
                // Axes are deliberately crossed: rows drive the first input
                let nx = y as f64 / ZONE_HEIGHT as f64;
                let ny = x as f64 / ZONE_WIDTH as f64;
                TileKind::from_noise(noise.normalized(
                    NOISE_SCALE * nx,
                    NOISE_SCALE * ny,
                    NOISE_DEPTH,
                ))
            };
            terrain.set(x as i32, y as i32, kind);
        }
    }
}

/// Walks 3-wide tunnels from every edge midpoint toward a jittered centre.
fn generate_drunken_walk(terrain: &mut TileGrid<TileKind>, rng: &mut ChaCha8Rng) {
    let w2 = (ZONE_WIDTH / 2) as i32;
    let h2 = (ZONE_HEIGHT / 2) as i32;
    let last_x = ZONE_WIDTH as i32 - 1;
    let last_y = ZONE_HEIGHT as i32 - 1;
    let centre = (w2 + rng.gen_range(-5..=5), h2 + rng.gen_range(-3..=3));
    let wobble = rng.gen_range(1..=2);

    terrain.fill(TileKind::Wall);
    let mut trail = TileGrid::new(ZONE_WIDTH, ZONE_HEIGHT);
    for (start, step) in [
        ((0, h2), (1, 0)),
        ((last_x, h2), (-1, 0)),
        ((w2, 0), (0, 1)),
        ((w2, last_y), (0, -1)),
    ] {
        terrain.set(centre.0, centre.1, TileKind::Empty);
        for dx in -1..=1 {
            for dy in -1..=1 {
                terrain.set(start.0 + dx, start.1 + dy, TileKind::Empty);
            }
        }
        walk_tunnel(
            terrain,
            &mut trail,
            rng,
            (start.0 + step.0, start.1 + step.1),
            centre,
            wobble,
        );
        for (x, y, _) in trail.iter() {
            terrain.set(x, y, TileKind::Empty);
        }
        trail.clear();
    }
}

fn walk_tunnel(
    terrain: &TileGrid<TileKind>,
    trail: &mut TileGrid<()>,
    rng: &mut ChaCha8Rng,
    start: (i32, i32),
    target: (i32, i32),
    wobble: u32,
) {
    let (mut x, mut y) = start;
    // A tunnel always reaches open ground long before this
    let max_steps = ZONE_WIDTH * ZONE_HEIGHT * 8;
    for _ in 0..max_steps {
        trail.set(x, y, ());
        if x > 2 {
            trail.set(x - 1, y, ());
        }
        if x < ZONE_WIDTH as i32 - 3 {
            trail.set(x + 1, y, ());
        }
        if y > 2 {
            trail.set(x, y - 1, ());
        }
        if y < ZONE_HEIGHT as i32 - 3 {
            trail.set(x, y + 1, ());
        }

        match rng.gen_range(0..=wobble) {
            0 => x += (target.0 - x).signum(),
            1 => y += (target.1 - y).signum(),
            r => {
                let lurch = if rng.gen_bool(0.5) { 1 } else { -1 };
                if r % 2 == 1 {
                    x += lurch;
                } else {
                    y += lurch;
                }
            }
        }
        x = x.clamp(1, ZONE_WIDTH as i32 - 2);
        y = y.clamp(1, ZONE_HEIGHT as i32 - 2);

        if terrain.get_copied(x, y) == Some(TileKind::Empty) || (x, y) == target {
            return;
        }
    }
}

/// Walls the border with one opening per edge, then drops wall discs.
fn generate_boulders(terrain: &mut TileGrid<TileKind>, rng: &mut ChaCha8Rng) {
    let w2 = (ZONE_WIDTH / 2) as i32;
    let h2 = (ZONE_HEIGHT / 2) as i32;
    let last_x = ZONE_WIDTH as i32 - 1;
    let last_y = ZONE_HEIGHT as i32 - 1;

    terrain.fill(TileKind::Empty);
    for x in 0..=last_x {
        terrain.set(x, 0, TileKind::Wall);
        terrain.set(x, last_y, TileKind::Wall);
    }
    for y in 0..=last_y {
        terrain.set(0, y, TileKind::Wall);
        terrain.set(last_x, y, TileKind::Wall);
    }
    terrain.set(0, h2, TileKind::Empty);
    terrain.set(last_x, h2, TileKind::Empty);
    terrain.set(w2, 0, TileKind::Empty);
    terrain.set(w2, last_y, TileKind::Empty);

    for _ in 0..BOULDER_COUNT {
        let cx = rng.gen_range(0..=last_x);
        let cy = rng.gen_range(0..=last_y);
        let r = rng.gen_range(2..=4);
        for x in cx - r..=cx + r {
            for y in cy - r..=cy + r {
                let (dx, dy) = (cx - x, cy - y);
                if dx * dx + dy * dy <= r * r {
                    terrain.set(x, y, TileKind::Wall);
                }
            }
        }
    }
}

/// Punches a 3-wide corridor through each border at its midpoint.
///
/// Each of the four scans runs inward from one edge, clearing blocked
/// cells in the 3-cell band until it has passed three cells that were
/// already open.
fn carve_corridors(terrain: &mut TileGrid<TileKind>) {
    let w = ZONE_WIDTH as i32;
    let h = ZONE_HEIGHT as i32;
    let w2 = w / 2;
    let h2 = h / 2;

    carve_band(terrain, 0..w, |i, off| (i, h2 + off));
    carve_band(terrain, (1..w).rev(), |i, off| (i, h2 + off));
    carve_band(terrain, 0..h, |j, off| (w2 + off, j));
    carve_band(terrain, (1..h).rev(), |j, off| (w2 + off, j));
}

fn carve_band(
    terrain: &mut TileGrid<TileKind>,
    steps: impl Iterator<Item = i32>,
    cell: impl Fn(i32, i32) -> (i32, i32),
) {
    let mut open_seen = 0;
    for step in steps {
        if open_seen >= CORRIDOR_OPEN_LIMIT {
            return;
        }
        for offset in -1..=1 {
            let (x, y) = cell(step, offset);
            match terrain.get_copied(x, y) {
                Some(kind) if !kind.is_empty() => terrain.set(x, y, TileKind::Empty),
                _ => open_seen += 1,
            }
        }
    }
}

fn roll_spawns(
    terrain: &TileGrid<TileKind>,
    rng: &mut ChaCha8Rng,
    max_enemies: u32,
    enemy_kinds: usize,
) -> Vec<EnemySpawn> {
    let count = rng.gen_range(0..=max_enemies.min(MAX_SPAWNS_PER_ZONE));
    let mut spawns: Vec<EnemySpawn> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let template = rng.gen_range(0..enemy_kinds);
        let x = rng.gen_range(1..=ZONE_WIDTH as i32 - 2);
        let y = rng.gen_range(1..=ZONE_HEIGHT as i32 - 2);
        if terrain.get_copied(x, y) != Some(TileKind::Empty) {
            continue;
        }
        if spawns.iter().any(|s| s.x == x && s.y == y) {
            continue;
        }
        spawns.push(EnemySpawn { x, y, template });
    }
    spawns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_has_opening(terrain: &TileGrid<TileKind>, cells: impl Iterator<Item = (i32, i32)>) -> bool {
        let mut cells = cells;
        cells.any(|(x, y)| terrain.get_copied(x, y) == Some(TileKind::Empty))
    }

    fn assert_all_edges_open(zone: &GeneratedZone) {
        let w = ZONE_WIDTH as i32;
        let h = ZONE_HEIGHT as i32;
        let t = &zone.terrain;
        assert!(edge_has_opening(t, (0..h).map(|y| (0, y))), "west edge closed in {:?}", zone.coord);
        assert!(edge_has_opening(t, (0..h).map(|y| (w - 1, y))), "east edge closed in {:?}", zone.coord);
        assert!(edge_has_opening(t, (0..w).map(|x| (x, 0))), "north edge closed in {:?}", zone.coord);
        assert!(edge_has_opening(t, (0..w).map(|x| (x, h - 1))), "south edge closed in {:?}", zone.coord);
    }

    #[test]
    fn test_glyphs_match_plain_glyphs() {
        for kind in [TileKind::Empty, TileKind::Water, TileKind::Wall, TileKind::Rock] {
            let glyph = kind.glyph();
            assert!(glyph.contains(kind.plain_glyph()), "{kind:?} draws {glyph:?}");
            if glyph.starts_with('\x1b') {
                assert!(glyph.ends_with("\x1b[0m"), "{kind:?} leaves colour on");
            }
        }
        assert_eq!(TileKind::Wall.glyph(), "\x1b[32m#\x1b[0m");
        assert_eq!(TileKind::Water.glyph(), "\x1b[34m~\x1b[0m");
    }

    #[test]
    fn test_spawn_count_is_capped() {
        let generator = ZoneGenerator::new(
            WorldSeed::new(3),
            GeneratorSettings {
                max_enemies: u32::MAX,
                ..GeneratorSettings::default()
            },
        );
        for x in 0..8 {
            let zone = generator.generate(ZoneCoord::new(x, 0), 2);
            assert!(zone.spawns.len() <= MAX_SPAWNS_PER_ZONE as usize);
        }
    }

    #[test]
    fn test_noise_bands() {
        assert_eq!(TileKind::from_noise(0.0), TileKind::Water);
        assert_eq!(TileKind::from_noise(0.29), TileKind::Water);
        assert_eq!(TileKind::from_noise(0.30), TileKind::Empty);
        assert_eq!(TileKind::from_noise(0.59), TileKind::Empty);
        assert_eq!(TileKind::from_noise(0.6), TileKind::Wall);
        assert_eq!(TileKind::from_noise(0.79), TileKind::Wall);
        assert_eq!(TileKind::from_noise(0.8), TileKind::Rock);
        assert_eq!(TileKind::from_noise(1.0), TileKind::Rock);
    }

    #[test]
    fn test_generation_determinism() {
        let generator = ZoneGenerator::new(WorldSeed::new(1024), GeneratorSettings::default());
        for coord in [ZoneCoord::new(0, 0), ZoneCoord::new(-3, 7), ZoneCoord::new(12, -1)] {
            assert_eq!(generator.generate(coord, 4), generator.generate(coord, 4));
        }
    }

    #[test]
    fn test_every_style_keeps_edges_open() {
        for style in [TerrainStyle::Noise, TerrainStyle::DrunkenWalk, TerrainStyle::Boulders] {
            let settings = GeneratorSettings {
                style,
                ..GeneratorSettings::default()
            };
            let generator = ZoneGenerator::new(WorldSeed::new(99), settings);
            for x in -4..4 {
                for y in -4..4 {
                    assert_all_edges_open(&generator.generate(ZoneCoord::new(x, y), 3));
                }
            }
        }
    }

    #[test]
    fn test_border_is_wall_outside_corridors() {
        let generator = ZoneGenerator::new(WorldSeed::new(1024), GeneratorSettings::default());
        let zone = generator.generate(ZoneCoord::new(2, 5), 1);
        assert_eq!(zone.terrain.get_copied(0, 0), Some(TileKind::Wall));
        assert_eq!(
            zone.terrain.get_copied(ZONE_WIDTH as i32 - 1, ZONE_HEIGHT as i32 - 1),
            Some(TileKind::Wall)
        );
        // The west corridor always clears the border cell at the midline
        assert_eq!(zone.terrain.get_copied(0, ZONE_HEIGHT as i32 / 2), Some(TileKind::Empty));
    }

    #[test]
    fn test_spawns_on_open_distinct_cells() {
        let generator = ZoneGenerator::new(WorldSeed::new(5), GeneratorSettings::default());
        for x in 0..20 {
            let zone = generator.generate(ZoneCoord::new(x, 0), 3);
            assert!(zone.spawns.len() <= 4);
            for (i, spawn) in zone.spawns.iter().enumerate() {
                assert!(spawn.template < 3);
                assert_eq!(zone.terrain.get_copied(spawn.x, spawn.y), Some(TileKind::Empty));
                assert!(zone.spawns[..i].iter().all(|s| (s.x, s.y) != (spawn.x, spawn.y)));
            }
        }
    }

    #[test]
    fn test_no_spawns_without_templates() {
        let generator = ZoneGenerator::new(WorldSeed::new(5), GeneratorSettings::default());
        assert!((0..10).all(|x| generator.generate(ZoneCoord::new(x, x), 0).spawns.is_empty()));
    }

    #[test]
    fn test_legacy_seeding_collides_on_diagonals() {
        let world = WorldSeed::new(1024);
        let legacy = ZoneSeeding::Legacy;
        assert_eq!(legacy.zone_seed(world, ZoneCoord::new(1, 2)), WorldSeed::new(3072));
        assert_eq!(
            legacy.zone_seed(world, ZoneCoord::new(1, 2)),
            legacy.zone_seed(world, ZoneCoord::new(3, 0))
        );
        assert_eq!(legacy.zone_seed(world, ZoneCoord::new(0, 0)), WorldSeed::new(0));

        let hashed = ZoneSeeding::Hashed;
        assert_ne!(
            hashed.zone_seed(world, ZoneCoord::new(1, 2)),
            hashed.zone_seed(world, ZoneCoord::new(2, 1))
        );
    }

    #[test]
    fn test_band_mix_is_plausible() {
        let generator = ZoneGenerator::new(WorldSeed::new(1024), GeneratorSettings::default());
        let mut open = 0;
        let mut total = 0;
        for x in 0..8 {
            let zone = generator.generate(ZoneCoord::new(x, 0), 0);
            open += zone.terrain.iter().filter(|(_, _, k)| k.is_empty()).count();
            total += ZONE_WIDTH * ZONE_HEIGHT;
        }
        assert!(open * 10 > total, "expected more than 10% open ground, got {open}/{total}");
    }
}
