//! # TESSERA Procedural Generation
//!
//! Deterministic zone generation for an infinite, reproducible tile world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same zone
//! 2. **Zoned**: The world is a lattice of fixed 48x18 zones
//! 3. **Connected**: Every zone edge opens into its neighbour
//! 4. **Total**: Generation and grid access never fail
//!
//! ## Core Components
//!
//! - `PerlinNoise`: classic 3D gradient noise
//! - `TileGrid`: bounds-checked 2D cell storage
//! - `ZoneGenerator`: terrain, corridors and enemy spawn points
//!
//! ## Example
//!
//! ```rust
//! use tessera_procedural::{GeneratorSettings, WorldSeed, ZoneCoord, ZoneGenerator};
//!
//! let generator = ZoneGenerator::new(WorldSeed::new(1024), GeneratorSettings::default());
//! let zone = generator.generate(ZoneCoord::new(0, 0), 4);
//! assert!(zone.spawns.len() <= 4);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod grid;
pub mod noise;
pub mod zone;

pub use grid::TileGrid;
pub use noise::{PerlinNoise, WorldSeed};
pub use zone::{
    EnemySpawn, GeneratedZone, GeneratorSettings, TerrainStyle, TileKind, ZoneCoord,
    ZoneGenerator, ZoneSeeding, MAX_SPAWNS_PER_ZONE, ZONE_HEIGHT, ZONE_WIDTH,
};
