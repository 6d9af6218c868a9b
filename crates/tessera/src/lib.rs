//! # TESSERA
//!
//! The world simulation crate, integrating generation and economy.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              TESSERA                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │   PROCEDURAL    │     │     WORLD       │     │    ECONOMY      │   │
//! │  │                 │────>│                 │<────│                 │   │
//! │  │  • Noise        │     │  • Zones        │     │  • Catalog      │   │
//! │  │  • Tile grids   │     │  • Entities     │     │  • Loot rolls   │   │
//! │  │  • Corridors    │     │  • Combat rules │     │  • Inventories  │   │
//! │  └─────────────────┘     └────────┬────────┘     └─────────────────┘   │
//! │                                   │                                     │
//! │                          ┌────────┴────────┐                            │
//! │                          │   GAME LOOP     │                            │
//! │                          │  • Commands     │                            │
//! │                          │  • Tick reports │                            │
//! │                          └─────────────────┘                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `world`: zone lattice and entity arena
//! - `combat`: collision, damage, experience and pickup rules
//! - `movement`: pursuit, zone wrapping and relinking
//! - `game_loop`: command queue and tick orchestration
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera::{Catalog, World, WorldConfig, ZoneCoord};
//!
//! let catalog = Catalog::from_toml_str(r#"
//!     [enemies.rat]
//!     health = 2
//!     level = 1
//!     sign = "r"
//!     type = 0
//! "#).unwrap();
//!
//! let mut world = World::new(WorldConfig::production(), Arc::new(catalog));
//! let player = world.spawn_player("ada", ZoneCoord::new(0, 0)).unwrap();
//! world.move_entity(player, 1, 0);
//! assert!(world.render_world(player).unwrap().contains('@'));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod movement;
pub mod world;
pub mod zone;

// Re-export the sibling crates
pub use tessera_economy as economy;
pub use tessera_procedural as procedural;

pub use combat::{Collision, DamageOutcome};
pub use config::WorldConfig;
pub use entity::{Basis, BasisKind, EnemyBasis, Entity, EntityId, ItemBasis, PlayerBasis};
pub use error::{ConfigError, ConfigResult};
pub use events::WorldEvent;
pub use game_loop::{CommandOutcome, CommandSender, GameLoop, PlayerCommand, SessionId, TickReport};
pub use movement::MoveOutcome;
pub use tessera_economy::Catalog;
pub use tessera_procedural::{TileKind, ZoneCoord, ZONE_HEIGHT, ZONE_WIDTH};
pub use world::World;
pub use zone::{Occupant, Zone};
