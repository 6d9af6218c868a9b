//! # TESSERA Economy System
//!
//! Templates, loot and inventories for the TESSERA world.
//!
//! ## Design Principles
//!
//! 1. **Immutable templates** - The catalog is loaded once and shared via `Arc`
//! 2. **External configuration** - All balance data in TOML files
//! 3. **Caller-owned randomness** - Loot rolls take the caller's RNG
//! 4. **Typed refusals** - A full inventory is an error value, not a flag
//!
//! ## Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tessera_economy::{Catalog, EnemyClass, Inventory, LootTable};
//!
//! let catalog = Catalog::from_toml_str(r#"
//!     [enemies.rat]
//!     health = 2
//!     level = 1
//!     sign = "r"
//!     type = 0
//!
//!     [items.tail]
//!     name = "rat tail"
//!     rate = 100
//!     enemies = [0]
//! "#).unwrap();
//!
//! let loot = LootTable::new(&catalog);
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let drop = loot.roll(EnemyClass::Minion, &mut rng).unwrap();
//!
//! let mut inventory = Inventory::default();
//! inventory.try_add(drop).unwrap();
//! assert_eq!(inventory.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod loot;

pub use catalog::{Catalog, EnemyClass, EnemyTemplate, GlyphColor, ItemTemplate};
pub use error::{EconomyError, EconomyResult};
pub use inventory::{Inventory, DEFAULT_CAPACITY};
pub use loot::{level_for_experience, LootTable, EXPERIENCE_PER_LEVEL};
