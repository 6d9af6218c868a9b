//! # Economy Error Types
//!
//! All errors that can occur in the economy system.

use thiserror::Error;

/// Errors that can occur in the economy system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// Catalog file could not be read.
    #[error("cannot read catalog {path}: {message}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },

    /// Catalog file is not valid TOML or does not match the schema.
    #[error("malformed catalog: {0}")]
    Parse(String),

    /// Catalog parsed but its contents are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Enemy type ordinal outside the known classes.
    #[error("unknown enemy class {0}, expected 0-3")]
    UnknownEnemyClass(u8),

    /// Item not found in an inventory or catalog.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Inventory is full, cannot add more items.
    #[error("inventory full: carrying {carried} of {capacity}")]
    InventoryFull {
        /// Maximum number of items.
        capacity: usize,
        /// Items currently carried.
        carried: usize,
    },
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
