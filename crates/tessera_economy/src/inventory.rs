//! # Inventory
//!
//! Capped, ordered item storage for a single player.

use std::sync::Arc;

use crate::catalog::ItemTemplate;
use crate::error::{EconomyError, EconomyResult};

/// Default number of items a player can carry.
pub const DEFAULT_CAPACITY: usize = 8;

/// A player's carried items, in pickup order.
#[derive(Clone, Debug)]
pub struct Inventory {
    items: Vec<Arc<ItemTemplate>>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of items.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if no more items fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Adds an item.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::InventoryFull` when at capacity. The
    /// inventory is left unchanged.
    pub fn try_add(&mut self, item: Arc<ItemTemplate>) -> EconomyResult<()> {
        if self.is_full() {
            return Err(EconomyError::InventoryFull {
                capacity: self.capacity,
                carried: self.items.len(),
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes the first item with the given catalog key.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::ItemNotFound` if no such item is carried.
    pub fn remove(&mut self, key: &str) -> EconomyResult<Arc<ItemTemplate>> {
        let index = self
            .items
            .iter()
            .position(|item| item.key == key)
            .ok_or_else(|| EconomyError::ItemNotFound(key.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Returns true if an item with this key is carried.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    /// Carried items in pickup order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemTemplate>> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn item(key: &str) -> Arc<ItemTemplate> {
        Arc::new(ItemTemplate {
            key: key.to_string(),
            name: key.to_uppercase(),
            attributes: toml::Table::new(),
            rate: 50,
            enemies: BTreeSet::new(),
            condition: String::new(),
        })
    }

    #[test]
    fn test_add_until_full() {
        let mut inventory = Inventory::default();
        for i in 0..DEFAULT_CAPACITY {
            inventory.try_add(item(&format!("i{i}"))).unwrap();
        }
        assert!(inventory.is_full());
        assert_eq!(
            inventory.try_add(item("extra")),
            Err(EconomyError::InventoryFull {
                capacity: 8,
                carried: 8
            })
        );
        assert_eq!(inventory.len(), 8);
        assert!(!inventory.contains("extra"));
    }

    #[test]
    fn test_remove() {
        let mut inventory = Inventory::new(2);
        inventory.try_add(item("a")).unwrap();
        inventory.try_add(item("b")).unwrap();

        assert_eq!(inventory.remove("a").unwrap().key, "a");
        assert_eq!(inventory.len(), 1);
        assert_eq!(
            inventory.remove("a").unwrap_err(),
            EconomyError::ItemNotFound("a".into())
        );
        let keys: Vec<_> = inventory.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["b"]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut inventory = Inventory::new(0);
        assert!(inventory.is_empty());
        assert!(inventory.is_full());
        assert!(inventory.try_add(item("a")).is_err());
    }
}
