//! # Loot Table
//!
//! Drop rolls for slain enemies.
//!
//! A kill rolls once against every item eligible for the enemy's class.
//! An item passes when its `rate` is at least a uniform roll in `0..=100`,
//! so `rate = 100` always passes and `rate = 0` passes only on a zero roll.
//! If anything passes, one survivor is picked uniformly.

use std::sync::Arc;

use rand::Rng;

use crate::catalog::{Catalog, EnemyClass, ItemTemplate};

/// Experience required per level step.
pub const EXPERIENCE_PER_LEVEL: u32 = 1000;

/// Level for an accumulated experience total.
#[inline]
#[must_use]
pub const fn level_for_experience(experience: u32) -> u32 {
    experience / EXPERIENCE_PER_LEVEL + 1
}

/// Items grouped by the enemy class that can drop them.
#[derive(Clone, Debug, Default)]
pub struct LootTable {
    by_class: [Vec<Arc<ItemTemplate>>; 4],
}

impl LootTable {
    /// Indexes every item in the catalog by eligible class.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let mut table = Self::default();
        for item in catalog.items() {
            for class in &item.enemies {
                table.by_class[usize::from(class.ordinal())].push(Arc::clone(item));
            }
        }
        table
    }

    /// Items an enemy of `class` may drop, in catalog order.
    #[must_use]
    pub fn candidates(&self, class: EnemyClass) -> &[Arc<ItemTemplate>] {
        &self.by_class[usize::from(class.ordinal())]
    }

    /// Rolls a drop for a kill of `class`.
    pub fn roll<R: Rng>(&self, class: EnemyClass, rng: &mut R) -> Option<Arc<ItemTemplate>> {
        let passed: Vec<&Arc<ItemTemplate>> = self
            .candidates(class)
            .iter()
            .filter(|item| u32::from(item.rate) >= rng.gen_range(0..=100u32))
            .collect();

        if passed.is_empty() {
            return None;
        }
        let pick = passed[rng.gen_range(0..passed.len())];
        tracing::trace!(item = %pick.key, ?class, eligible = passed.len(), "loot rolled");
        Some(Arc::clone(pick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn catalog() -> Catalog {
        Catalog::from_toml_str(
            r#"
            [enemies.rat]
            health = 1
            level = 1
            sign = "r"
            type = 0

            [items.always]
            name = "sure thing"
            rate = 100
            enemies = [0]

            [items.boss_only]
            name = "crown"
            rate = 100
            enemies = [3]

            [items.never]
            name = "rumour"
            rate = 0
            enemies = [1]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(999), 1);
        assert_eq!(level_for_experience(1000), 2);
        assert_eq!(level_for_experience(2500), 3);
    }

    #[test]
    fn test_candidates_by_class() {
        let table = LootTable::new(&catalog());
        assert_eq!(table.candidates(EnemyClass::Minion).len(), 1);
        assert_eq!(table.candidates(EnemyClass::Boss)[0].name, "crown");
        assert!(table.candidates(EnemyClass::Elite).is_empty());
    }

    #[test]
    fn test_full_rate_always_drops() {
        let table = LootTable::new(&catalog());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let drop = table.roll(EnemyClass::Minion, &mut rng).unwrap();
            assert_eq!(drop.key, "always");
        }
    }

    #[test]
    fn test_zero_rate_drops_rarely() {
        let table = LootTable::new(&catalog());
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let drops = (0..10_000)
            .filter(|_| table.roll(EnemyClass::Soldier, &mut rng).is_some())
            .count();
        // One roll in 101 comes up zero
        assert!(drops > 30 && drops < 200, "got {drops} drops");
    }

    #[test]
    fn test_no_candidates_no_drop() {
        let table = LootTable::new(&catalog());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(table.roll(EnemyClass::Elite, &mut rng).is_none());
    }
}
