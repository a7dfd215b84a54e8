//! Memoized permutation tables keyed by seed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::perlin::PermutationTable;

/// Lazily builds and caches one [`PermutationTable`] per seed.
///
/// A registry is an ordinary value: own one per process and share it with
/// `Arc`, or give each session its own. Tables are immutable once built. The
/// lock is held while a missing table is built, so concurrent callers asking
/// for the same unbuilt seed observe exactly one build.
#[derive(Debug, Default)]
pub struct PermutationRegistry {
    tables: Mutex<HashMap<u64, Arc<PermutationTable>>>,
}

impl PermutationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry wrapped in an `Arc` for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the table for `seed`, building it on first use.
    pub fn table(&self, seed: u64) -> Arc<PermutationTable> {
        let mut tables = self.tables.lock();
        Arc::clone(
            tables
                .entry(seed)
                .or_insert_with(|| Arc::new(PermutationTable::new(seed))),
        )
    }

    /// Number of tables built so far.
    pub fn len(&self) -> usize {
        self.tables.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_memoizes_per_seed() {
        let registry = PermutationRegistry::new();
        let a = registry.table(42);
        let b = registry.table(42);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);

        registry.table(43);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_builds_share_one_table() {
        let registry = PermutationRegistry::shared();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.table(1234))
            })
            .collect();

        let tables: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for t in &tables[1..] {
            assert!(Arc::ptr_eq(&tables[0], t));
        }
        assert_eq!(registry.len(), 1);
    }
}
