use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::dataset::{build_dataset, FactTable};

/// Built tables by seed. A seed never changes meaning, so entries are never evicted.
static DATASETS: Lazy<RwLock<HashMap<u64, Arc<FactTable>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// The table the API serves, installed once at startup
static ACTIVE_DATASET: OnceCell<Arc<FactTable>> = OnceCell::new();

/// Memoized `build_dataset`
pub fn dataset_for_seed(seed: u64) -> Arc<FactTable> {
    if let Some(table) = DATASETS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&seed)
    {
        return table.clone();
    }

    // Build outside the lock; a concurrent builder for the same seed yields an equal table.
    let built = Arc::new(build_dataset(seed));
    let mut datasets = DATASETS.write().unwrap_or_else(PoisonError::into_inner);
    datasets.entry(seed).or_insert(built).clone()
}

/// Install the served table. Returns `false` if one was already installed.
pub fn install_active(table: Arc<FactTable>) -> bool {
    ACTIVE_DATASET.set(table).is_ok()
}

pub fn active() -> Option<Arc<FactTable>> {
    ACTIVE_DATASET.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_returns_same_table() {
        let a = dataset_for_seed(2024);
        let b = dataset_for_seed(2024);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_cached_equals_fresh_build() {
        assert_eq!(*dataset_for_seed(5), build_dataset(5));
    }
}
