//! Keyed lock table: one exclusive section per product.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use pharmasafe_core::ProductId;

/// Serializes read-stage → validate → append → commit for a single product
/// while letting different products proceed in parallel.
#[derive(Debug, Default)]
pub struct ProductLocks {
    table: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, product_id: &ProductId) -> Arc<Mutex<()>> {
        // The table only ever gains entries, so a poisoned table is still consistent.
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entry(product_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` while holding the lock for `product_id`.
    pub fn with_lock<T>(&self, product_id: &ProductId, f: impl FnOnce() -> T) -> T {
        let lock = self.handle(product_id);
        // The mutex guards no data; a panic in another section leaves nothing to repair here.
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn pid(raw: &str) -> ProductId {
        ProductId::parse(raw).unwrap()
    }

    #[test]
    fn same_product_sections_never_overlap() {
        let locks = Arc::new(ProductLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (locks, inside, max_seen) = (locks.clone(), inside.clone(), max_seen.clone());
                std::thread::spawn(move || {
                    locks.with_lock(&pid("p1"), || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn different_products_run_in_parallel() {
        let locks = Arc::new(ProductLocks::new());
        let barrier = Arc::new(Barrier::new(2));

        // Both sections must be inside at once to pass the barrier.
        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|id| {
                let (locks, barrier) = (locks.clone(), barrier.clone());
                std::thread::spawn(move || locks.with_lock(&pid(id), || barrier.wait()))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(locks.len(), 2);
    }
}
