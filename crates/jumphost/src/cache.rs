//! Snapshot cache for API list responses.

use std::time::Instant;

struct Snapshot<T> {
    items: Vec<T>,
    fetched_at: Instant,
}

/// Either empty or holding a complete list from one fetch.
pub(crate) struct CachedList<T> {
    snapshot: Option<Snapshot<T>>,
}

impl<T> CachedList<T> {
    pub(crate) const fn new() -> Self {
        Self { snapshot: None }
    }

    pub(crate) fn get(&self) -> Option<&[T]> {
        self.snapshot.as_ref().map(|snapshot| snapshot.items.as_slice())
    }

    pub(crate) fn is_populated(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Replace the snapshot and return the stored items.
    pub(crate) fn store(&mut self, items: Vec<T>) -> &[T] {
        let snapshot = self.snapshot.insert(Snapshot {
            items,
            fetched_at: Instant::now(),
        });
        &snapshot.items
    }

    pub(crate) fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub(crate) fn fetched_at(&self) -> Option<Instant> {
        self.snapshot.as_ref().map(|snapshot| snapshot.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::CachedList;

    #[test]
    fn store_and_invalidate() {
        let mut cache = CachedList::new();
        assert!(!cache.is_populated());
        assert!(cache.fetched_at().is_none());

        assert_eq!(cache.store(vec![1, 2, 3]), &[1, 2, 3]);
        assert_eq!(cache.get(), Some(&[1, 2, 3][..]));
        assert!(cache.fetched_at().is_some());

        cache.invalidate();
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn empty_list_is_still_a_snapshot() {
        let mut cache: CachedList<u8> = CachedList::new();
        cache.store(Vec::new());
        assert!(cache.is_populated());
        assert_eq!(cache.get(), Some(&[][..]));
    }
}
