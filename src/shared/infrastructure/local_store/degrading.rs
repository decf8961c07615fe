// Local store that falls back to memory once its primary store fails.
//
// After the first failure every write goes to the in-memory store for the
// rest of the session. Reads try memory first, then whatever the primary can
// still serve. Writes to the primary are not retried.

use crate::shared::infrastructure::local_store::in_memory::InMemoryLocalStore;
use crate::shared::infrastructure::local_store::{LocalStore, LocalStoreError};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct DegradingLocalStore<TStore>
where
    TStore: LocalStore,
{
    primary: TStore,
    fallback: InMemoryLocalStore,
    degraded: AtomicBool,
}

impl<TStore> DegradingLocalStore<TStore>
where
    TStore: LocalStore,
{
    pub fn new(primary: TStore) -> Self {
        Self {
            primary,
            fallback: InMemoryLocalStore::new(),
            degraded: AtomicBool::new(false),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    fn degrade(&self, error: &LocalStoreError) {
        if !self.degraded.swap(true, Ordering::SeqCst) {
            tracing::warn!(%error, "local store failed, caching in memory for this session");
        }
    }
}

impl<TStore> LocalStore for DegradingLocalStore<TStore>
where
    TStore: LocalStore,
{
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        if self.is_degraded() {
            if let Some(value) = self.fallback.get_item(key)? {
                return Ok(Some(value));
            }
            return Ok(self.primary.get_item(key).ok().flatten());
        }
        match self.primary.get_item(key) {
            Ok(value) => Ok(value),
            Err(error) => {
                self.degrade(&error);
                self.fallback.get_item(key)
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        if self.is_degraded() {
            return self.fallback.set_item(key, value);
        }
        match self.primary.set_item(key, value) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.degrade(&error);
                self.fallback.set_item(key, value)
            }
        }
    }
}

#[cfg(test)]
mod degrading_local_store_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_use_the_primary_store_while_it_works() {
        let store = DegradingLocalStore::new(InMemoryLocalStore::new());
        store.set_item("history.1.42", "100").unwrap();
        assert_eq!(store.get_item("history.1.42").unwrap(), Some("100".into()));
        assert!(!store.is_degraded());
        assert_eq!(store.primary.len(), 1);
    }

    #[rstest]
    fn it_should_fall_back_to_memory_when_the_primary_fails() {
        let mut primary = InMemoryLocalStore::new();
        primary.toggle_offline();
        let store = DegradingLocalStore::new(primary);

        assert_eq!(store.get_item("history.1.42").unwrap(), None);
        assert!(store.is_degraded());

        store.set_item("history.1.42", "100").unwrap();
        assert_eq!(store.get_item("history.1.42").unwrap(), Some("100".into()));
    }

    struct ReadOnlyStore {
        inner: InMemoryLocalStore,
    }

    impl LocalStore for ReadOnlyStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), LocalStoreError> {
            Err(LocalStoreError::Unavailable("quota exceeded".into()))
        }
    }

    #[rstest]
    fn it_should_still_read_the_primary_when_only_its_writes_fail() {
        let inner = InMemoryLocalStore::new();
        inner.set_item("history.7.1", "1700000000").unwrap();
        let store = DegradingLocalStore::new(ReadOnlyStore { inner });

        store.set_item("history.7.2", "1700000050").unwrap();

        assert!(store.is_degraded());
        assert_eq!(store.get_item("history.7.1").unwrap(), Some("1700000000".into()));
        assert_eq!(store.get_item("history.7.2").unwrap(), Some("1700000050".into()));
        assert_eq!(store.get_item("history.7.3").unwrap(), None);
    }

    #[rstest]
    fn it_should_prefer_values_written_after_degrading() {
        let inner = InMemoryLocalStore::new();
        inner.set_item("history.7.1", "1600000000").unwrap();
        let store = DegradingLocalStore::new(ReadOnlyStore { inner });

        store.set_item("history.7.1", "1700000000").unwrap();

        assert_eq!(store.get_item("history.7.1").unwrap(), Some("1700000000".into()));
    }

    #[rstest]
    fn it_should_keep_writes_readable_after_degrading_on_a_write() {
        let mut primary = InMemoryLocalStore::new();
        primary.toggle_offline();
        let store = DegradingLocalStore::new(primary);

        store.set_item("history.1.42", "100").unwrap();
        assert!(store.is_degraded());
        assert_eq!(store.get_item("history.1.42").unwrap(), Some("100".into()));
    }
}
