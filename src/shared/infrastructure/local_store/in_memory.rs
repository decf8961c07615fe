use crate::shared::infrastructure::local_store::{LocalStore, LocalStoreError};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryLocalStore {
    items: RwLock<HashMap<String, String>>,
    is_offline: bool,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStore for InMemoryLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        if self.is_offline {
            return Err(LocalStoreError::Unavailable("Local store offline".into()));
        }

        let items = self
            .items
            .read()
            .map_err(|_| LocalStoreError::Unavailable("Local store lock poisoned".into()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        if self.is_offline {
            return Err(LocalStoreError::Unavailable("Local store offline".into()));
        }

        self.items
            .write()
            .map_err(|_| LocalStoreError::Unavailable("Local store lock poisoned".into()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
