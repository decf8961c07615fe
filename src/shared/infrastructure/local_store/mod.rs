// Client-side key-value storage for cached read timestamps.
//
// Purpose
// - Keep the tracker independent of where cached values live.
//
// Boundaries
// - Calls are synchronous. Reads happen on paths that must never suspend.
// - No TTL and no eviction. Entries live until the backing storage goes away.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("local store unavailable: {0}")]
    Unavailable(String),

    #[error("local store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("local store is corrupt: {0}")]
    Corrupt(String),
}

pub trait LocalStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;
}

pub mod degrading;
pub mod in_memory;
pub mod json_file;
