use crate::shared::core::primitives::{ItemId, Timestamp};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Remote source of truth for read timestamps, scoped to one session's user.
#[async_trait]
pub trait ReadTimestampService: Send + Sync {
    /// Timestamps for the items among `item_ids` that the user has read.
    async fn fetch_read_timestamps(
        &self,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, Timestamp>, ReadServiceError>;

    /// Records a read of `item_id` now and returns the recorded timestamp.
    async fn mark_as_read(&self, item_id: &ItemId) -> Result<Timestamp, ReadServiceError>;
}
