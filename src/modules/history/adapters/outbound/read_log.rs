use crate::shared::core::primitives::{ItemId, Timestamp, UserId};
use async_trait::async_trait;
use std::collections::HashMap;

/// Server-side record of when each user last read each item.
#[async_trait]
pub trait ReadLog: Send + Sync {
    async fn record(&self, user_id: &UserId, item_id: &ItemId, read_at: Timestamp) -> anyhow::Result<()>;
    async fn lookup(
        &self,
        user_id: &UserId,
        item_ids: &[ItemId],
    ) -> anyhow::Result<HashMap<ItemId, Timestamp>>;
}
