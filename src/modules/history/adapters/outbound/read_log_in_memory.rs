// In memory read log.
//
// Purpose
// - Back the read-timestamp service without a database.
//
// Responsibilities
// - Keep one timestamp per (user, item), replaced on every read.

use crate::modules::history::adapters::outbound::read_log::ReadLog;
use crate::shared::core::primitives::{ItemId, Timestamp, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryReadLog {
    reads: RwLock<HashMap<(UserId, ItemId), Timestamp>>,
    is_offline: bool,
}

impl InMemoryReadLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait::async_trait]
impl ReadLog for InMemoryReadLog {
    async fn record(&self, user_id: &UserId, item_id: &ItemId, read_at: Timestamp) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Read log offline"));
        }

        self.reads
            .write()
            .await
            .insert((user_id.clone(), item_id.clone()), read_at);
        Ok(())
    }

    async fn lookup(
        &self,
        user_id: &UserId,
        item_ids: &[ItemId],
    ) -> anyhow::Result<HashMap<ItemId, Timestamp>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Read log offline"));
        }

        let guard = self.reads.read().await;
        Ok(item_ids
            .iter()
            .filter_map(|item_id| {
                guard
                    .get(&(user_id.clone(), item_id.clone()))
                    .map(|read_at| (item_id.clone(), *read_at))
            })
            .collect())
    }
}
