use crate::modules::history::adapters::outbound::read_log::ReadLog;
use crate::shared::core::primitives::{ItemId, Timestamp, UserId};
use std::collections::HashMap;
use std::sync::Arc;

pub struct LookupReadTimestampsHandler<TReadLog>
where
    TReadLog: ReadLog + Send + Sync + 'static,
{
    read_log: Arc<TReadLog>,
}

impl<TReadLog> LookupReadTimestampsHandler<TReadLog>
where
    TReadLog: ReadLog + Send + Sync + 'static,
{
    pub fn new(read_log: Arc<TReadLog>) -> Self {
        Self { read_log }
    }

    pub async fn handle(
        &self,
        user_id: &UserId,
        item_ids: &[ItemId],
    ) -> anyhow::Result<HashMap<ItemId, Timestamp>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.read_log.lookup(user_id, item_ids).await
    }
}
