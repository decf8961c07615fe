use crate::modules::history::adapters::outbound::read_log::ReadLog;
use crate::shared::core::clock::Clock;
use crate::shared::core::primitives::{ItemId, Timestamp, UserId};
use std::sync::Arc;

pub struct RecordReadHandler<TReadLog>
where
    TReadLog: ReadLog + Send + Sync + 'static,
{
    read_log: Arc<TReadLog>,
    clock: Arc<dyn Clock>,
}

impl<TReadLog> RecordReadHandler<TReadLog>
where
    TReadLog: ReadLog + Send + Sync + 'static,
{
    pub fn new(read_log: Arc<TReadLog>, clock: Arc<dyn Clock>) -> Self {
        Self { read_log, clock }
    }

    /// Records that `user_id` read `item_id` now and returns that instant.
    pub async fn handle(&self, user_id: &UserId, item_id: &ItemId) -> anyhow::Result<Timestamp> {
        let read_at = self.clock.now();
        self.read_log.record(user_id, item_id, read_at).await?;
        tracing::debug!(user = %user_id, item = %item_id, read_at, "recorded read");
        Ok(read_at)
    }
}
