// In memory implementation of the ReadTimestampService port.
//
// Purpose
// - Exercise the read tracker without a network.
//
// Responsibilities
// - Hold the timestamps the "server" knows about.
// - Record every request so tests can assert on network traffic.
// - Simulate outages, per-item failures and slow responses.

use crate::modules::history::adapters::outbound::read_service::{
    ReadServiceError, ReadTimestampService,
};
use crate::shared::core::primitives::{ItemId, Timestamp};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

pub const DEFAULT_READ_AT: Timestamp = 1_700_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Fetch(Vec<ItemId>),
    MarkAsRead(ItemId),
}

pub struct InMemoryReadService {
    timestamps: RwLock<HashMap<ItemId, Timestamp>>,
    read_at: AtomicI64,
    delay_ms: AtomicU64,
    failing_items: Mutex<HashSet<ItemId>>,
    requests: Mutex<Vec<RecordedRequest>>,
    is_offline: bool,
}

impl Default for InMemoryReadService {
    fn default() -> Self {
        Self {
            timestamps: RwLock::new(HashMap::new()),
            read_at: AtomicI64::new(DEFAULT_READ_AT),
            delay_ms: AtomicU64::new(0),
            failing_items: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
            is_offline: false,
        }
    }
}

impl InMemoryReadService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reads(reads: impl IntoIterator<Item = (ItemId, Timestamp)>) -> Self {
        Self {
            timestamps: RwLock::new(reads.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Timestamp the service assigns to the next mark-as-read.
    pub fn set_read_at(&self, timestamp: Timestamp) {
        self.read_at.store(timestamp, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub async fn fail_item(&self, item_id: ItemId) {
        self.failing_items.lock().await.insert(item_id);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

#[async_trait]
impl ReadTimestampService for InMemoryReadService {
    async fn fetch_read_timestamps(
        &self,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, Timestamp>, ReadServiceError> {
        self.requests
            .lock()
            .await
            .push(RecordedRequest::Fetch(item_ids.to_vec()));
        self.simulate_latency().await;
        if self.is_offline {
            return Err(ReadServiceError::Unavailable("Read service offline".into()));
        }

        let guard = self.timestamps.read().await;
        Ok(item_ids
            .iter()
            .filter_map(|item_id| guard.get(item_id).map(|ts| (item_id.clone(), *ts)))
            .collect())
    }

    async fn mark_as_read(&self, item_id: &ItemId) -> Result<Timestamp, ReadServiceError> {
        self.requests
            .lock()
            .await
            .push(RecordedRequest::MarkAsRead(item_id.clone()));
        self.simulate_latency().await;
        if self.is_offline {
            return Err(ReadServiceError::Unavailable("Read service offline".into()));
        }
        if self.failing_items.lock().await.contains(item_id) {
            return Err(ReadServiceError::Unavailable(format!(
                "Read service rejected item {item_id}"
            )));
        }

        let read_at = self.read_at.load(Ordering::SeqCst);
        self.timestamps
            .write()
            .await
            .insert(item_id.clone(), read_at);
        Ok(read_at)
    }
}
