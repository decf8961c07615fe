// Client-side "last read" tracker for one session.
//
// Responsibilities
// - Answer last-read lookups synchronously from the embedded snapshot or the
//   local store.
// - Mirror server state into the local store on bulk fetches and mark-as-read.
// - Decide whether content is recent enough to be worth a server check.
//
// Boundaries
// - Snapshot values are never written to the local store.
// - Remote failures leave the local store untouched and are returned to the caller.

use crate::modules::history::adapters::outbound::read_service::{
    ReadServiceError, ReadTimestampService,
};
use crate::modules::history::core::errors::HistoryError;
use crate::modules::history::core::settings::TrackerSettings;
use crate::modules::history::core::snapshot::EmbeddedSnapshot;
use crate::modules::history::core::staleness;
use crate::modules::history::core::storage_key::storage_key;
use crate::modules::history::core::timestamps::parse_timestamp;
use crate::modules::history::use_cases::track_reads::in_flight::{
    InFlightFetches, wait_for_fetch,
};
use crate::shared::core::clock::Clock;
use crate::shared::core::primitives::{ItemId, NEVER_READ, Timestamp, UserId};
use crate::shared::infrastructure::local_store::LocalStore;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

pub struct ReadTracker<TService, TStore>
where
    TService: ReadTimestampService + 'static,
    TStore: LocalStore + 'static,
{
    user_id: Option<UserId>,
    snapshot: Option<EmbeddedSnapshot>,
    pending_mark_as_read: Vec<ItemId>,
    namespace: String,
    request_timeout: Duration,
    service: Arc<TService>,
    store: Arc<TStore>,
    clock: Arc<dyn Clock>,
    in_flight: InFlightFetches,
}

impl<TService, TStore> ReadTracker<TService, TStore>
where
    TService: ReadTimestampService + 'static,
    TStore: LocalStore + 'static,
{
    /// `service` must act for `settings.user_id`: whatever it returns is cached
    /// under that user's keys. `HttpReadService::for_settings` builds one that does.
    pub fn new(
        settings: TrackerSettings,
        service: Arc<TService>,
        store: Arc<TStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_id: settings.user_id,
            snapshot: settings.snapshot,
            pending_mark_as_read: settings.pending_mark_as_read,
            namespace: settings.namespace,
            request_timeout: settings.request_timeout,
            service,
            store,
            clock,
            in_flight: InFlightFetches::new(),
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn pending_mark_as_read(&self) -> &[ItemId] {
        &self.pending_mark_as_read
    }

    /// Makes sure the local store holds the server's timestamps for `item_ids`.
    ///
    /// Does nothing when a snapshot is embedded, since the snapshot is taken to
    /// be complete. Ids another call is already fetching are not requested
    /// again; this call waits for that fetch instead.
    pub async fn fetch_timestamps(&self, item_ids: &[ItemId]) -> Result<(), HistoryError> {
        let Some(user_id) = &self.user_id else {
            tracing::debug!("anonymous session, skipping read timestamp fetch");
            return Ok(());
        };
        if self.snapshot.is_some() {
            tracing::debug!(user = %user_id, "embedded snapshot present, skipping read timestamp fetch");
            return Ok(());
        }

        let mut seen = HashSet::new();
        let unique: Vec<ItemId> = item_ids
            .iter()
            .filter(|item_id| seen.insert(*item_id))
            .cloned()
            .collect();
        if unique.is_empty() {
            return Ok(());
        }

        let claim = self.in_flight.claim(&unique);
        let mut outcome = Ok(());

        if let Some(lease) = claim.lease {
            let result = self
                .within_timeout(self.service.fetch_read_timestamps(lease.item_ids()))
                .await;
            match &result {
                Ok(timestamps) => self.store_timestamps(user_id, timestamps),
                Err(error) => tracing::warn!(
                    user = %user_id,
                    items = lease.item_ids().len(),
                    %error,
                    "failed to fetch read timestamps, keeping cached values"
                ),
            }
            outcome = result.map(|_| ());
            lease.complete(outcome.clone());
        }

        if !claim.waiting.is_empty() {
            tracing::debug!(
                user = %user_id,
                fetches = claim.waiting.len(),
                "waiting on in-flight read timestamp fetches"
            );
        }
        for receiver in claim.waiting {
            let waited = wait_for_fetch(receiver).await;
            if outcome.is_ok() {
                outcome = waited;
            }
        }

        outcome.map_err(HistoryError::from)
    }

    /// Last time the user read `item_id`, [`NEVER_READ`] when unknown.
    pub fn get_last_read(&self, item_id: &ItemId) -> Timestamp {
        let Some(user_id) = &self.user_id else {
            return NEVER_READ;
        };
        if let Some(timestamp) = self.snapshot_value(item_id) {
            return timestamp;
        }
        self.cached(user_id, item_id)
    }

    /// Marks `item_id` as read on the server and mirrors the returned
    /// timestamp locally, unless the snapshot covers the item.
    pub async fn mark_as_read(&self, item_id: &ItemId) -> Result<Timestamp, HistoryError> {
        let user_id = self.user_id.as_ref().ok_or(HistoryError::TrackingDisabled)?;

        let timestamp = self
            .within_timeout(self.service.mark_as_read(item_id))
            .await
            .inspect_err(|error| {
                tracing::warn!(user = %user_id, item = %item_id, %error, "failed to mark item as read");
            })?;

        if self.snapshot_value(item_id).is_some() {
            tracing::debug!(user = %user_id, item = %item_id, "item covered by embedded snapshot, not caching");
            return Ok(timestamp);
        }
        self.store_timestamp(user_id, item_id, timestamp);
        Ok(timestamp)
    }

    /// Whether content on `item_id` published at `content_timestamp` could be
    /// unread and should be checked with the server.
    pub fn needs_server_check(&self, item_id: &ItemId, content_timestamp: Timestamp) -> bool {
        if self.user_id.is_none() {
            return false;
        }
        staleness::needs_server_check(content_timestamp, self.clock.now(), || {
            self.get_last_read(item_id)
        })
    }

    /// Marks every pending item as read, concurrently. A failing item does
    /// not hold back the others.
    pub async fn mark_pending_as_read(self: &Arc<Self>) -> Vec<(ItemId, Result<Timestamp, HistoryError>)> {
        let mut tasks = JoinSet::new();
        for item_id in self.pending_mark_as_read.iter().cloned() {
            let tracker = Arc::clone(self);
            tasks.spawn(async move {
                let result = tracker.mark_as_read(&item_id).await;
                (item_id, result)
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(error) => tracing::warn!(%error, "mark-as-read task did not finish"),
            }
        }
        results
    }

    fn snapshot_value(&self, item_id: &ItemId) -> Option<Timestamp> {
        self.snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.covering(item_id))
    }

    fn cached(&self, user_id: &UserId, item_id: &ItemId) -> Timestamp {
        let key = storage_key(&self.namespace, user_id, item_id);
        match self.store.get_item(&key) {
            Ok(Some(raw)) => parse_timestamp(&raw),
            Ok(None) => NEVER_READ,
            Err(error) => {
                tracing::warn!(%key, %error, "failed to read cached timestamp");
                NEVER_READ
            }
        }
    }

    fn store_timestamps(&self, user_id: &UserId, timestamps: &HashMap<ItemId, Timestamp>) {
        for (item_id, timestamp) in timestamps {
            self.store_timestamp(user_id, item_id, *timestamp);
        }
    }

    fn store_timestamp(&self, user_id: &UserId, item_id: &ItemId, timestamp: Timestamp) {
        let key = storage_key(&self.namespace, user_id, item_id);
        if let Err(error) = self.store.set_item(&key, &timestamp.to_string()) {
            tracing::warn!(%key, %error, "failed to cache timestamp");
        }
    }

    async fn within_timeout<T>(
        &self,
        request: impl Future<Output = Result<T, ReadServiceError>>,
    ) -> Result<T, ReadServiceError> {
        tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| ReadServiceError::Timeout(self.request_timeout))?
    }
}
