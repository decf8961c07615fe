// Registry of bulk fetches that are currently outstanding, keyed by item id.
//
// A caller claims the ids it wants. Ids nobody is fetching are leased to the
// caller; ids already leased come back as receivers to wait on. Dropping a
// lease releases its ids, so a cancelled fetch never blocks later callers.

use crate::modules::history::adapters::outbound::read_service::ReadServiceError;
use crate::shared::core::primitives::ItemId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

type Outcome = Option<Result<(), ReadServiceError>>;

#[derive(Default)]
pub struct InFlightFetches {
    pending: Mutex<HashMap<ItemId, watch::Receiver<Outcome>>>,
}

pub struct FetchClaim<'a> {
    pub lease: Option<FetchLease<'a>>,
    pub waiting: Vec<watch::Receiver<Outcome>>,
}

pub struct FetchLease<'a> {
    registry: &'a InFlightFetches,
    item_ids: Vec<ItemId>,
    sender: watch::Sender<Outcome>,
}

impl InFlightFetches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, item_ids: &[ItemId]) -> FetchClaim<'_> {
        let (sender, receiver) = watch::channel(None);
        let mut owned = Vec::new();
        let mut waiting: Vec<watch::Receiver<Outcome>> = Vec::new();

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for item_id in item_ids {
            match pending.get(item_id) {
                Some(in_flight) => {
                    if !waiting.iter().any(|rx| rx.same_channel(in_flight)) {
                        waiting.push(in_flight.clone());
                    }
                }
                None => {
                    pending.insert(item_id.clone(), receiver.clone());
                    owned.push(item_id.clone());
                }
            }
        }
        drop(pending);

        let lease = (!owned.is_empty()).then(|| FetchLease {
            registry: self,
            item_ids: owned,
            sender,
        });
        FetchClaim { lease, waiting }
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, item_ids: &[ItemId]) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for item_id in item_ids {
            pending.remove(item_id);
        }
    }
}

impl FetchLease<'_> {
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    /// Releases the leased ids, then wakes everyone waiting on them.
    pub fn complete(mut self, outcome: Result<(), ReadServiceError>) {
        let item_ids = std::mem::take(&mut self.item_ids);
        self.registry.release(&item_ids);
        self.sender.send_replace(Some(outcome));
    }
}

impl Drop for FetchLease<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.item_ids);
    }
}

/// Waits until the fetch behind `receiver` finishes and returns its outcome.
pub async fn wait_for_fetch(mut receiver: watch::Receiver<Outcome>) -> Result<(), ReadServiceError> {
    match receiver.wait_for(Option::is_some).await {
        Ok(outcome) => (*outcome).clone().unwrap_or(Ok(())),
        Err(_) => Err(ReadServiceError::Unavailable(
            "in-flight fetch was abandoned".into(),
        )),
    }
}
