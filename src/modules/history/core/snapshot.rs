use crate::modules::history::core::timestamps::timestamp_from_json;
use crate::shared::core::primitives::{ItemId, NEVER_READ, Timestamp};
use serde_json::Value;
use std::collections::HashMap;

/// Last-read timestamps embedded in the initial page load.
///
/// Supplied once per session and never mutated. While a snapshot is present
/// it is treated as complete, so bulk fetches are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedSnapshot {
    timestamps: HashMap<ItemId, Timestamp>,
}

impl EmbeddedSnapshot {
    pub fn new(timestamps: HashMap<ItemId, Timestamp>) -> Self {
        Self { timestamps }
    }

    /// Builds a snapshot from raw page data, where values may be numbers or
    /// numeric strings.
    pub fn from_raw(raw: &serde_json::Map<String, Value>) -> Self {
        raw.iter()
            .map(|(item_id, value)| (ItemId::new(item_id.as_str()), timestamp_from_json(value)))
            .collect()
    }

    /// The snapshot value for `item_id`, when the snapshot covers it.
    /// A zero entry does not count as covered.
    pub fn covering(&self, item_id: &ItemId) -> Option<Timestamp> {
        self.timestamps
            .get(item_id)
            .copied()
            .filter(|timestamp| *timestamp != NEVER_READ)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl FromIterator<(ItemId, Timestamp)> for EmbeddedSnapshot {
    fn from_iter<T: IntoIterator<Item = (ItemId, Timestamp)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
