// Session configuration for the read tracker.
//
// Built in code, or from the page-initialization document:
//
//   {"user": {"uid": "7"},
//    "history": {"lastReadTimestamps": {"42": 1700000000},
//                "nodesToMarkAsRead": {"43": true}}}

use crate::modules::history::core::errors::HistoryError;
use crate::modules::history::core::snapshot::EmbeddedSnapshot;
use crate::modules::history::core::storage_key::DEFAULT_NAMESPACE;
use crate::shared::core::primitives::{ItemId, UserId};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSettings {
    pub user_id: Option<UserId>,
    pub snapshot: Option<EmbeddedSnapshot>,
    pub pending_mark_as_read: Vec<ItemId>,
    pub namespace: String,
    pub request_timeout: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl TrackerSettings {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            snapshot: None,
            pending_mark_as_read: Vec::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Settings for `user_id`. Anonymous ids yield anonymous settings.
    pub fn for_user(user_id: impl Into<UserId>) -> Self {
        let user_id = UserId::new(user_id.into().as_str().trim());
        Self {
            user_id: (!user_id.is_anonymous()).then_some(user_id),
            ..Self::anonymous()
        }
    }

    pub fn with_snapshot(mut self, snapshot: EmbeddedSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_pending_mark_as_read(mut self, item_ids: impl IntoIterator<Item = ItemId>) -> Self {
        self.pending_mark_as_read = item_ids.into_iter().collect();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn from_page_settings_json(raw: &str) -> Result<Self, HistoryError> {
        let page: PageSettings =
            serde_json::from_str(raw).map_err(|e| HistoryError::InvalidSettings(e.to_string()))?;
        Ok(page.into())
    }
}

#[derive(Debug, Deserialize)]
struct PageSettings {
    #[serde(default)]
    user: Option<PageUser>,
    #[serde(default)]
    history: Option<PageHistory>,
}

#[derive(Debug, Deserialize)]
struct PageUser {
    #[serde(default)]
    uid: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageHistory {
    #[serde(default)]
    last_read_timestamps: Value,
    #[serde(default)]
    nodes_to_mark_as_read: Value,
}

impl From<PageSettings> for TrackerSettings {
    fn from(page: PageSettings) -> Self {
        let mut settings = match page.user.as_ref().and_then(|user| uid_of(&user.uid)) {
            Some(user_id) => Self::for_user(user_id),
            None => Self::anonymous(),
        };
        let history = page.history.unwrap_or_default();

        // The server encodes an empty map as `[]`. It still means "snapshot present".
        settings.snapshot = match &history.last_read_timestamps {
            Value::Object(raw) => Some(EmbeddedSnapshot::from_raw(raw)),
            Value::Array(_) => Some(EmbeddedSnapshot::default()),
            _ => None,
        };
        settings.pending_mark_as_read = match &history.nodes_to_mark_as_read {
            Value::Object(raw) => raw.keys().map(|key| ItemId::new(key.as_str())).collect(),
            Value::Array(ids) => ids.iter().filter_map(item_id_of).collect(),
            _ => Vec::new(),
        };
        settings
    }
}

fn uid_of(value: &Value) -> Option<UserId> {
    match value {
        Value::String(raw) => Some(UserId::new(raw.trim())),
        Value::Number(number) => Some(UserId::new(number.to_string())),
        _ => None,
    }
}

fn item_id_of(value: &Value) -> Option<ItemId> {
    match value {
        Value::String(raw) => Some(ItemId::new(raw.as_str())),
        Value::Number(number) => Some(ItemId::new(number.to_string())),
        _ => None,
    }
}
