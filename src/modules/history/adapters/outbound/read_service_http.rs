// HTTP implementation of the ReadTimestampService port.
//
// Wire format
// - POST {base}/history/get_node_read_timestamps, body {"node_ids": [...]},
//   answers {"<id>": <timestamp>, ...} for the items the user has read.
// - POST {base}/history/{id}/read, answers the recorded timestamp.
// - The session user travels in the `x-history-user` header.

use crate::modules::history::adapters::inbound::session::USER_HEADER;
use crate::modules::history::adapters::outbound::read_service::{
    ReadServiceError, ReadTimestampService,
};
use crate::modules::history::core::settings::TrackerSettings;
use crate::modules::history::core::timestamps::timestamp_from_json;
use crate::shared::core::primitives::{ItemId, NEVER_READ, Timestamp, UserId};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Serialize)]
struct ReadTimestampsRequest<'a> {
    node_ids: &'a [ItemId],
}

#[derive(Clone)]
pub struct HttpReadService {
    client: Client,
    base_url: Url,
    user_id: UserId,
    timeout: Duration,
}

impl HttpReadService {
    pub fn new(base_url: &str, user_id: UserId, timeout: Duration) -> Result<Self, ReadServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ReadServiceError::Unavailable(format!("invalid base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ReadServiceError::Unavailable(format!(
                "invalid base url {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReadServiceError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            user_id,
            timeout,
        })
    }

    /// Client acting for the tracker's user, with the tracker's timeout. An
    /// anonymous tracker never calls the service, so it gets the anonymous id.
    pub fn for_settings(base_url: &str, settings: &TrackerSettings) -> Result<Self, ReadServiceError> {
        let user_id = settings.user_id.clone().unwrap_or_else(|| UserId::new("0"));
        Self::new(base_url, user_id, settings.request_timeout)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request_error(&self, error: reqwest::Error) -> ReadServiceError {
        if error.is_timeout() {
            ReadServiceError::Timeout(self.timeout)
        } else {
            ReadServiceError::Unavailable(error.to_string())
        }
    }

    async fn read_json(&self, response: Response) -> Result<Value, ReadServiceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ReadServiceError::Unavailable(format!(
                "unexpected status {status}"
            )));
        }
        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                ReadServiceError::Timeout(self.timeout)
            } else {
                ReadServiceError::InvalidResponse(e.to_string())
            }
        })
    }
}

#[async_trait]
impl ReadTimestampService for HttpReadService {
    async fn fetch_read_timestamps(
        &self,
        item_ids: &[ItemId],
    ) -> Result<HashMap<ItemId, Timestamp>, ReadServiceError> {
        let response = self
            .client
            .post(self.endpoint(&["history", "get_node_read_timestamps"]))
            .header(USER_HEADER, self.user_id.as_str())
            .json(&ReadTimestampsRequest { node_ids: item_ids })
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        match self.read_json(response).await? {
            Value::Object(results) => Ok(results
                .iter()
                .map(|(item_id, value)| (ItemId::new(item_id.as_str()), timestamp_from_json(value)))
                .collect()),
            // An empty map may arrive as `[]`.
            Value::Array(results) if results.is_empty() => Ok(HashMap::new()),
            other => Err(ReadServiceError::InvalidResponse(format!(
                "expected an object of timestamps, got {other}"
            ))),
        }
    }

    async fn mark_as_read(&self, item_id: &ItemId) -> Result<Timestamp, ReadServiceError> {
        let response = self
            .client
            .post(self.endpoint(&["history", item_id.as_str(), "read"]))
            .header(USER_HEADER, self.user_id.as_str())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let value = self.read_json(response).await?;
        match timestamp_from_json(&value) {
            NEVER_READ => Err(ReadServiceError::InvalidResponse(format!(
                "expected a timestamp, got {value}"
            ))),
            timestamp => Ok(timestamp),
        }
    }
}
