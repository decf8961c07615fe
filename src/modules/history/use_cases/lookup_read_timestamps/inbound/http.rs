use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::modules::history::adapters::inbound::session::current_user;
use crate::shared::core::primitives::ItemId;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct ReadTimestampsBody {
    #[serde(default)]
    pub node_ids: Vec<ItemId>,
}

pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ReadTimestampsBody>, JsonRejection>,
) -> impl IntoResponse {
    let Some(user_id) = current_user(&headers) else {
        return StatusCode::FORBIDDEN.into_response();
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    match state
        .lookup_read_timestamps
        .handle(&user_id, &body.node_ids)
        .await
    {
        Ok(reads) => Json(reads).into_response(),
        Err(error) => {
            tracing::error!(%error, "failed to look up read timestamps");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
