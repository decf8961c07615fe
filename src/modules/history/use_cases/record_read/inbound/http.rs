use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::modules::history::adapters::inbound::session::current_user;
use crate::shared::core::primitives::ItemId;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    let Some(user_id) = current_user(&headers) else {
        return StatusCode::FORBIDDEN.into_response();
    };

    match state.record_read.handle(&user_id, &ItemId::new(item_id)).await {
        Ok(read_at) => Json(read_at).into_response(),
        Err(error) => {
            tracing::error!(%error, "failed to record read");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
