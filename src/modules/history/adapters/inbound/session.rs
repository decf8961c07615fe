use crate::shared::core::primitives::UserId;
use axum::http::HeaderMap;

/// Header carrying the authenticated user of a request.
pub const USER_HEADER: &str = "x-history-user";

/// The authenticated user of a request, `None` for anonymous requests.
pub fn current_user(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|raw| UserId::new(raw.trim()))
        .filter(|user_id| !user_id.is_anonymous())
}
