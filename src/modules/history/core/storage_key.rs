use crate::shared::core::primitives::{ItemId, UserId};

pub const DEFAULT_NAMESPACE: &str = "history";

/// `<namespace>.<user>.<item>`
pub fn storage_key(namespace: &str, user_id: &UserId, item_id: &ItemId) -> String {
    format!("{namespace}.{user_id}.{item_id}")
}
