use crate::shared::core::primitives::Timestamp;

/// Content older than this is always considered read.
pub const STALENESS_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;

pub fn staleness_cutoff(now: Timestamp) -> Timestamp {
    now - STALENESS_WINDOW_SECS
}

pub fn is_beyond_staleness_window(content_timestamp: Timestamp, now: Timestamp) -> bool {
    content_timestamp < staleness_cutoff(now)
}

/// Whether content published at `content_timestamp` may be unread and should
/// be checked with the server. `last_read` is only consulted for content
/// inside the staleness window.
pub fn needs_server_check(
    content_timestamp: Timestamp,
    now: Timestamp,
    last_read: impl FnOnce() -> Timestamp,
) -> bool {
    if is_beyond_staleness_window(content_timestamp, now) {
        return false;
    }
    content_timestamp > last_read()
}
