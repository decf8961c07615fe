use crate::modules::history::adapters::outbound::read_service::ReadServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("read tracking is disabled for anonymous users")]
    TrackingDisabled,

    #[error("remote read service unavailable: {0}")]
    RemoteUnavailable(#[from] ReadServiceError),

    #[error("invalid page settings: {0}")]
    InvalidSettings(String),
}
