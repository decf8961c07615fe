use crate::modules::history::adapters::outbound::read_log_in_memory::InMemoryReadLog;
use crate::modules::history::use_cases::lookup_read_timestamps::handler::LookupReadTimestampsHandler;
use crate::modules::history::use_cases::record_read::handler::RecordReadHandler;
use crate::shared::core::clock::Clock;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub record_read: Arc<RecordReadHandler<InMemoryReadLog>>,
    pub lookup_read_timestamps: Arc<LookupReadTimestampsHandler<InMemoryReadLog>>,
}

impl AppState {
    pub fn new(read_log: Arc<InMemoryReadLog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            record_read: Arc::new(RecordReadHandler::new(read_log.clone(), clock)),
            lookup_read_timestamps: Arc::new(LookupReadTimestampsHandler::new(read_log)),
        }
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(InMemoryReadLog::new()), clock)
    }
}
