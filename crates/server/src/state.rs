use std::sync::Arc;

use service::events::{EventStore, EventsService};

/// Shared handler state. The store is erased so the same router serves the
/// SeaORM store in production and the in-memory one in tests.
#[derive(Clone)]
pub struct ServerState {
    pub events: Arc<EventsService<dyn EventStore>>,
}

impl ServerState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { events: Arc::new(EventsService::new(store)) }
    }
}
