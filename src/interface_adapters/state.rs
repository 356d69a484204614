use std::sync::Arc;

use crate::frameworks::store::InMemoryStore;
use crate::use_cases::GameCoordinator;

pub struct AppState {
    // Shared room/event store every room handler reads and writes.
    pub store: Arc<InMemoryStore>,
    // Mutating game workflows executed on behalf of the calling client.
    pub coordinator: GameCoordinator<InMemoryStore>,
}
