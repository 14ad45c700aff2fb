use std::sync::Arc;

use crate::moderation::{IdeaStore, ProfileStore, QueueRegistry};

/// Shared application state handed to every worker.
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub queues: QueueRegistry,
}

impl AppState {
    pub fn new(ideas: Arc<dyn IdeaStore>, profiles: Arc<dyn ProfileStore>, max_queue_size: usize) -> Self {
        AppState {
            profiles,
            queues: QueueRegistry::new(ideas, max_queue_size),
        }
    }
}
