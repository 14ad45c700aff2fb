use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::auth::session::AdminGrant;
use super::queue::ModerationQueue;
use super::store::IdeaStore;

/// Moderation queues keyed by the moderator that owns them.
///
/// Queues are never evicted, so memory is bounded by the number of admins
/// times `max_size` ideas.
pub struct QueueRegistry {
    store: Arc<dyn IdeaStore>,
    max_size: usize,
    queues: Mutex<HashMap<Uuid, Arc<ModerationQueue>>>,
}

impl QueueRegistry {
    pub fn new(store: Arc<dyn IdeaStore>, max_size: usize) -> Self {
        QueueRegistry {
            store,
            max_size,
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// The caller's queue, created empty (not yet loaded) on first use.
    pub fn queue_for(&self, grant: &AdminGrant) -> Arc<ModerationQueue> {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        queues
            .entry(grant.user_id())
            .or_insert_with(|| Arc::new(ModerationQueue::new(self.store.clone(), self.max_size)))
            .clone()
    }
}
