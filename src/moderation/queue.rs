use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::auth::session::AdminGrant;
use crate::models::idea::{Idea, IdeaPatch, IdeaStatus};
use super::filter::{self, IdeaFilter};
use super::store::{IdeaStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum ModerationError {
    /// Another action on the same idea is still awaiting the store.
    InFlight(Uuid),
    /// The idea is not in the working set (already moderated or never loaded).
    NotQueued(Uuid),
    Store(StoreError),
}

impl fmt::Display for ModerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModerationError::InFlight(id) => write!(f, "An action on idea {id} is already in progress"),
            ModerationError::NotQueued(id) => write!(f, "Idea {id} is not in the moderation queue"),
            ModerationError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ModerationError {}

impl From<StoreError> for ModerationError {
    fn from(e: StoreError) -> Self {
        ModerationError::Store(e)
    }
}

/// Filtered projection of the working set.
#[derive(Debug, Clone)]
pub struct QueueView {
    pub ideas: Vec<Idea>,
    pub categories: Vec<String>,
    /// Size of the whole working set before filtering.
    pub total: usize,
}

#[derive(Default)]
struct QueueState {
    ideas: Vec<Idea>,
    in_flight: HashSet<Uuid>,
    loaded: bool,
    /// Reloads whose fetch has not been applied yet.
    reloads: usize,
    /// Updates confirmed while a reload was fetching. Its snapshot may
    /// predate them, so they are replayed onto the fetched rows.
    confirmed: HashMap<Uuid, IdeaPatch>,
}

impl QueueState {
    fn replay_confirmed(&self, ideas: &mut Vec<Idea>) {
        if self.confirmed.is_empty() {
            return;
        }
        ideas.retain(|idea| !matches!(self.confirmed.get(&idea.id), Some(IdeaPatch::Status(_))));
        for idea in ideas.iter_mut() {
            if let Some(IdeaPatch::Featured(featured)) = self.confirmed.get(&idea.id) {
                idea.is_featured = *featured;
            }
        }
    }
}

/// Marks a reload as fetching until it is applied or dropped.
struct ReloadTicket<'a> {
    state: &'a Mutex<QueueState>,
}

impl<'a> ReloadTicket<'a> {
    fn issue(state: &'a Mutex<QueueState>) -> Self {
        lock(state).reloads += 1;
        ReloadTicket { state }
    }
}

impl Drop for ReloadTicket<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        state.reloads = state.reloads.saturating_sub(1);
        if state.reloads == 0 {
            state.confirmed.clear();
        }
    }
}

/// Releases the per-idea claim when the action finishes or is dropped.
struct Claim<'a> {
    state: &'a Mutex<QueueState>,
    id: Uuid,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.id);
    }
}

fn lock(state: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One moderator's working set of submitted ideas.
///
/// Local state only changes after the store confirms an update. The lock is
/// never held across the store round trip.
pub struct ModerationQueue {
    store: Arc<dyn IdeaStore>,
    max_size: usize,
    state: Mutex<QueueState>,
}

impl ModerationQueue {
    pub fn new(store: Arc<dyn IdeaStore>, max_size: usize) -> Self {
        ModerationQueue {
            store,
            max_size,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Replace the working set with a fresh fetch. On failure the working set
    /// is left empty. Updates confirmed while the fetch is outstanding win
    /// over the fetched rows.
    pub async fn reload(&self, grant: &AdminGrant) -> Result<usize, ModerationError> {
        let _ticket = ReloadTicket::issue(&self.state);
        let fetched = self.store.fetch_submitted(self.max_size.saturating_add(1)).await;

        let mut state = lock(&self.state);
        match fetched {
            Ok(mut ideas) => {
                if ideas.len() > self.max_size {
                    log::warn!(
                        "Moderation queue for {} exceeds {} ideas; showing the newest {}",
                        grant.user_id(),
                        self.max_size,
                        self.max_size
                    );
                    ideas.truncate(self.max_size);
                }
                ideas.retain(|idea| idea.status == IdeaStatus::Submitted);
                state.replay_confirmed(&mut ideas);
                log::info!("Loaded {} pending ideas for {}", ideas.len(), grant.user_id());
                state.ideas = ideas;
                state.loaded = true;
                Ok(state.ideas.len())
            }
            Err(e) => {
                log::error!("Failed to load pending ideas for {}: {e}", grant.user_id());
                state.ideas.clear();
                state.loaded = false;
                Err(e.into())
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.state).loaded
    }

    /// Copy of the full working set.
    pub fn ideas(&self) -> Vec<Idea> {
        lock(&self.state).ideas.clone()
    }

    pub fn categories(&self) -> Vec<String> {
        filter::categories(&lock(&self.state).ideas)
    }

    pub fn view(&self, criteria: &IdeaFilter) -> QueueView {
        let state = lock(&self.state);
        QueueView {
            ideas: filter::filter(&state.ideas, criteria).into_iter().cloned().collect(),
            categories: filter::categories(&state.ideas),
            total: state.ideas.len(),
        }
    }

    pub async fn approve(&self, grant: &AdminGrant, id: Uuid) -> Result<(), ModerationError> {
        self.apply(grant, id, IdeaPatch::Status(IdeaStatus::Approved)).await
    }

    pub async fn reject(&self, grant: &AdminGrant, id: Uuid) -> Result<(), ModerationError> {
        self.apply(grant, id, IdeaPatch::Status(IdeaStatus::Rejected)).await
    }

    pub async fn feature(&self, grant: &AdminGrant, id: Uuid) -> Result<(), ModerationError> {
        self.apply(grant, id, IdeaPatch::Featured(true)).await
    }

    pub async fn unfeature(&self, grant: &AdminGrant, id: Uuid) -> Result<(), ModerationError> {
        self.apply(grant, id, IdeaPatch::Featured(false)).await
    }

    async fn apply(&self, grant: &AdminGrant, id: Uuid, patch: IdeaPatch) -> Result<(), ModerationError> {
        let _claim = self.claim(id)?;

        if let Err(e) = self.store.update_idea(id, patch).await {
            log::warn!("Moderation update {patch:?} on {id} by {} failed: {e}", grant.user_id());
            return Err(e.into());
        }

        let mut state = lock(&self.state);
        if state.reloads > 0 {
            state.confirmed.insert(id, patch);
        }
        match patch {
            IdeaPatch::Status(_) => state.ideas.retain(|idea| idea.id != id),
            IdeaPatch::Featured(featured) => {
                if let Some(idea) = state.ideas.iter_mut().find(|idea| idea.id == id) {
                    idea.is_featured = featured;
                }
            }
        }
        log::info!("Moderation update {patch:?} on {id} by {}", grant.user_id());
        Ok(())
    }

    fn claim(&self, id: Uuid) -> Result<Claim<'_>, ModerationError> {
        let mut state = lock(&self.state);
        if !state.ideas.iter().any(|idea| idea.id == id) {
            return Err(ModerationError::NotQueued(id));
        }
        if !state.in_flight.insert(id) {
            return Err(ModerationError::InFlight(id));
        }
        Ok(Claim { state: &self.state, id })
    }
}
