//! Shared test infrastructure for moderation tests.
//!
//! `MemoryStore` stands in for Postgres behind the `IdeaStore` and
//! `ProfileStore` traits. Failures can be injected, and updates can be held
//! at a gate to observe in-flight behaviour.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use ideahub::auth::session::{AdminGrant, AuthContext, Role};
use ideahub::models::idea::{Author, Idea, IdeaPatch, IdeaStatus};
use ideahub::models::profile::Profile;
use ideahub::moderation::{IdeaStore, ProfileStore, StoreError, StoreFailure};

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    ideas: Mutex<Vec<Idea>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    fetch_failure: Mutex<Option<StoreError>>,
    update_failure: Mutex<Option<StoreError>>,
    gate: Mutex<Option<Arc<Notify>>>,
    entered: Notify,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
    fetch_entered: Notify,
    updates: Mutex<Vec<(Uuid, IdeaPatch)>>,
    fetch_limits: Mutex<Vec<usize>>,
}

impl MemoryStore {
    pub fn with_ideas(ideas: Vec<Idea>) -> Arc<Self> {
        let store = MemoryStore::default();
        *store.ideas.lock().unwrap() = ideas;
        Arc::new(store)
    }

    pub fn add_profile(&self, id: Uuid, role: &str) {
        self.profiles.lock().unwrap().insert(
            id,
            Profile {
                id,
                full_name: Some("Test User".to_string()),
                email: Some("test@example.com".to_string()),
                role: role.to_string(),
            },
        );
    }

    pub fn fail_fetch(&self, error: Option<StoreError>) {
        *self.fetch_failure.lock().unwrap() = error;
    }

    pub fn fail_updates(&self, error: Option<StoreError>) {
        *self.update_failure.lock().unwrap() = error;
    }

    /// Hold every update until the returned notifier fires.
    pub fn hold_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold every fetch after its snapshot is taken until the returned
    /// notifier fires.
    pub fn hold_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Resolves once a held fetch has taken its snapshot.
    pub async fn fetch_started(&self) {
        self.fetch_entered.notified().await;
    }

    /// Resolves once an update has reached the store.
    pub async fn update_started(&self) {
        self.entered.notified().await;
    }

    pub fn updates(&self) -> Vec<(Uuid, IdeaPatch)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn fetch_limits(&self) -> Vec<usize> {
        self.fetch_limits.lock().unwrap().clone()
    }

    pub fn stored(&self, id: Uuid) -> Option<Idea> {
        self.ideas.lock().unwrap().iter().find(|i| i.id == id).cloned()
    }

    pub fn insert(&self, idea: Idea) {
        self.ideas.lock().unwrap().push(idea);
    }
}

#[async_trait]
impl IdeaStore for MemoryStore {
    async fn fetch_submitted(&self, limit: usize) -> Result<Vec<Idea>, StoreError> {
        self.fetch_limits.lock().unwrap().push(limit);
        if let Some(e) = self.fetch_failure.lock().unwrap().clone() {
            return Err(e);
        }

        let mut ideas: Vec<Idea> = self
            .ideas
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.status == IdeaStatus::Submitted)
            .cloned()
            .collect();
        ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ideas.truncate(limit);

        let gate = self.fetch_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.fetch_entered.notify_one();
            gate.notified().await;
        }
        Ok(ideas)
    }

    async fn update_idea(&self, id: Uuid, patch: IdeaPatch) -> Result<(), StoreError> {
        self.updates.lock().unwrap().push((id, patch));
        self.entered.notify_one();

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(e) = self.update_failure.lock().unwrap().clone() {
            return Err(e);
        }

        let mut ideas = self.ideas.lock().unwrap();
        let idea = ideas.iter_mut().find(|i| i.id == id).ok_or(StoreError::NoMatch(id))?;
        match patch {
            IdeaPatch::Status(status) => {
                if idea.status != IdeaStatus::Submitted {
                    return Err(StoreError::NoMatch(id));
                }
                idea.status = status;
            }
            IdeaPatch::Featured(featured) => idea.is_featured = featured,
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.lock().unwrap().get(&id).cloned())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A submitted idea created `age_minutes` before a fixed instant.
pub fn submitted_idea(title: &str, category: Option<&str>, featured: bool, age_minutes: i64) -> Idea {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    Idea {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: title.to_string(),
        problem_statement: Some(format!("Problem behind {title}")),
        solution: Some(format!("Solution for {title}")),
        market_opportunity: None,
        team_description: None,
        category: category.map(String::from),
        tags: None,
        status: IdeaStatus::Submitted,
        is_featured: featured,
        whatsapp_group_url: None,
        author: Some(Author {
            full_name: Some("Ada Student".to_string()),
            email: Some("ada@example.com".to_string()),
        }),
        idea_files: Vec::new(),
        created_at: base - Duration::minutes(age_minutes),
        updated_at: None,
    }
}

pub fn rejected_failure() -> StoreError {
    StoreError::Rejected(StoreFailure {
        message: "permission denied for table ideas".to_string(),
        code: Some("42501".to_string()),
        details: None,
        hint: Some("Check row level security".to_string()),
    })
}

pub fn admin_context() -> AuthContext {
    AuthContext { user_id: Uuid::new_v4(), role: Role::Admin }
}

pub fn member_context() -> AuthContext {
    AuthContext { user_id: Uuid::new_v4(), role: Role::Member }
}

pub fn admin_grant() -> AdminGrant {
    admin_context().require_admin().expect("admin grant")
}
