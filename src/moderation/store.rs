use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

use crate::models::idea::{self, Idea, IdeaPatch};
use crate::models::profile::{self, Profile};

/// Failure reported by the relational store, in Postgres terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreFailure {
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The database refused the statement (constraint, permission, syntax).
    Rejected(StoreFailure),
    /// An update matched no row.
    NoMatch(Uuid),
    /// A row could not be decoded into the expected shape.
    Malformed(String),
    /// Connection, pool or transport failure.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Rejected(failure) => match &failure.code {
                Some(code) => write!(f, "Store rejected request [{code}]: {}", failure.message),
                None => write!(f, "Store rejected request: {}", failure.message),
            },
            StoreError::NoMatch(id) => write!(f, "No idea matched {id}"),
            StoreError::Malformed(e) => write!(f, "Malformed store response: {e}"),
            StoreError::Unavailable(e) => write!(f, "Store unavailable: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => {
                let (details, hint) = match db.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
                    Some(pg) => (pg.detail().map(String::from), pg.hint().map(String::from)),
                    None => (None, None),
                };
                StoreError::Rejected(StoreFailure {
                    message: db.message().to_string(),
                    code: db.code().map(|c| c.into_owned()),
                    details,
                    hint,
                })
            }
            decode @ (sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::TypeNotFound { .. }) => StoreError::Malformed(decode.to_string()),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// The idea operations the moderation queue depends on.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    /// All `submitted` ideas with author and files, newest first, at most `limit`.
    async fn fetch_submitted(&self, limit: usize) -> Result<Vec<Idea>, StoreError>;

    /// Apply a single-field update to one idea.
    async fn update_idea(&self, id: Uuid, patch: IdeaPatch) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl IdeaStore for PgStore {
    async fn fetch_submitted(&self, limit: usize) -> Result<Vec<Idea>, StoreError> {
        idea::fetch_submitted(&self.pool, limit).await
    }

    async fn update_idea(&self, id: Uuid, patch: IdeaPatch) -> Result<(), StoreError> {
        idea::apply_patch(&self.pool, id, patch).await
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        profile::find_by_id(&self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_are_malformed() {
        let err: StoreError = sqlx::Error::ColumnNotFound("status".into()).into();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn pool_errors_are_unavailable() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn rejected_display_includes_code() {
        let err = StoreError::Rejected(StoreFailure {
            message: "permission denied for table ideas".into(),
            code: Some("42501".into()),
            details: None,
            hint: None,
        });
        assert_eq!(
            err.to_string(),
            "Store rejected request [42501]: permission denied for table ideas"
        );
    }
}
