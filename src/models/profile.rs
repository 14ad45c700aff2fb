use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::moderation::store::StoreError;

/// A user profile as maintained by the identity layer.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: String,
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, StoreError> {
    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, full_name, email, role FROM profiles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}
