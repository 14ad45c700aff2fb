use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::idea::none_if_empty;
use super::types::*;

const EVENT_COLUMNS: &str = "id, title, description, event_date, location, registration_link, \
                             status, is_featured, created_at";

/// Published events, soonest first.
pub async fn find_published(pool: &PgPool) -> Result<Vec<Event>, AppError> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'published' \
         ORDER BY event_date ASC NULLS LAST"
    );
    let events = sqlx::query_as::<_, Event>(&sql).fetch_all(pool).await?;
    Ok(events)
}

/// Every event regardless of status, for the admin list.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Event>, AppError> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY event_date ASC NULLS LAST");
    let events = sqlx::query_as::<_, Event>(&sql).fetch_all(pool).await?;
    Ok(events)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Event>, AppError> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

pub async fn create(pool: &PgPool, input: &EventInput) -> Result<Uuid, AppError> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO events (title, description, event_date, location, registration_link, \
                             status, is_featured) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(input.title.trim())
    .bind(none_if_empty(&input.description))
    .bind(input.event_date)
    .bind(none_if_empty(&input.location))
    .bind(none_if_empty(&input.registration_link))
    .bind(input.status.trim())
    .bind(input.is_featured)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Returns false when the event does not exist.
pub async fn update(pool: &PgPool, id: Uuid, input: &EventInput) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE events SET title = $1, description = $2, event_date = $3, location = $4, \
                registration_link = $5, status = $6, is_featured = $7 \
         WHERE id = $8",
    )
    .bind(input.title.trim())
    .bind(none_if_empty(&input.description))
    .bind(input.event_date)
    .bind(none_if_empty(&input.location))
    .bind(none_if_empty(&input.registration_link))
    .bind(input.status.trim())
    .bind(input.is_featured)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
