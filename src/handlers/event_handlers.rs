use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api_structs::CreatedResponse;
use crate::auth::session::AuthContext;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::event::{self, EventInput};

/// GET /api/events - Published events, soonest first.
pub async fn published(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let events = event::find_published(&pool).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// GET /api/admin/events
pub async fn list(pool: web::Data<PgPool>, auth: AuthContext) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let events = event::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// GET /api/admin/events/{id}
pub async fn read(
    pool: web::Data<PgPool>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let found = event::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

/// POST /api/admin/events
pub async fn create(
    pool: web::Data<PgPool>,
    auth: AuthContext,
    body: web::Json<EventInput>,
) -> Result<HttpResponse, AppError> {
    let grant = auth.require_admin()?;

    let errors = validate::validate_event(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let id = event::create(&pool, &body).await?;
    log::info!("Event {id} created by {}", grant.user_id());
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// PUT /api/admin/events/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<EventInput>,
) -> Result<HttpResponse, AppError> {
    let grant = auth.require_admin()?;
    let id = path.into_inner();

    let errors = validate::validate_event(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if !event::update(&pool, id, &body).await? {
        return Err(AppError::NotFound);
    }
    log::info!("Event {id} updated by {}", grant.user_id());

    let updated = event::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}
