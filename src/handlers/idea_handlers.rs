use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api_structs::{ApiIdea, CreatedResponse};
use crate::auth::session::AuthContext;
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::idea::{self, Idea, IdeaInput, IdeaStatus, IdeaUpdate};

const FEATURED_LIMIT: i64 = 6;

/// GET /api/ideas/featured
pub async fn featured(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let ideas = idea::find_featured_approved(&pool, FEATURED_LIMIT).await?;
    let items: Vec<ApiIdea> = ideas.into_iter().map(ApiIdea::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/ideas/{id}
/// Approved ideas are public; others only for the author or an admin.
/// Hidden ideas answer 404 so their existence is not leaked.
pub async fn detail(
    pool: web::Data<PgPool>,
    auth: Option<AuthContext>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let found = idea::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;

    if !found.is_visible_to(auth.as_ref()) {
        log::debug!("Idea {id} ({}) hidden from viewer", found.status);
        return Err(AppError::NotFound);
    }

    Ok(HttpResponse::Ok().json(ApiIdea::from(found)))
}

/// GET /api/me/ideas
pub async fn my_ideas(pool: web::Data<PgPool>, auth: AuthContext) -> Result<HttpResponse, AppError> {
    let items = idea::find_for_author(&pool, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/me/ideas
/// Creates a draft owned by the caller.
pub async fn create(
    pool: web::Data<PgPool>,
    auth: AuthContext,
    body: web::Json<IdeaInput>,
) -> Result<HttpResponse, AppError> {
    let errors = validate::validate_idea(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let id = idea::create_draft(&pool, auth.user_id, &body).await?;
    log::info!("Idea {id} drafted by {}", auth.user_id);

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// Ownership is checked before the body so other people's ideas stay hidden.
/// Returns the status the idea moves to.
fn authorize_edit(existing: &Idea, user_id: Uuid, update: &IdeaUpdate) -> Result<IdeaStatus, AppError> {
    if existing.user_id != user_id {
        return Err(AppError::NotFound);
    }
    if !existing.status.is_author_editable() {
        return Err(AppError::Validation(vec![format!(
            "Ideas that are {} can no longer be edited",
            existing.status
        )]));
    }

    let errors = validate::validate_idea(&update.input);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(if update.submit { IdeaStatus::Submitted } else { IdeaStatus::Draft })
}

/// PUT /api/me/ideas/{id}
/// Saves the caller's idea as a draft, or submits it for review.
pub async fn update(
    pool: web::Data<PgPool>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<IdeaUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = idea::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    let status = authorize_edit(&existing, auth.user_id, &body)?;

    if !idea::update_by_author(&pool, id, auth.user_id, &body.input, status).await? {
        return Err(AppError::NotFound);
    }
    log::info!("Idea {id} saved as {status} by {}", auth.user_id);

    let updated = idea::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(ApiIdea::from(updated)))
}

/// DELETE /api/me/ideas/{id}/files/{file_id}
pub async fn delete_file(
    pool: web::Data<PgPool>,
    auth: AuthContext,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (idea_id, file_id) = path.into_inner();

    if !idea::delete_file_for_author(&pool, idea_id, file_id, auth.user_id).await? {
        return Err(AppError::NotFound);
    }
    log::info!("File {file_id} removed from idea {idea_id} by {}", auth.user_id);

    Ok(HttpResponse::NoContent().finish())
}
