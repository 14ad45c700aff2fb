use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api_structs::{ModerationActionResponse, QueueResponse};
use crate::auth::session::AuthContext;
use crate::errors::AppError;
use crate::moderation::{CategoryFilter, FeaturedFilter, IdeaFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    #[serde(default)]
    pub featured: FeaturedFilter,
    /// Force a fresh fetch of the working set.
    #[serde(default)]
    pub reload: bool,
}

impl QueueQuery {
    fn to_filter(&self) -> IdeaFilter {
        IdeaFilter::new(
            self.q.clone(),
            CategoryFilter::parse(self.category.as_deref()),
            self.featured,
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Approve,
    Reject,
    Feature,
    Unfeature,
}

impl Action {
    fn past_tense(self) -> &'static str {
        match self {
            Action::Approve => "approved",
            Action::Reject => "rejected",
            Action::Feature => "featured",
            Action::Unfeature => "unfeatured",
        }
    }
}

/// GET /api/admin/moderation
/// Filtered view of the caller's queue. Loads the working set on first use
/// or when `reload=true`.
pub async fn queue(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<QueueQuery>,
) -> Result<HttpResponse, AppError> {
    let grant = auth.require_admin()?;
    let queue = state.queues.queue_for(&grant);

    if query.reload || !queue.is_loaded() {
        queue.reload(&grant).await?;
    }

    let view = queue.view(&query.to_filter());
    Ok(HttpResponse::Ok().json(QueueResponse::from(view)))
}

async fn moderate(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
    action: Action,
) -> Result<HttpResponse, AppError> {
    let grant = auth.require_admin()?;
    let queue = state.queues.queue_for(&grant);

    match action {
        Action::Approve => queue.approve(&grant, id).await?,
        Action::Reject => queue.reject(&grant, id).await?,
        Action::Feature => queue.feature(&grant, id).await?,
        Action::Unfeature => queue.unfeature(&grant, id).await?,
    }

    Ok(HttpResponse::Ok().json(ModerationActionResponse {
        id,
        action: action.past_tense(),
        remaining: queue.ideas().len(),
    }))
}

/// POST /api/admin/moderation/{id}/approve
pub async fn approve(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    moderate(&state, &auth, path.into_inner(), Action::Approve).await
}

/// POST /api/admin/moderation/{id}/reject
pub async fn reject(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    moderate(&state, &auth, path.into_inner(), Action::Reject).await
}

/// POST /api/admin/moderation/{id}/feature
pub async fn feature(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    moderate(&state, &auth, path.into_inner(), Action::Feature).await
}

/// POST /api/admin/moderation/{id}/unfeature
pub async fn unfeature(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    moderate(&state, &auth, path.into_inner(), Action::Unfeature).await
}
