use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::session::AuthContext;
use crate::errors::AppError;
use crate::models::dashboard;

/// GET /api/stats - Landing page counters.
pub async fn public_stats(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let stats = dashboard::public_stats(&pool).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/admin/stats - Platform overview for admins.
pub async fn admin_stats(pool: web::Data<PgPool>, auth: AuthContext) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;
    let stats = dashboard::admin_stats(&pool).await?;
    Ok(HttpResponse::Ok().json(stats))
}
