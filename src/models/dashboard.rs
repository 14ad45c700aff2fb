use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

/// Counts for the admin overview.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminStats {
    pub total_ideas: i64,
    pub approved_ideas: i64,
    pub pending_ideas: i64,
    pub featured_ideas: i64,
    pub total_users: i64,
    pub contact_requests: i64,
    /// Percentage of all ideas that are approved; absent when there are none.
    pub approval_rate: Option<f64>,
}

/// Counts shown on the public landing page.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct PublicStats {
    pub ideas: i64,
    pub users: i64,
}

/// Approved share of all ideas as a percentage rounded to one decimal.
pub fn approval_rate(approved: i64, total: i64) -> Option<f64> {
    if total <= 0 {
        return None;
    }
    let rate = approved as f64 / total as f64 * 100.0;
    Some((rate * 10.0).round() / 10.0)
}

#[derive(sqlx::FromRow)]
struct IdeaCounts {
    total_ideas: i64,
    approved_ideas: i64,
    pending_ideas: i64,
    featured_ideas: i64,
}

pub async fn admin_stats(pool: &PgPool) -> Result<AdminStats, AppError> {
    let counts = sqlx::query_as::<_, IdeaCounts>(
        "SELECT COUNT(*) AS total_ideas, \
                COUNT(*) FILTER (WHERE status = 'approved') AS approved_ideas, \
                COUNT(*) FILTER (WHERE status = 'submitted') AS pending_ideas, \
                COUNT(*) FILTER (WHERE is_featured) AS featured_ideas \
         FROM ideas",
    )
    .fetch_one(pool)
    .await?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await?;
    let contact_requests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_requests")
        .fetch_one(pool)
        .await?;

    Ok(AdminStats {
        approval_rate: approval_rate(counts.approved_ideas, counts.total_ideas),
        total_ideas: counts.total_ideas,
        approved_ideas: counts.approved_ideas,
        pending_ideas: counts.pending_ideas,
        featured_ideas: counts.featured_ideas,
        total_users,
        contact_requests,
    })
}

pub async fn public_stats(pool: &PgPool) -> Result<PublicStats, AppError> {
    let stats = sqlx::query_as::<_, PublicStats>(
        "SELECT (SELECT COUNT(*) FROM ideas WHERE status = 'approved') AS ideas, \
                (SELECT COUNT(*) FROM profiles) AS users",
    )
    .fetch_one(pool)
    .await?;
    Ok(stats)
}
