use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::AppError;
use crate::moderation::store::StoreError;
use super::types::*;

/// Columns shared by every idea query. Author columns come from a LEFT JOIN,
/// so `has_author` tells a missing profile apart from one with empty fields.
const IDEA_SELECT: &str = "SELECT i.id, i.user_id, i.title, i.problem_statement, i.solution, \
            i.market_opportunity, i.team_description, i.category, i.tags, i.status, \
            i.is_featured, i.whatsapp_group_url, i.created_at, i.updated_at, \
            p.id IS NOT NULL AS has_author, \
            p.full_name AS author_full_name, \
            p.email AS author_email \
     FROM ideas i \
     LEFT JOIN profiles p ON p.id = i.user_id";

#[derive(sqlx::FromRow)]
struct IdeaRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    problem_statement: Option<String>,
    solution: Option<String>,
    market_opportunity: Option<String>,
    team_description: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    status: String,
    is_featured: bool,
    whatsapp_group_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    has_author: bool,
    author_full_name: Option<String>,
    author_email: Option<String>,
}

impl IdeaRow {
    fn into_idea(self, idea_files: Vec<IdeaFile>) -> Result<Idea, StoreError> {
        let status = self
            .status
            .parse::<IdeaStatus>()
            .map_err(|e| StoreError::Malformed(format!("idea {}: {e}", self.id)))?;
        let author = self.has_author.then(|| Author {
            full_name: self.author_full_name,
            email: self.author_email,
        });
        Ok(Idea {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            problem_statement: self.problem_statement,
            solution: self.solution,
            market_opportunity: self.market_opportunity,
            team_description: self.team_description,
            category: self.category,
            tags: self.tags,
            status,
            is_featured: self.is_featured,
            whatsapp_group_url: self.whatsapp_group_url,
            author,
            idea_files,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    title: String,
    category: Option<String>,
    status: String,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl SummaryRow {
    fn into_summary(self) -> Result<IdeaSummary, StoreError> {
        let status = self
            .status
            .parse::<IdeaStatus>()
            .map_err(|e| StoreError::Malformed(format!("idea {}: {e}", self.id)))?;
        Ok(IdeaSummary {
            id: self.id,
            title: self.title,
            category: self.category,
            status,
            is_featured: self.is_featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Load the files of the given ideas and attach them, keeping row order.
async fn with_files(pool: &PgPool, rows: Vec<IdeaRow>) -> Result<Vec<Idea>, StoreError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let files = sqlx::query_as::<_, IdeaFile>(
        "SELECT id, idea_id, file_name, file_type, file_size, file_url, created_at \
         FROM idea_files \
         WHERE idea_id = ANY($1) \
         ORDER BY created_at ASC",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_idea: HashMap<Uuid, Vec<IdeaFile>> = HashMap::new();
    for file in files {
        by_idea.entry(file.idea_id).or_default().push(file);
    }

    rows.into_iter()
        .map(|row| {
            let files = by_idea.remove(&row.id).unwrap_or_default();
            row.into_idea(files)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// Fetch ideas awaiting review, newest first.
pub async fn fetch_submitted(pool: &PgPool, limit: usize) -> Result<Vec<Idea>, StoreError> {
    let sql = format!(
        "{IDEA_SELECT} WHERE i.status = 'submitted' ORDER BY i.created_at DESC LIMIT $1"
    );
    let rows = sqlx::query_as::<_, IdeaRow>(&sql)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await?;
    with_files(pool, rows).await
}

/// Apply a moderator update. Status changes only touch ideas still in
/// `submitted`, so a moderated idea is never moved again.
pub async fn apply_patch(pool: &PgPool, id: Uuid, patch: IdeaPatch) -> Result<(), StoreError> {
    let result = match patch {
        IdeaPatch::Status(status) => {
            sqlx::query(
                "UPDATE ideas SET status = $1, updated_at = now() \
                 WHERE id = $2 AND status = 'submitted'",
            )
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?
        }
        IdeaPatch::Featured(featured) => {
            sqlx::query("UPDATE ideas SET is_featured = $1, updated_at = now() WHERE id = $2")
                .bind(featured)
                .bind(id)
                .execute(pool)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return Err(StoreError::NoMatch(id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public showcase
// ---------------------------------------------------------------------------

/// Approved and featured ideas for the landing page.
pub async fn find_featured_approved(pool: &PgPool, limit: i64) -> Result<Vec<Idea>, AppError> {
    let sql = format!(
        "{IDEA_SELECT} WHERE i.status = 'approved' AND i.is_featured = TRUE \
         ORDER BY i.created_at DESC LIMIT $1"
    );
    let rows = sqlx::query_as::<_, IdeaRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(with_files(pool, rows).await?)
}

/// Find a single idea by id, regardless of status.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Idea>, AppError> {
    let sql = format!("{IDEA_SELECT} WHERE i.id = $1");
    let row = sqlx::query_as::<_, IdeaRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(with_files(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Author dashboard
// ---------------------------------------------------------------------------

pub async fn find_for_author(pool: &PgPool, user_id: Uuid) -> Result<Vec<IdeaSummary>, AppError> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        "SELECT id, title, category, status, is_featured, created_at, updated_at \
         FROM ideas WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    let items = rows
        .into_iter()
        .map(SummaryRow::into_summary)
        .collect::<Result<Vec<_>, StoreError>>()?;
    Ok(items)
}

/// Insert a new draft owned by `user_id`. Returns the new idea id.
pub async fn create_draft(pool: &PgPool, user_id: Uuid, input: &IdeaInput) -> Result<Uuid, AppError> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO ideas (user_id, title, problem_statement, solution, market_opportunity, \
                            team_description, category, tags, status, whatsapp_group_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft', $9) \
         RETURNING id",
    )
    .bind(user_id)
    .bind(input.title.trim())
    .bind(none_if_empty(&input.problem_statement))
    .bind(none_if_empty(&input.solution))
    .bind(none_if_empty(&input.market_opportunity))
    .bind(none_if_empty(&input.team_description))
    .bind(none_if_empty(&input.category))
    .bind(parse_tags(&input.tags))
    .bind(none_if_empty(&input.whatsapp_group_url))
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Update an idea owned by `user_id` while it is still a draft or submitted.
/// Returns false when no such idea exists.
pub async fn update_by_author(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: &IdeaInput,
    status: IdeaStatus,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE ideas SET title = $1, problem_statement = $2, solution = $3, \
                market_opportunity = $4, team_description = $5, category = $6, tags = $7, \
                status = $8, whatsapp_group_url = $9, updated_at = now() \
         WHERE id = $10 AND user_id = $11 AND status IN ('draft', 'submitted')",
    )
    .bind(input.title.trim())
    .bind(none_if_empty(&input.problem_statement))
    .bind(none_if_empty(&input.solution))
    .bind(none_if_empty(&input.market_opportunity))
    .bind(none_if_empty(&input.team_description))
    .bind(none_if_empty(&input.category))
    .bind(parse_tags(&input.tags))
    .bind(status.as_str())
    .bind(none_if_empty(&input.whatsapp_group_url))
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete one attachment of an idea owned by `user_id`.
pub async fn delete_file_for_author(
    pool: &PgPool,
    idea_id: Uuid,
    file_id: Uuid,
    user_id: Uuid,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "DELETE FROM idea_files f \
         USING ideas i \
         WHERE f.id = $1 AND f.idea_id = $2 AND i.id = f.idea_id AND i.user_id = $3",
    )
    .bind(file_id)
    .bind(idea_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_row(status: &str) -> SummaryRow {
        SummaryRow {
            id: Uuid::new_v4(),
            title: "Campus Bike Share".to_string(),
            category: None,
            status: status.to_string(),
            is_featured: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn summary_status_is_decoded() {
        let summary = summary_row("submitted").into_summary().expect("valid row");
        assert_eq!(summary.status, IdeaStatus::Submitted);
    }

    #[test]
    fn summary_with_unknown_status_is_malformed() {
        let err = summary_row("archived").into_summary().unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
