use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::idea::{Author, Idea, IdeaFile, IdeaStatus};
use crate::moderation::preview::{PreviewKind, format_size_kb};
use crate::moderation::QueueView;

/// Error response body. Store failures carry the Postgres code/details/hint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ApiErrorResponse {
            error: error.into(),
            details: None,
            code: None,
            hint: None,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ApiIdeaFile {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub size_label: String,
    pub file_url: String,
    pub preview: PreviewKind,
}

impl From<IdeaFile> for ApiIdeaFile {
    fn from(f: IdeaFile) -> Self {
        ApiIdeaFile {
            preview: PreviewKind::of(&f),
            size_label: format_size_kb(f.file_size),
            id: f.id,
            file_name: f.file_name,
            file_type: f.file_type,
            file_size: f.file_size,
            file_url: f.file_url,
        }
    }
}

/// Idea as returned by the API, with attachment previews resolved.
#[derive(Serialize, Debug, Clone)]
pub struct ApiIdea {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub problem_statement: Option<String>,
    pub solution: Option<String>,
    pub market_opportunity: Option<String>,
    pub team_description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub status: IdeaStatus,
    pub is_featured: bool,
    pub whatsapp_group_url: Option<String>,
    pub author: Option<Author>,
    pub author_name: String,
    pub files: Vec<ApiIdeaFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Idea> for ApiIdea {
    fn from(idea: Idea) -> Self {
        let author_name = idea
            .author
            .as_ref()
            .map(|a| a.display_name().to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        ApiIdea {
            id: idea.id,
            user_id: idea.user_id,
            title: idea.title,
            problem_statement: idea.problem_statement,
            solution: idea.solution,
            market_opportunity: idea.market_opportunity,
            team_description: idea.team_description,
            category: idea.category,
            tags: idea.tags.unwrap_or_default(),
            status: idea.status,
            is_featured: idea.is_featured,
            whatsapp_group_url: idea.whatsapp_group_url,
            author: idea.author,
            author_name,
            files: idea.idea_files.into_iter().map(ApiIdeaFile::from).collect(),
            created_at: idea.created_at,
            updated_at: idea.updated_at,
        }
    }
}

/// Filtered moderation queue.
#[derive(Serialize, Debug, Clone)]
pub struct QueueResponse {
    pub ideas: Vec<ApiIdea>,
    pub categories: Vec<String>,
    /// Ideas in the working set before filtering.
    pub total: usize,
    /// Ideas left after filtering.
    pub shown: usize,
}

impl From<QueueView> for QueueResponse {
    fn from(view: QueueView) -> Self {
        QueueResponse {
            shown: view.ideas.len(),
            ideas: view.ideas.into_iter().map(ApiIdea::from).collect(),
            categories: view.categories,
            total: view.total,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ModerationActionResponse {
    pub id: Uuid,
    pub action: &'static str,
    /// Ideas still pending in the caller's working set.
    pub remaining: usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreatedResponse {
    pub id: Uuid,
}
