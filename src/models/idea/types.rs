use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::session::AuthContext;

/// Category labels offered on the idea form.
pub const CATEGORIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Education",
    "Finance",
    "Sustainability",
    "E-commerce",
    "Social Impact",
    "Food & Agriculture",
    "Transportation",
    "Entertainment",
    "Real Estate",
    "Energy",
];

/// Lifecycle status of an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Draft => "draft",
            IdeaStatus::Submitted => "submitted",
            IdeaStatus::Approved => "approved",
            IdeaStatus::Rejected => "rejected",
        }
    }

    /// Author-editable states. Once moderated, the author can no longer move it.
    pub fn is_author_editable(&self) -> bool {
        matches!(self, IdeaStatus::Draft | IdeaStatus::Submitted)
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(IdeaStatus::Draft),
            "submitted" => Ok(IdeaStatus::Submitted),
            "approved" => Ok(IdeaStatus::Approved),
            "rejected" => Ok(IdeaStatus::Rejected),
            other => Err(format!("unknown idea status '{other}'")),
        }
    }
}

/// Read-only projection of the author's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl Author {
    /// Name shown next to an idea: full name, then email, then "Unknown".
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.email.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown")
    }
}

/// An uploaded attachment. Bytes live in the object store; only metadata here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IdeaFile {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub file_name: String,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

/// A startup idea together with its author projection and attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub problem_statement: Option<String>,
    pub solution: Option<String>,
    pub market_opportunity: Option<String>,
    pub team_description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: IdeaStatus,
    pub is_featured: bool,
    pub whatsapp_group_url: Option<String>,
    pub author: Option<Author>,
    #[serde(default)]
    pub idea_files: Vec<IdeaFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Idea {
    /// Approved ideas are public; anything else is visible only to its author
    /// and to admins.
    pub fn is_visible_to(&self, viewer: Option<&AuthContext>) -> bool {
        if self.status == IdeaStatus::Approved {
            return true;
        }
        match viewer {
            Some(ctx) => ctx.user_id == self.user_id || ctx.is_admin(),
            None => false,
        }
    }
}

/// Single-field update applied by a moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaPatch {
    Status(IdeaStatus),
    Featured(bool),
}

/// Author-supplied fields for creating or editing an idea.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaInput {
    pub title: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub market_opportunity: String,
    #[serde(default)]
    pub team_description: String,
    #[serde(default)]
    pub category: String,
    /// Comma-separated tag list as typed in the form.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub whatsapp_group_url: String,
}

/// Edit request: the fields plus whether to submit for review.
#[derive(Debug, Clone, Deserialize)]
pub struct IdeaUpdate {
    #[serde(flatten)]
    pub input: IdeaInput,
    #[serde(default)]
    pub submit: bool,
}

/// Compact row for the author's dashboard list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaSummary {
    pub id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub status: IdeaStatus,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Split a comma-separated tag string, trimming and dropping empty entries.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Empty strings become NULL in the store.
pub fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::Role;

    fn idea_with_status(status: IdeaStatus, owner: Uuid) -> Idea {
        Idea {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Campus Compost".into(),
            problem_statement: None,
            solution: None,
            market_opportunity: None,
            team_description: None,
            category: Some("Sustainability".into()),
            tags: None,
            status,
            is_featured: false,
            whatsapp_group_url: None,
            author: None,
            idea_files: vec![],
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn approved_ideas_are_public() {
        let idea = idea_with_status(IdeaStatus::Approved, Uuid::new_v4());
        assert!(idea.is_visible_to(None));
    }

    #[test]
    fn unapproved_ideas_need_owner_or_admin() {
        let owner = Uuid::new_v4();
        let idea = idea_with_status(IdeaStatus::Submitted, owner);

        let author = AuthContext { user_id: owner, role: Role::Member };
        let stranger = AuthContext { user_id: Uuid::new_v4(), role: Role::Member };
        let admin = AuthContext { user_id: Uuid::new_v4(), role: Role::Admin };

        assert!(!idea.is_visible_to(None));
        assert!(idea.is_visible_to(Some(&author)));
        assert!(!idea.is_visible_to(Some(&stranger)));
        assert!(idea.is_visible_to(Some(&admin)));
    }

    #[test]
    fn status_parses_known_values() {
        assert_eq!("submitted".parse::<IdeaStatus>(), Ok(IdeaStatus::Submitted));
        assert_eq!("approved".parse::<IdeaStatus>(), Ok(IdeaStatus::Approved));
        assert!("pending".parse::<IdeaStatus>().is_err());
    }

    #[test]
    fn only_draft_and_submitted_are_author_editable() {
        assert!(IdeaStatus::Draft.is_author_editable());
        assert!(IdeaStatus::Submitted.is_author_editable());
        assert!(!IdeaStatus::Approved.is_author_editable());
        assert!(!IdeaStatus::Rejected.is_author_editable());
    }

    #[test]
    fn parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags(" ai, ,fintech ,, edu "), vec!["ai", "fintech", "edu"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn author_display_name_falls_back() {
        let full = Author { full_name: Some("Asha Rao".into()), email: Some("asha@uni.edu".into()) };
        assert_eq!(full.display_name(), "Asha Rao");

        let email_only = Author { full_name: Some(String::new()), email: Some("asha@uni.edu".into()) };
        assert_eq!(email_only.display_name(), "asha@uni.edu");

        let nothing = Author { full_name: None, email: None };
        assert_eq!(nothing.display_name(), "Unknown");
    }

    #[test]
    fn none_if_empty_trims() {
        assert_eq!(none_if_empty("   "), None);
        assert_eq!(none_if_empty(" Energy "), Some("Energy".to_string()));
    }
}
