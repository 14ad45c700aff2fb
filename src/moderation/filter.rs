use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::idea::Idea;

/// Category facet. `"all"` on the wire means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parse a query value; missing, empty and `"all"` all mean `All`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => CategoryFilter::All,
            Some(label) => CategoryFilter::Named(label.to_string()),
        }
    }
}

/// Featured facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedFilter {
    #[default]
    All,
    Featured,
    Standard,
}

impl FeaturedFilter {
    fn matches(self, is_featured: bool) -> bool {
        match self {
            FeaturedFilter::All => true,
            FeaturedFilter::Featured => is_featured,
            FeaturedFilter::Standard => !is_featured,
        }
    }
}

/// Search term plus the two facets applied to the moderation queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaFilter {
    pub search: String,
    pub category: CategoryFilter,
    pub featured: FeaturedFilter,
}

impl IdeaFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter, featured: FeaturedFilter) -> Self {
        IdeaFilter {
            search: search.into(),
            category,
            featured,
        }
    }
}

/// True when any searchable field contains `needle`. `needle` must already be
/// trimmed and lower-cased. Missing fields are skipped.
fn matches_search(idea: &Idea, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let author = idea.author.as_ref();
    let joined_tags = idea.tags.as_ref().map(|tags| tags.join(" "));

    [
        Some(idea.title.as_str()),
        idea.problem_statement.as_deref(),
        idea.solution.as_deref(),
        author.and_then(|a| a.full_name.as_deref()),
        author.and_then(|a| a.email.as_deref()),
        idea.category.as_deref(),
        joined_tags.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

fn matches_category(idea: &Idea, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Named(wanted) => {
            idea.category.as_deref().unwrap_or("").to_lowercase() == wanted.to_lowercase()
        }
    }
}

/// Ideas matching all three predicates, in working-set order.
pub fn filter<'a>(ideas: &'a [Idea], criteria: &IdeaFilter) -> Vec<&'a Idea> {
    let needle = criteria.search.trim().to_lowercase();

    ideas
        .iter()
        .filter(|idea| {
            matches_search(idea, &needle)
                && matches_category(idea, &criteria.category)
                && criteria.featured.matches(idea.is_featured)
        })
        .collect()
}

/// Distinct non-empty categories, case-sensitive, sorted ascending.
pub fn categories(ideas: &[Idea]) -> Vec<String> {
    ideas
        .iter()
        .filter_map(|idea| idea.category.as_deref())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
