use crate::models::event::{EventInput, EventStatus};
use crate::models::idea::{CATEGORIES, IdeaInput};

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional link: empty, or an http(s) URL.
pub fn validate_url(value: &str, field_name: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Some(format!("{field_name} must start with http:// or https://"));
    }
    if trimmed.len() > 2048 {
        return Some(format!("{field_name} must be at most 2048 characters"));
    }
    None
}

/// Validate an optional category against the offered labels.
pub fn validate_category(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || CATEGORIES.contains(&trimmed) {
        None
    } else {
        Some(format!("Unknown category '{trimmed}'"))
    }
}

/// All validation errors for an idea form.
pub fn validate_idea(input: &IdeaInput) -> Vec<String> {
    [
        validate_required(&input.title, "Title", 200),
        validate_required(&input.problem_statement, "Problem statement", 5000),
        validate_required(&input.solution, "Solution", 5000),
        validate_optional(&input.market_opportunity, "Market opportunity", 5000),
        validate_optional(&input.team_description, "Team description", 5000),
        validate_category(&input.category),
        validate_optional(&input.tags, "Tags", 500),
        validate_url(&input.whatsapp_group_url, "WhatsApp group URL"),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Validate an event status value.
pub fn validate_event_status(value: &str) -> Option<String> {
    match value.trim().parse::<EventStatus>() {
        Ok(_) => None,
        Err(e) => Some(e),
    }
}

/// All validation errors for an event form.
pub fn validate_event(input: &EventInput) -> Vec<String> {
    [
        validate_required(&input.title, "Title", 200),
        validate_optional(&input.description, "Description", 5000),
        validate_optional(&input.location, "Location", 300),
        validate_url(&input.registration_link, "Registration link"),
        validate_event_status(&input.status),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> IdeaInput {
        IdeaInput {
            title: "Campus Rideshare".into(),
            problem_statement: "Students miss early lectures".into(),
            solution: "Pool rides between hostels".into(),
            category: "Transportation".into(),
            tags: "mobility, campus".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_idea_has_no_errors() {
        assert!(validate_idea(&valid_input()).is_empty());
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let input = IdeaInput { title: "  ".into(), ..Default::default() };
        let errors = validate_idea(&input);
        assert!(errors.contains(&"Title is required".to_string()));
        assert!(errors.contains(&"Problem statement is required".to_string()));
        assert!(errors.contains(&"Solution is required".to_string()));
    }

    #[test]
    fn unknown_category_rejected() {
        let mut input = valid_input();
        input.category = "Crypto".into();
        assert_eq!(validate_idea(&input), vec!["Unknown category 'Crypto'".to_string()]);
    }

    #[test]
    fn url_must_be_http() {
        assert!(validate_url("", "Link").is_none());
        assert!(validate_url("https://chat.whatsapp.com/abc", "Link").is_none());
        assert!(validate_url("chat.whatsapp.com/abc", "Link").is_some());
    }

    #[test]
    fn title_length_counts_characters() {
        let title = "é".repeat(200);
        assert!(validate_required(&title, "Title", 200).is_none());
        let title = "é".repeat(201);
        assert!(validate_required(&title, "Title", 200).is_some());
    }

    #[test]
    fn event_status_values() {
        assert!(validate_event_status("draft").is_none());
        assert!(validate_event_status("published").is_none());
        assert!(validate_event_status("archived").is_some());
    }
}
