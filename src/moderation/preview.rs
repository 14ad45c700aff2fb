use serde::Serialize;

use crate::models::idea::IdeaFile;

/// How an attachment can be shown inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Image,
    Pdf,
    None,
}

impl PreviewKind {
    pub fn classify(file_type: Option<&str>, file_name: &str) -> Self {
        let mime = file_type.unwrap_or("");
        if mime.starts_with("image/") {
            PreviewKind::Image
        } else if mime == "application/pdf" || file_name.to_lowercase().ends_with(".pdf") {
            PreviewKind::Pdf
        } else {
            PreviewKind::None
        }
    }

    pub fn of(file: &IdeaFile) -> Self {
        Self::classify(file.file_type.as_deref(), &file.file_name)
    }
}

/// Size in kilobytes with two decimals, e.g. `"12.50 KB"`.
pub fn format_size_kb(bytes: i64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}
