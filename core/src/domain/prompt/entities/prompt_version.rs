use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::generate_timestamp;

const PREVIEW_LENGTH: usize = 100;

/// A versioned prompt template. At most one version per language is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PromptVersion {
    pub id: Uuid,
    pub version: String,
    pub language: String,
    pub content: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromptVersion {
    /// New versions always start inactive.
    pub fn new(version: String, language: String, content: String) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            version,
            language,
            content,
            active: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn content_preview(&self) -> String {
        if self.content.chars().count() > PREVIEW_LENGTH {
            let head: String = self.content.chars().take(PREVIEW_LENGTH).collect();
            format!("{}...", head)
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_version_is_inactive() {
        let prompt = PromptVersion::new("v1".into(), "es".into(), "Analiza".into());

        assert!(!prompt.active);
        assert_eq!(prompt.created_at, prompt.updated_at);
    }

    #[test]
    fn preview_truncates_long_content() {
        let prompt = PromptVersion::new("v1".into(), "en".into(), "a".repeat(150));
        let preview = prompt.content_preview();

        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn preview_keeps_short_content() {
        let prompt = PromptVersion::new("v1".into(), "en".into(), "a".repeat(100));

        assert_eq!(prompt.content_preview(), "a".repeat(100));
    }
}
