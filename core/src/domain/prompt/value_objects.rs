use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::prompt::entities::prompt_version::PromptVersion;

pub struct CreatePromptVersionInput {
    pub version: String,
    pub language: String,
    pub content: String,
    pub activate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PromptVersionSummary {
    pub id: Uuid,
    pub version: String,
    pub language: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub content_preview: String,
}

impl From<&PromptVersion> for PromptVersionSummary {
    fn from(prompt: &PromptVersion) -> Self {
        Self {
            id: prompt.id,
            version: prompt.version.clone(),
            language: prompt.language.clone(),
            active: prompt.active,
            created_at: prompt.created_at,
            content_preview: prompt.content_preview(),
        }
    }
}
