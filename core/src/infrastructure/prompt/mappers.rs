use crate::domain::prompt::entities::prompt_version::PromptVersion;
use crate::entity::prompt_versions::Model as PromptVersionModel;

impl From<PromptVersionModel> for PromptVersion {
    fn from(model: PromptVersionModel) -> Self {
        PromptVersion {
            id: model.id,
            version: model.version,
            language: model.language,
            content: model.content,
            active: model.active,
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}

impl From<&PromptVersionModel> for PromptVersion {
    fn from(model: &PromptVersionModel) -> Self {
        PromptVersion {
            id: model.id,
            version: model.version.clone(),
            language: model.language.clone(),
            content: model.content.clone(),
            active: model.active,
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}
