use tracing::{info, warn};

use crate::domain::{
    analysis::ports::{AnalysisCache, AnalysisRepository},
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    llm::ports::LLMClient,
    metrics::ports::UsageMetricRepository,
    prompt::{
        entities::prompt_version::PromptVersion,
        ports::{PromptRepository, PromptService},
        value_objects::{CreatePromptVersionInput, PromptVersionSummary},
    },
};

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl<AR, AC, UM, PR, LLM, HC> Service<AR, AC, UM, PR, LLM, HC>
where
    AR: AnalysisRepository,
    AC: AnalysisCache,
    UM: UsageMetricRepository,
    PR: PromptRepository,
    LLM: LLMClient,
    HC: HealthCheckRepository,
{
    async fn activate(&self, version: String, language: String) -> Result<PromptVersion, CoreError> {
        let prompt = self
            .prompt_repository
            .activate(version.clone(), language.clone())
            .await?
            .ok_or_else(|| {
                warn!(
                    "Failed to activate prompt version {} for language {}",
                    version, language
                );
                CoreError::NotFound
            })?;

        self.prompt_cache.invalidate(&language).await;
        info!("Activated prompt version {} for language {}", version, language);

        Ok(prompt)
    }
}

impl<AR, AC, UM, PR, LLM, HC> PromptService for Service<AR, AC, UM, PR, LLM, HC>
where
    AR: AnalysisRepository,
    AC: AnalysisCache,
    UM: UsageMetricRepository,
    PR: PromptRepository,
    LLM: LLMClient,
    HC: HealthCheckRepository,
{
    async fn get_active_prompt(&self, language: String) -> Result<PromptVersion, CoreError> {
        self.prompt_repository
            .get_active(language.clone())
            .await?
            .ok_or_else(|| {
                warn!("No active prompt found for language: {}", language);
                CoreError::NotFound
            })
    }

    async fn create_prompt_version(
        &self,
        input: CreatePromptVersionInput,
    ) -> Result<PromptVersion, CoreError> {
        require("version", &input.version)?;
        require("language", &input.language)?;
        require("content", &input.content)?;

        let prompt = PromptVersion::new(input.version, input.language, input.content);
        let created = self.prompt_repository.create(prompt).await?;

        let created = if input.activate {
            self.activate(created.version, created.language).await?
        } else {
            created
        };

        info!(
            "Created prompt version {} for language {} (active={})",
            created.version, created.language, created.active
        );

        Ok(created)
    }

    async fn activate_prompt_version(
        &self,
        version: String,
        language: String,
    ) -> Result<PromptVersion, CoreError> {
        self.activate(version, language).await
    }

    async fn list_prompt_versions(
        &self,
        language: Option<String>,
    ) -> Result<Vec<PromptVersionSummary>, CoreError> {
        let prompts = self.prompt_repository.list(language).await?;

        Ok(prompts.iter().map(PromptVersionSummary::from).collect())
    }

    async fn get_prompt_by_version(
        &self,
        version: String,
        language: String,
    ) -> Result<PromptVersion, CoreError> {
        self.prompt_repository
            .get_by_version(version.clone(), language.clone())
            .await?
            .ok_or_else(|| {
                warn!("Prompt version {} not found for language {}", version, language);
                CoreError::NotFound
            })
    }
}
