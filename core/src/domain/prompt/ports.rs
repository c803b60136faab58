use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    prompt::{
        entities::prompt_version::PromptVersion,
        value_objects::{CreatePromptVersionInput, PromptVersionSummary},
    },
};

#[cfg_attr(test, mockall::automock)]
pub trait PromptService: Send + Sync {
    fn get_active_prompt(
        &self,
        language: String,
    ) -> impl Future<Output = Result<PromptVersion, CoreError>> + Send;

    fn create_prompt_version(
        &self,
        input: CreatePromptVersionInput,
    ) -> impl Future<Output = Result<PromptVersion, CoreError>> + Send;

    fn activate_prompt_version(
        &self,
        version: String,
        language: String,
    ) -> impl Future<Output = Result<PromptVersion, CoreError>> + Send;

    fn list_prompt_versions(
        &self,
        language: Option<String>,
    ) -> impl Future<Output = Result<Vec<PromptVersionSummary>, CoreError>> + Send;

    fn get_prompt_by_version(
        &self,
        version: String,
        language: String,
    ) -> impl Future<Output = Result<PromptVersion, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait PromptRepository: Send + Sync {
    /// Newest active version for the language.
    fn get_active(
        &self,
        language: String,
    ) -> impl Future<Output = Result<Option<PromptVersion>, CoreError>> + Send;

    fn get_by_version(
        &self,
        version: String,
        language: String,
    ) -> impl Future<Output = Result<Option<PromptVersion>, CoreError>> + Send;

    /// Newest first, optionally restricted to one language.
    fn list(
        &self,
        language: Option<String>,
    ) -> impl Future<Output = Result<Vec<PromptVersion>, CoreError>> + Send;

    /// Fails with [`CoreError::PersistenceConflict`] when the version exists for that language.
    fn create(
        &self,
        prompt: PromptVersion,
    ) -> impl Future<Output = Result<PromptVersion, CoreError>> + Send;

    /// Deactivates every other version of the language. `None` when the version does not exist.
    fn activate(
        &self,
        version: String,
        language: String,
    ) -> impl Future<Output = Result<Option<PromptVersion>, CoreError>> + Send;
}
