use crate::application::http::prompt::validators::CreatePromptValidator;
use crate::application::http::server::api_entities::api_error::{ApiError, ValidateJson};
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::State;
use nutrilens_core::domain::common::entities::app_errors::CoreError;
use nutrilens_core::domain::prompt::entities::prompt_version::PromptVersion;
use nutrilens_core::domain::prompt::ports::PromptService;
use nutrilens_core::domain::prompt::value_objects::CreatePromptVersionInput;

#[utoipa::path(
    post,
    path = "",
    tag = "prompt",
    summary = "Create prompt version",
    description = "Stores a new prompt version. It starts inactive unless `activate` is set.",
    request_body = CreatePromptValidator,
    responses(
        (status = 201, body = PromptVersion),
        (status = 409, description = "Version already exists for this language"),
    ),
    security(("api_key" = [])),
)]
pub async fn create_prompt(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<CreatePromptValidator>,
) -> Result<Response<PromptVersion>, ApiError> {
    let version = payload.version.clone();
    let language = payload.language.clone();

    let prompt = state
        .service
        .create_prompt_version(CreatePromptVersionInput {
            version: payload.version,
            language: payload.language,
            content: payload.content,
            activate: payload.activate,
        })
        .await
        .map_err(|e| match e {
            CoreError::PersistenceConflict => ApiError::Conflict(format!(
                "Prompt version {} already exists for language {}",
                version, language
            )),
            other => ApiError::from(other),
        })?;

    Ok(Response::Created(prompt))
}
