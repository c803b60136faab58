use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use nutrilens_core::domain::prompt::entities::prompt_version::PromptVersion;
use nutrilens_core::domain::prompt::ports::PromptService;
use tracing::info;

#[utoipa::path(
    post,
    path = "/{language}/{version}/activate",
    tag = "prompt",
    summary = "Activate prompt version",
    description = "Makes this version the only active one for its language. New analyses pick it up immediately.",
    params(
        ("language" = String, Path, description = "Language code"),
        ("version" = String, Path, description = "Version identifier"),
    ),
    responses(
        (status = 200, body = PromptVersion),
        (status = 404, description = "Prompt version not found"),
    ),
    security(("api_key" = [])),
)]
pub async fn activate_prompt(
    Path((language, version)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Response<PromptVersion>, ApiError> {
    let prompt = state
        .service
        .activate_prompt_version(version, language)
        .await
        .map_err(ApiError::from)?;

    info!(
        "prompt version {} is now active for {}",
        prompt.version, prompt.language
    );

    Ok(Response::OK(prompt))
}
