use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use nutrilens_core::domain::prompt::entities::prompt_version::PromptVersion;
use nutrilens_core::domain::prompt::ports::PromptService;

#[utoipa::path(
    get,
    path = "/{language}/{version}",
    tag = "prompt",
    summary = "Get prompt version",
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
pub async fn get_prompt(
    Path((language, version)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Response<PromptVersion>, ApiError> {
    let prompt = state
        .service
        .get_prompt_by_version(version, language)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(prompt))
}
