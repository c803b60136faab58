use crate::application::http::prompt::validators::LanguageParams;
use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Query, State};
use nutrilens_core::domain::common::entities::app_errors::CoreError;
use nutrilens_core::domain::prompt::entities::prompt_version::PromptVersion;
use nutrilens_core::domain::prompt::ports::PromptService;

#[utoipa::path(
    get,
    path = "/active",
    tag = "prompt",
    summary = "Get active prompt",
    description = "Returns the prompt version currently used for a language. Defaults to the configured language.",
    params(LanguageParams),
    responses(
        (status = 200, body = PromptVersion),
        (status = 404, description = "No active prompt for this language"),
    ),
    security(("api_key" = [])),
)]
pub async fn get_active_prompt(
    Query(query): Query<LanguageParams>,
    State(state): State<AppState>,
) -> Result<Response<PromptVersion>, ApiError> {
    let language = query.language_or(&state.args.llm.prompt_language);

    let prompt = state
        .service
        .get_active_prompt(language.clone())
        .await
        .map_err(|e| match e {
            CoreError::NotFound => {
                ApiError::NotFound(format!("No active prompt for language {}", language))
            }
            other => ApiError::from(other),
        })?;

    Ok(Response::OK(prompt))
}
