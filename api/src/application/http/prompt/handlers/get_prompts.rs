use crate::application::http::prompt::validators::LanguageParams;
use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Query, State};
use nutrilens_core::domain::prompt::ports::PromptService;
use nutrilens_core::domain::prompt::value_objects::PromptVersionSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetPromptsResponse {
    pub data: Vec<PromptVersionSummary>,
}

#[utoipa::path(
    get,
    path = "",
    tag = "prompt",
    summary = "List prompt versions",
    description = "Lists prompt versions, optionally for one language. Content is shortened to a preview.",
    params(LanguageParams),
    responses(
        (status = 200, body = GetPromptsResponse)
    ),
    security(("api_key" = [])),
)]
pub async fn get_prompts(
    Query(query): Query<LanguageParams>,
    State(state): State<AppState>,
) -> Result<Response<GetPromptsResponse>, ApiError> {
    let language = query
        .language
        .map(|language| language.trim().to_string())
        .filter(|language| !language.is_empty());

    let prompts = state
        .service
        .list_prompt_versions(language)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(GetPromptsResponse { data: prompts }))
}
