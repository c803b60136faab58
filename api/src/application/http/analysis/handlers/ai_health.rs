use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AiHealthResponse {
    pub status: String,
    pub service: String,
    pub model: String,
    pub api: String,
    pub features: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "ai",
    summary = "AI service info",
    responses(
        (status = 200, body = AiHealthResponse)
    ),
)]
pub async fn ai_health(
    State(state): State<AppState>,
) -> Result<Response<AiHealthResponse>, ApiError> {
    Ok(Response::OK(AiHealthResponse {
        status: "ok".to_string(),
        service: "AI Analysis".to_string(),
        model: state.args.llm.openai_model.clone(),
        api: "responses".to_string(),
        features: ["nutrition_extraction", "ingredient_analysis", "health_scoring"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    }))
}
