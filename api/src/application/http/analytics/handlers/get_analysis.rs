use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use nutrilens_core::domain::{
    analysis::{
        entities::{AnalysisRecord, AnalysisType},
        ports::AnalysisService,
    },
    common::entities::app_errors::CoreError,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnalysisDetailResponse {
    pub id: Uuid,
    pub session_id: Option<String>,
    pub product_name: Option<String>,
    pub analysis_type: AnalysisType,
    #[schema(value_type = Object)]
    pub analysis_result: serde_json::Value,
    pub model_used: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnalysisRecord> for AnalysisDetailResponse {
    fn from(record: AnalysisRecord) -> Self {
        Self {
            id: record.id,
            session_id: record.session_id,
            product_name: record.product_name,
            analysis_type: record.analysis_type,
            analysis_result: record.result,
            model_used: record.model_used,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/history/{analysis_id}",
    tag = "analytics",
    summary = "Get analysis details",
    params(
        ("analysis_id" = String, Path, description = "Analysis ID"),
    ),
    responses(
        (status = 200, body = AnalysisDetailResponse),
        (status = 404, description = "Analysis not found"),
    ),
    security(("api_key" = [])),
)]
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<Response<AnalysisDetailResponse>, ApiError> {
    // Malformed ids cannot match a stored analysis.
    let analysis_id = Uuid::parse_str(&analysis_id)
        .map_err(|_| ApiError::NotFound("Analysis not found".to_string()))?;

    let record = state
        .service
        .get_analysis(analysis_id)
        .await
        .map_err(|e| match e {
            CoreError::NotFound => ApiError::NotFound("Analysis not found".to_string()),
            other => ApiError::from(other),
        })?;

    Ok(Response::OK(AnalysisDetailResponse::from(record)))
}
