use axum::{
    Extension,
    extract::{Query, State},
};
use nutrilens_core::domain::analysis::{
    ports::AnalysisService,
    value_objects::{AnalysisSummary, GetAnalysisHistoryInput},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{
    http::{
        analytics::validators::HistoryParams,
        server::{
            api_entities::{api_error::ApiError, response::Response},
            app_state::AppState,
        },
    },
    session::SessionContext,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetHistoryResponse {
    pub history: Vec<AnalysisSummary>,
}

#[utoipa::path(
    get,
    path = "/history",
    tag = "analytics",
    summary = "Get analysis history",
    description = "Analyses submitted from the caller's session, newest first.",
    params(HistoryParams),
    responses(
        (status = 200, body = GetHistoryResponse),
        (status = 400, description = "limit outside 1-50"),
    ),
    security(("api_key" = [])),
)]
pub async fn get_history(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<HistoryParams>,
) -> Result<Response<GetHistoryResponse>, ApiError> {
    let history = state
        .service
        .get_analysis_history(GetAnalysisHistoryInput {
            session_id: Some(session.session_id),
            limit: params.limit(),
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(GetHistoryResponse { history }))
}
