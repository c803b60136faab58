use axum::extract::{Query, State};
use nutrilens_core::domain::metrics::{ports::AnalyticsService, value_objects::PerformanceMetrics};

use crate::application::http::{
    analytics::validators::SummaryWindowParams,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/performance",
    tag = "analytics",
    summary = "Get performance metrics",
    description = "Latency, cache effectiveness and the time saved by cached answers.",
    params(SummaryWindowParams),
    responses(
        (status = 200, body = PerformanceMetrics),
        (status = 400, description = "days outside 1-90"),
    ),
    security(("api_key" = [])),
)]
pub async fn get_performance(
    State(state): State<AppState>,
    Query(params): Query<SummaryWindowParams>,
) -> Result<Response<PerformanceMetrics>, ApiError> {
    let performance = state
        .service
        .get_performance_metrics(params.days())
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(performance))
}
