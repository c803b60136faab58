use axum::extract::{Query, State};
use nutrilens_core::domain::metrics::{ports::AnalyticsService, value_objects::MetricsSummary};

use crate::application::http::{
    analytics::validators::SummaryWindowParams,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "analytics",
    summary = "Get metrics summary",
    description = "Cache hit rate, request count, cost, latency and token usage over the last `days` days.",
    params(SummaryWindowParams),
    responses(
        (status = 200, body = MetricsSummary),
        (status = 400, description = "days outside 1-90"),
    ),
    security(("api_key" = [])),
)]
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(params): Query<SummaryWindowParams>,
) -> Result<Response<MetricsSummary>, ApiError> {
    let summary = state
        .service
        .get_metrics_summary(params.days())
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(summary))
}
