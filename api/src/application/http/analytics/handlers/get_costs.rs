use axum::extract::{Query, State};
use nutrilens_core::domain::metrics::{ports::AnalyticsService, value_objects::CostBreakdown};

use crate::application::http::{
    analytics::validators::CostWindowParams,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/costs",
    tag = "analytics",
    summary = "Get cost breakdown",
    description = "Spend on the analysis service with per request, daily and projected monthly figures.",
    params(CostWindowParams),
    responses(
        (status = 200, body = CostBreakdown),
        (status = 400, description = "days outside 1-365"),
    ),
    security(("api_key" = [])),
)]
pub async fn get_costs(
    State(state): State<AppState>,
    Query(params): Query<CostWindowParams>,
) -> Result<Response<CostBreakdown>, ApiError> {
    let breakdown = state
        .service
        .get_cost_breakdown(params.days())
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(breakdown))
}
