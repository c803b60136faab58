use axum::extract::State;
use nutrilens_core::domain::health::{entities::DatabaseHealthStatus, ports::HealthCheckService};
use tracing::error;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    summary = "Readiness probe",
    description = "Pings the database and reports the round trip time.",
    responses(
        (status = 200, body = DatabaseHealthStatus),
        (status = 503, description = "Database unreachable"),
    ),
)]
pub async fn readiness(
    State(state): State<AppState>,
) -> Result<Response<DatabaseHealthStatus>, ApiError> {
    let status = state.service.readiness().await.map_err(|e| {
        error!("readiness check failed: {}", e);
        ApiError::ServiceUnavailable("Database unreachable".to_string())
    })?;

    if !status.reachable {
        return Err(ApiError::ServiceUnavailable(
            "Database unreachable".to_string(),
        ));
    }

    Ok(Response::OK(status))
}
