use super::handlers::{
    health::{__path_health, health},
    readiness::{__path_readiness, readiness},
};
use crate::application::http::server::app_state::AppState;
use axum::{Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(health, readiness))]
pub struct HealthApiDoc;

pub fn health_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/health", state.args.server.root_path),
            get(health),
        )
        .route(
            &format!("{}/health/ready", state.args.server.root_path),
            get(readiness),
        )
}
