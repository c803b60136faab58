use super::handlers::{
    get_analysis::{__path_get_analysis, get_analysis},
    get_costs::{__path_get_costs, get_costs},
    get_history::{__path_get_history, get_history},
    get_metrics::{__path_get_metrics, get_metrics},
    get_performance::{__path_get_performance, get_performance},
};
use crate::application::{auth::auth, http::server::app_state::AppState};
use axum::{Router, middleware, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(get_metrics, get_costs, get_performance, get_history, get_analysis))]
pub struct AnalyticsApiDoc;

pub fn analytics_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/analytics/metrics", state.args.server.root_path),
            get(get_metrics),
        )
        .route(
            &format!("{}/analytics/costs", state.args.server.root_path),
            get(get_costs),
        )
        .route(
            &format!("{}/analytics/performance", state.args.server.root_path),
            get(get_performance),
        )
        .route(
            &format!("{}/analytics/history", state.args.server.root_path),
            get(get_history),
        )
        .route(
            &format!(
                "{}/analytics/history/{{analysis_id}}",
                state.args.server.root_path
            ),
            get(get_analysis),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth))
}
