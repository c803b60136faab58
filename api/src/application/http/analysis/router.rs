use super::handlers::{
    ai_health::{__path_ai_health, ai_health},
    analyze::{__path_analyze, analyze},
};
use crate::{
    application::{auth::auth, http::server::app_state::AppState, rate_limit::rate_limit},
    args::ImageArgs,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

/// Room for the text fields and part headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(paths(analyze, ai_health))]
pub struct AnalysisApiDoc;

/// Largest multipart body that can still carry a valid request.
fn body_limit(image: &ImageArgs) -> usize {
    image
        .max_file_size
        .saturating_mul(image.max_images)
        .saturating_add(MULTIPART_OVERHEAD)
}

pub fn analysis_routes(state: AppState) -> Router<AppState> {
    let body_limit = body_limit(&state.args.image);

    let protected = Router::new()
        .route(
            &format!("{}/ai/analyze", state.args.server.root_path),
            post(analyze),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            state.analyze_rate_limit.clone(),
            rate_limit,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route(
            &format!("{}/ai/health", state.args.server.root_path),
            get(ai_health),
        )
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_args(max_file_size: usize, max_images: usize) -> ImageArgs {
        ImageArgs {
            max_file_size,
            max_images,
            allowed_types: vec!["image/jpeg".to_string()],
        }
    }

    #[test]
    fn body_limit_follows_image_count() {
        assert_eq!(body_limit(&image_args(1024, 3)), 3 * 1024 + MULTIPART_OVERHEAD);
        assert_eq!(body_limit(&image_args(1024, 5)), 5 * 1024 + MULTIPART_OVERHEAD);
        assert_eq!(body_limit(&image_args(usize::MAX, 3)), usize::MAX);
    }
}
