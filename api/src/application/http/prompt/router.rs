use super::handlers::activate_prompt::{__path_activate_prompt, activate_prompt};
use super::handlers::create_prompt::{__path_create_prompt, create_prompt};
use super::handlers::get_active_prompt::{__path_get_active_prompt, get_active_prompt};
use super::handlers::get_prompt::{__path_get_prompt, get_prompt};
use super::handlers::get_prompts::{__path_get_prompts, get_prompts};
use crate::application::{auth::auth, http::server::app_state::AppState};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(get_prompts, create_prompt, get_active_prompt, get_prompt, activate_prompt))]
pub struct PromptApiDoc;

pub fn prompt_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/prompts", state.args.server.root_path),
            get(get_prompts).post(create_prompt),
        )
        .route(
            &format!("{}/prompts/active", state.args.server.root_path),
            get(get_active_prompt),
        )
        .route(
            &format!(
                "{}/prompts/{{language}}/{{version}}",
                state.args.server.root_path
            ),
            get(get_prompt),
        )
        .route(
            &format!(
                "{}/prompts/{{language}}/{{version}}/activate",
                state.args.server.root_path
            ),
            post(activate_prompt),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth))
}
