use crate::application::http::{
    analysis::router::AnalysisApiDoc, analytics::router::AnalyticsApiDoc,
    health::router::HealthApiDoc, prompt::router::PromptApiDoc,
};
use utoipa::{
    Modify, OpenApi,
    openapi::{
        Components,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};

struct ApiKeySecurity;

impl Modify for ApiKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(Components::new)
            .add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NutriLens API",
        description = "Food label image analysis"
    ),
    modifiers(&ApiKeySecurity),
    nest(
        (path = "/ai", api = AnalysisApiDoc),
        (path = "/analytics", api = AnalyticsApiDoc),
        (path = "/prompts", api = PromptApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
