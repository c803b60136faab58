use axum::{
    Extension,
    extract::{Multipart, State},
};
use nutrilens_core::domain::{
    analysis::{entities::AnalysisType, ports::AnalysisService, value_objects::AnalyzeInput},
    image::RawImage,
    llm::entities::Personalization,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::{
    http::{
        analysis::{
            nutrition::NutritionalAnalysis,
            validators::{parse_comma_list, parse_content_language, parse_user_profile},
        },
        server::{
            api_entities::{api_error::ApiError, response::Response},
            app_state::AppState,
        },
    },
    session::SessionContext,
};

/// Multipart form accepted by [`analyze`]. Documented only; the handler reads fields by name.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct AnalyzeForm {
    /// Label photos, JPEG, PNG or WebP. Three at most by default (`MAX_IMAGES`).
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
    /// `nutrition`, `ingredients` or `complete` (default).
    pub analysis_type: Option<String>,
    /// JSON object describing the user.
    pub user_profile: Option<String>,
    /// Comma separated list.
    pub dietary_preferences: Option<String>,
    /// Comma separated list.
    pub health_conditions: Option<String>,
    pub content_language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub analysis: NutritionalAnalysis,
    pub images_processed: usize,
    /// Seconds spent on the analysis. Zero for cached results.
    pub processing_time: f64,
    pub cache_hit: bool,
    pub model_used: Option<String>,
    pub tokens_used: Option<u32>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

#[derive(Default)]
struct AnalyzeFields {
    images: Vec<RawImage>,
    analysis_type: Option<String>,
    user_profile: Option<String>,
    dietary_preferences: Option<String>,
    health_conditions: Option<String>,
    content_language: Option<String>,
}

async fn read_fields(mut multipart: Multipart) -> Result<AnalyzeFields, ApiError> {
    let mut fields = AnalyzeFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "images" || name == "images[]" {
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
            fields
                .images
                .push(RawImage::new(filename, content_type, data.to_vec()));
            continue;
        }

        let slot = match name.as_str() {
            "analysis_type" => &mut fields.analysis_type,
            "user_profile" => &mut fields.user_profile,
            "dietary_preferences" => &mut fields.dietary_preferences,
            "health_conditions" => &mut fields.health_conditions,
            "content_language" => &mut fields.content_language,
            _ => continue,
        };
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", name, e)))?;
        *slot = Some(value);
    }

    Ok(fields)
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "ai",
    summary = "Analyze product label images",
    description = "Analyzes up to `MAX_IMAGES` (default three) photos of a food label. Identical submissions are answered from the stored result.",
    request_body(content = AnalyzeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = AnalyzeResponse),
        (status = 400, description = "Invalid images or form fields"),
        (status = 403, description = "Missing or invalid API key"),
        (status = 429, description = "Rate limit exceeded for this API key or client"),
        (status = 503, description = "Analysis service or storage unavailable"),
        (status = 504, description = "Analysis service timed out"),
    ),
    security(("api_key" = [])),
)]
pub async fn analyze(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    multipart: Multipart,
) -> Result<Response<AnalyzeResponse>, ApiError> {
    let fields = read_fields(multipart).await?;

    let personalization = Personalization {
        dietary_preferences: parse_comma_list(fields.dietary_preferences.as_deref()),
        health_conditions: parse_comma_list(fields.health_conditions.as_deref()),
        user_profile: parse_user_profile(fields.user_profile.as_deref())?,
        content_language: parse_content_language(
            fields.content_language.as_deref(),
            &state.args.llm.prompt_language,
        ),
    };
    let analysis_type = AnalysisType::parse_lenient(fields.analysis_type.as_deref());

    info!(
        "analysis requested: {} image(s), type {}",
        fields.images.len(),
        analysis_type
    );

    let result = state
        .service
        .analyze(AnalyzeInput {
            session_id: Some(session.session_id),
            images: fields.images,
            analysis_type,
            personalization,
        })
        .await
        .map_err(ApiError::from)?;

    let analysis = NutritionalAnalysis::from_payload(&result.payload);

    Ok(Response::OK(AnalyzeResponse {
        analysis_id: result.analysis_id,
        analysis,
        images_processed: result.images_processed,
        processing_time: result.processing_time,
        cache_hit: result.cache_hit,
        model_used: result.model_used,
        tokens_used: result.token_usage.map(|usage| usage.total_tokens),
        prompt_tokens: result.token_usage.map(|usage| usage.prompt_tokens),
        completion_tokens: result.token_usage.map(|usage| usage.completion_tokens),
    }))
}
