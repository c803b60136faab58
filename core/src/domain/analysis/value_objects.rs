use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    analysis::entities::{AnalysisRecord, AnalysisType},
    image::RawImage,
    llm::entities::{Personalization, TokenUsage},
};

pub struct AnalyzeInput {
    pub session_id: Option<String>,
    pub images: Vec<RawImage>,
    pub analysis_type: AnalysisType,
    pub personalization: Personalization,
}

/// Result of the analysis pipeline. `payload` is the model JSON, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub payload: serde_json::Value,
    pub cache_hit: bool,
    pub images_processed: usize,
    /// Seconds spent producing the result. Zero for cache hits.
    pub processing_time: f64,
    pub model_used: Option<String>,
    pub token_usage: Option<TokenUsage>,
}

pub struct GetAnalysisHistoryInput {
    pub session_id: Option<String>,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisSummary {
    pub id: Uuid,
    pub product_name: Option<String>,
    pub analysis_type: AnalysisType,
    pub created_at: DateTime<Utc>,
}

impl From<&AnalysisRecord> for AnalysisSummary {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            id: record.id,
            product_name: record.product_name.clone(),
            analysis_type: record.analysis_type,
            created_at: record.created_at,
        }
    }
}
