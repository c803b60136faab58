use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::generate_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Nutrition,
    Ingredients,
    Complete,
}

impl AnalysisType {
    /// Unknown or missing values fall back to [`AnalysisType::Complete`].
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("nutrition") => AnalysisType::Nutrition,
            Some("ingredients") => AnalysisType::Ingredients,
            _ => AnalysisType::Complete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Nutrition => "nutrition",
            AnalysisType::Ingredients => "ingredients",
            AnalysisType::Complete => "complete",
        }
    }
}

impl From<&str> for AnalysisType {
    fn from(value: &str) -> Self {
        AnalysisType::parse_lenient(Some(value))
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex encoded SHA-256 deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix used in log lines.
    pub fn short(&self) -> &str {
        self.0.get(..16).unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRecord {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub fingerprint: Fingerprint,
    pub session_id: Option<String>,
    pub product_name: Option<String>,
    pub analysis_type: AnalysisType,
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
    pub model_used: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(
        fingerprint: Fingerprint,
        session_id: Option<String>,
        analysis_type: AnalysisType,
        result: serde_json::Value,
        model_used: Option<String>,
    ) -> Self {
        let (now, timestamp) = generate_timestamp();
        let product_name = result
            .get("product")
            .and_then(|product| product.get("name"))
            .and_then(|name| name.as_str())
            .map(|name| name.chars().take(255).collect());

        Self {
            id: Uuid::new_v7(timestamp),
            fingerprint,
            session_id,
            product_name,
            analysis_type,
            result,
            model_used,
            created_at: now,
            updated_at: now,
        }
    }
}
