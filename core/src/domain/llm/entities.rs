use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::image::NormalizedImage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    pub fn accumulate(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// One outbound call to the multimodal model.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub images: Vec<NormalizedImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmReply {
    pub text: String,
    pub usage: TokenUsage,
    pub model: String,
}

/// Transport level failures reported by an [`LLMClient`](super::ports::LLMClient).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LlmError {
    /// Network errors, 429 and 5xx. Worth another attempt.
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Caller specific context added to the prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Personalization {
    pub dietary_preferences: Vec<String>,
    pub health_conditions: Vec<String>,
    pub user_profile: Option<serde_json::Value>,
    pub content_language: String,
}

impl Personalization {
    pub fn is_empty(&self) -> bool {
        self.dietary_preferences.is_empty()
            && self.health_conditions.is_empty()
            && self.user_profile.is_none()
    }
}

/// Result of a successful analysis call, with the telemetry the caller records.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub payload: serde_json::Value,
    pub usage: TokenUsage,
    pub cost_usd: f64,
    pub model: String,
}
