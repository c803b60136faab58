use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{common::generate_timestamp, llm::entities::TokenUsage};

/// How an analysis request ended. Exactly one per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MetricOutcome {
    Hit,
    Miss,
    Failed,
}

impl MetricOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricOutcome::Hit => "hit",
            MetricOutcome::Miss => "miss",
            MetricOutcome::Failed => "failed",
        }
    }
}

impl From<&str> for MetricOutcome {
    fn from(value: &str) -> Self {
        match value {
            "hit" => MetricOutcome::Hit,
            "miss" => MetricOutcome::Miss,
            _ => MetricOutcome::Failed,
        }
    }
}

impl fmt::Display for MetricOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsageMetric {
    pub id: Uuid,
    pub session_id: Option<String>,
    pub outcome: MetricOutcome,
    pub cache_hit: bool,
    pub response_time_ms: i64,
    pub cost_usd: Option<f64>,
    pub tokens_used: Option<i64>,
    pub prompt_tokens: Option<i64>,
    pub completion_tokens: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl UsageMetric {
    fn build(
        session_id: Option<String>,
        outcome: MetricOutcome,
        response_time_ms: i64,
        cost_usd: Option<f64>,
        usage: Option<TokenUsage>,
    ) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            session_id,
            outcome,
            cache_hit: outcome == MetricOutcome::Hit,
            response_time_ms,
            cost_usd,
            tokens_used: usage.map(|u| u.total_tokens as i64),
            prompt_tokens: usage.map(|u| u.prompt_tokens as i64),
            completion_tokens: usage.map(|u| u.completion_tokens as i64),
            created_at: now,
        }
    }

    pub fn hit(session_id: Option<String>, response_time_ms: i64) -> Self {
        Self::build(session_id, MetricOutcome::Hit, response_time_ms, None, None)
    }

    pub fn miss(
        session_id: Option<String>,
        response_time_ms: i64,
        cost_usd: f64,
        usage: TokenUsage,
    ) -> Self {
        Self::build(
            session_id,
            MetricOutcome::Miss,
            response_time_ms,
            Some(cost_usd),
            Some(usage),
        )
    }

    /// A failed request still reports what the external call cost, if it got that far.
    pub fn failed(
        session_id: Option<String>,
        response_time_ms: i64,
        cost_usd: Option<f64>,
        usage: Option<TokenUsage>,
    ) -> Self {
        Self::build(
            session_id,
            MetricOutcome::Failed,
            response_time_ms,
            cost_usd,
            usage,
        )
    }
}
