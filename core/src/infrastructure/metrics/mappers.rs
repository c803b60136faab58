use crate::{domain::metrics::entities::UsageMetric, entity::usage_metrics};

impl From<&usage_metrics::Model> for UsageMetric {
    fn from(model: &usage_metrics::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id.clone(),
            outcome: model.outcome.as_str().into(),
            cache_hit: model.cache_hit,
            response_time_ms: model.response_time_ms,
            cost_usd: model.cost_usd,
            tokens_used: model.tokens_used,
            prompt_tokens: model.prompt_tokens,
            completion_tokens: model.completion_tokens,
            created_at: model.created_at.to_utc(),
        }
    }
}

impl From<usage_metrics::Model> for UsageMetric {
    fn from(model: usage_metrics::Model) -> Self {
        Self::from(&model)
    }
}
