use tracing::warn;

use crate::domain::llm::entities::TokenUsage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_cost_per_token: f64,
    pub output_cost_per_token: f64,
}

impl ModelPricing {
    pub fn calculate_cost(&self, usage: &TokenUsage) -> f64 {
        (usage.prompt_tokens as f64 * self.input_cost_per_token)
            + (usage.completion_tokens as f64 * self.output_cost_per_token)
    }
}

pub fn pricing_for(model: &str) -> Option<ModelPricing> {
    match model {
        "gpt-5.1-chat-latest" => Some(ModelPricing {
            input_cost_per_token: 0.00001,
            output_cost_per_token: 0.00003,
        }),
        "gpt-4o" => Some(ModelPricing {
            input_cost_per_token: 0.0000025,
            output_cost_per_token: 0.00001,
        }),
        _ => None,
    }
}

/// Estimated USD cost of a call. Unknown models are free.
pub fn calculate_cost(model: &str, usage: &TokenUsage) -> f64 {
    if usage.total_tokens == 0 {
        return 0.0;
    }

    match pricing_for(model) {
        Some(pricing) => pricing.calculate_cost(usage),
        None => {
            warn!("No pricing data for model: {}", model);
            0.0
        }
    }
}
