use std::{sync::Arc, time::Duration};

use tracing::{error, info, warn};

use crate::domain::{
    analysis::entities::AnalysisType,
    common::{LLMConfig, entities::app_errors::CoreError},
    image::NormalizedImage,
    llm::{
        entities::{AnalysisOutcome, LlmError, LlmReply, LlmRequest, Personalization, TokenUsage},
        ports::LLMClient,
        pricing::calculate_cost,
        prompt_builder::{STRICT_JSON_REMINDER, SYSTEM_PROMPT, build_analysis_prompt},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one for transient failures.
    pub max_retries: u32,
    pub base_backoff: Duration,
    /// Bound on a single attempt. Exceeding it is not retried.
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl From<&LLMConfig> for RetryPolicy {
    fn from(config: &LLMConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_backoff: Duration::from_millis(config.retry_backoff_ms),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Wraps an [`LLMClient`] with prompt assembly, retries and JSON validation.
pub struct ExternalAnalysisClient<L> {
    llm: Arc<L>,
    policy: RetryPolicy,
}

impl<L> Clone for ExternalAnalysisClient<L> {
    fn clone(&self) -> Self {
        Self {
            llm: self.llm.clone(),
            policy: self.policy,
        }
    }
}

impl<L> ExternalAnalysisClient<L> {
    pub fn new(llm: L, policy: RetryPolicy) -> Self {
        Self {
            llm: Arc::new(llm),
            policy,
        }
    }
}

impl<L: LLMClient> ExternalAnalysisClient<L> {
    pub fn model_name(&self) -> String {
        self.llm.model_name()
    }

    pub async fn analyze(
        &self,
        images: &[NormalizedImage],
        prompt_template: &str,
        analysis_type: AnalysisType,
        personalization: &Personalization,
    ) -> Result<AnalysisOutcome, CoreError> {
        let mut request = LlmRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_analysis_prompt(prompt_template, analysis_type, personalization),
            images: images.to_vec(),
        };

        let mut usage = TokenUsage::default();
        let mut cost_usd = 0.0;
        let mut reinforced = false;

        loop {
            let reply = self.call_with_retry(&request).await?;
            usage.accumulate(&reply.usage);
            cost_usd += calculate_cost(&reply.model, &reply.usage);

            match parse_json_object(&reply.text) {
                Ok(payload) => {
                    info!(
                        "Analysis completed with model {} ({} tokens)",
                        reply.model, usage.total_tokens
                    );
                    return Ok(AnalysisOutcome {
                        payload,
                        usage,
                        cost_usd,
                        model: reply.model,
                    });
                }
                Err(reason) if !reinforced => {
                    warn!(
                        "Malformed JSON from analysis service, retrying with stricter instruction: {}",
                        reason
                    );
                    request.user_prompt.push_str(STRICT_JSON_REMINDER);
                    reinforced = true;
                }
                Err(reason) => {
                    error!("Analysis service returned malformed JSON twice: {}", reason);
                    return Err(CoreError::DependencyError(format!(
                        "Invalid JSON response from analysis service: {}",
                        reason
                    )));
                }
            }
        }
    }

    async fn call_with_retry(&self, request: &LlmRequest) -> Result<LlmReply, CoreError> {
        let mut attempt = 0;

        loop {
            let call = self.llm.generate(request.clone());

            match tokio::time::timeout(self.policy.timeout, call).await {
                Err(_) => {
                    error!(
                        "Analysis service call exceeded {:?}",
                        self.policy.timeout
                    );
                    return Err(CoreError::DependencyTimeout(self.policy.timeout));
                }
                Ok(Ok(reply)) => return Ok(reply),
                Ok(Err(LlmError::Transient(reason))) if attempt < self.policy.max_retries => {
                    let delay = self.policy.backoff(attempt);
                    attempt += 1;
                    warn!(
                        "Analysis service call failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt,
                        self.policy.max_retries + 1,
                        delay,
                        reason
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(Err(e)) => {
                    error!("Analysis service call failed: {}", e);
                    return Err(CoreError::DependencyError(e.to_string()));
                }
            }
        }
    }
}

/// Strips an optional markdown fence and requires a JSON object.
pub fn parse_json_object(text: &str) -> Result<serde_json::Value, String> {
    let mut content = text.trim();

    if let Some(rest) = content.strip_prefix("```") {
        content = rest.strip_prefix("json").unwrap_or(rest);
        content = content.strip_suffix("```").unwrap_or(content).trim();
    }

    if content.is_empty() {
        return Err("empty response".to_string());
    }

    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err("response is not a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
