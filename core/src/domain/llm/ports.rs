use std::future::Future;

use crate::domain::llm::entities::{LlmError, LlmReply, LlmRequest};

/// Client for a multimodal model that answers with text.
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    fn generate(
        &self,
        request: LlmRequest,
    ) -> impl Future<Output = Result<LlmReply, LlmError>> + Send;

    fn model_name(&self) -> String;
}
