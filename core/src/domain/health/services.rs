use crate::domain::{
    analysis::ports::{AnalysisCache, AnalysisRepository},
    common::{entities::app_errors::CoreError, services::Service},
    health::{
        entities::DatabaseHealthStatus,
        ports::{HealthCheckRepository, HealthCheckService},
    },
    llm::ports::LLMClient,
    metrics::ports::UsageMetricRepository,
    prompt::ports::PromptRepository,
};

impl<AR, AC, UM, PR, LLM, HC> HealthCheckService for Service<AR, AC, UM, PR, LLM, HC>
where
    AR: AnalysisRepository,
    AC: AnalysisCache,
    UM: UsageMetricRepository,
    PR: PromptRepository,
    LLM: LLMClient,
    HC: HealthCheckRepository,
{
    async fn readiness(&self) -> Result<DatabaseHealthStatus, CoreError> {
        self.health_check_repository.readiness().await
    }
}
