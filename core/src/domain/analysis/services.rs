use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    analysis::{
        entities::AnalysisRecord,
        fingerprint::compute_fingerprint,
        ports::{AnalysisCache, AnalysisRepository, AnalysisService},
        value_objects::{AnalysisResponse, AnalysisSummary, AnalyzeInput, GetAnalysisHistoryInput},
    },
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    llm::{entities::TokenUsage, ports::LLMClient},
    metrics::{entities::UsageMetric, ports::UsageMetricRepository},
    prompt::ports::PromptRepository,
};

pub const MAX_HISTORY_LIMIT: u64 = 50;

/// Why a request failed, with whatever the external call cost before it did.
struct PipelineFailure {
    error: CoreError,
    cost_usd: Option<f64>,
    usage: Option<TokenUsage>,
}

impl From<CoreError> for PipelineFailure {
    fn from(error: CoreError) -> Self {
        Self {
            error,
            cost_usd: None,
            usage: None,
        }
    }
}

fn elapsed_ms(started: Instant) -> i64 {
    started.elapsed().as_millis().try_into().unwrap_or(i64::MAX)
}

impl<AR, AC, UM, PR, LLM, HC> Service<AR, AC, UM, PR, LLM, HC>
where
    AR: AnalysisRepository,
    AC: AnalysisCache,
    UM: UsageMetricRepository,
    PR: PromptRepository,
    LLM: LLMClient,
    HC: HealthCheckRepository,
{
    /// Runs the pipeline and returns the response with the metric describing it.
    async fn run_pipeline(
        &self,
        input: AnalyzeInput,
        started: Instant,
    ) -> Result<(AnalysisResponse, UsageMetric), PipelineFailure> {
        let images = self.normalizer.normalize(input.images)?;
        let fingerprint = compute_fingerprint(&images, input.analysis_type);
        info!("Image fingerprint calculated: {}...", fingerprint.short());

        if let Some(record) = self.result_store.lookup(&fingerprint).await? {
            info!("Found cached analysis for fingerprint: {}...", fingerprint.short());
            let response = AnalysisResponse {
                analysis_id: record.id,
                payload: record.result,
                cache_hit: true,
                images_processed: images.len(),
                processing_time: 0.0,
                model_used: record.model_used,
                token_usage: None,
            };
            let metric = UsageMetric::hit(input.session_id, elapsed_ms(started));
            return Ok((response, metric));
        }

        info!("No cached analysis found, calling analysis service");
        let prompt = self
            .prompt_cache
            .resolve(self.prompt_repository.as_ref(), &self.prompt_language)
            .await;

        let outcome = self
            .analysis_client
            .analyze(
                &images,
                &prompt,
                input.analysis_type,
                &input.personalization,
            )
            .await?;

        let record = self
            .result_store
            .save(
                fingerprint,
                outcome.payload,
                input.analysis_type,
                input.session_id.clone(),
                Some(outcome.model.clone()),
            )
            .await
            .map_err(|error| PipelineFailure {
                error,
                cost_usd: Some(outcome.cost_usd),
                usage: Some(outcome.usage),
            })?;

        let response_time_ms = elapsed_ms(started);
        let response = AnalysisResponse {
            analysis_id: record.id,
            payload: record.result,
            cache_hit: false,
            images_processed: images.len(),
            processing_time: response_time_ms as f64 / 1000.0,
            model_used: Some(outcome.model),
            token_usage: Some(outcome.usage),
        };
        let metric = UsageMetric::miss(
            input.session_id,
            response_time_ms,
            outcome.cost_usd,
            outcome.usage,
        );

        Ok((response, metric))
    }
}

impl<AR, AC, UM, PR, LLM, HC> AnalysisService for Service<AR, AC, UM, PR, LLM, HC>
where
    AR: AnalysisRepository,
    AC: AnalysisCache,
    UM: UsageMetricRepository,
    PR: PromptRepository,
    LLM: LLMClient,
    HC: HealthCheckRepository,
{
    async fn analyze(&self, input: AnalyzeInput) -> Result<AnalysisResponse, CoreError> {
        let started = Instant::now();
        let session_id = input.session_id.clone();

        match self.run_pipeline(input, started).await {
            Ok((response, metric)) => {
                self.metrics_recorder.record(metric).await;
                Ok(response)
            }
            Err(failure) => {
                warn!("Analysis failed: {}", failure.error);
                let metric = UsageMetric::failed(
                    session_id,
                    elapsed_ms(started),
                    failure.cost_usd,
                    failure.usage,
                );
                self.metrics_recorder.record(metric).await;
                Err(failure.error)
            }
        }
    }

    async fn get_analysis_history(
        &self,
        input: GetAnalysisHistoryInput,
    ) -> Result<Vec<AnalysisSummary>, CoreError> {
        if input.limit == 0 || input.limit > MAX_HISTORY_LIMIT {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_HISTORY_LIMIT
            )));
        }

        let Some(session_id) = input.session_id else {
            return Ok(Vec::new());
        };

        let records = self
            .analysis_repository
            .get_by_session_id(session_id, input.limit)
            .await?;

        Ok(records.iter().map(AnalysisSummary::from).collect())
    }

    async fn get_analysis(&self, analysis_id: Uuid) -> Result<AnalysisRecord, CoreError> {
        self.analysis_repository
            .get_by_id(analysis_id)
            .await?
            .ok_or(CoreError::NotFound)
    }
}
