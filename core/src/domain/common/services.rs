use std::sync::Arc;

use crate::domain::{
    analysis::store::ResultStore, image::normalizer::ImageNormalizer,
    llm::client::ExternalAnalysisClient, metrics::recorder::MetricsRecorder,
    prompt::cache::PromptCache,
};

/// Application service. Every domain service trait is implemented on it.
pub struct Service<AR, AC, UM, PR, LLM, HC> {
    pub(crate) normalizer: ImageNormalizer,
    pub(crate) result_store: ResultStore<AR, AC>,
    pub(crate) analysis_repository: Arc<AR>,
    pub(crate) usage_metric_repository: Arc<UM>,
    pub(crate) metrics_recorder: MetricsRecorder<UM>,
    pub(crate) prompt_repository: Arc<PR>,
    pub(crate) prompt_cache: PromptCache,
    pub(crate) analysis_client: ExternalAnalysisClient<LLM>,
    pub(crate) health_check_repository: Arc<HC>,
    pub(crate) prompt_language: String,
}

pub struct ServiceParts<AR, AC, UM, PR, LLM, HC> {
    pub normalizer: ImageNormalizer,
    pub analysis_repository: AR,
    pub analysis_cache: AC,
    pub usage_metric_repository: UM,
    pub prompt_repository: PR,
    pub prompt_cache: PromptCache,
    pub analysis_client: ExternalAnalysisClient<LLM>,
    pub health_check_repository: HC,
    pub prompt_language: String,
}

impl<AR, AC, UM, PR, LLM, HC> Service<AR, AC, UM, PR, LLM, HC> {
    pub fn new(parts: ServiceParts<AR, AC, UM, PR, LLM, HC>) -> Self {
        let analysis_repository = Arc::new(parts.analysis_repository);
        let usage_metric_repository = Arc::new(parts.usage_metric_repository);

        Self {
            normalizer: parts.normalizer,
            result_store: ResultStore::new(
                analysis_repository.clone(),
                Arc::new(parts.analysis_cache),
            ),
            analysis_repository,
            metrics_recorder: MetricsRecorder::new(usage_metric_repository.clone()),
            usage_metric_repository,
            prompt_repository: Arc::new(parts.prompt_repository),
            prompt_cache: parts.prompt_cache,
            analysis_client: parts.analysis_client,
            health_check_repository: Arc::new(parts.health_check_repository),
            prompt_language: parts.prompt_language,
        }
    }
}

impl<AR, AC, UM, PR, LLM, HC> Clone for Service<AR, AC, UM, PR, LLM, HC> {
    fn clone(&self) -> Self {
        Self {
            normalizer: self.normalizer.clone(),
            result_store: self.result_store.clone(),
            analysis_repository: self.analysis_repository.clone(),
            usage_metric_repository: self.usage_metric_repository.clone(),
            metrics_recorder: self.metrics_recorder.clone(),
            prompt_repository: self.prompt_repository.clone(),
            prompt_cache: self.prompt_cache.clone(),
            analysis_client: self.analysis_client.clone(),
            health_check_repository: self.health_check_repository.clone(),
            prompt_language: self.prompt_language.clone(),
        }
    }
}
