use std::time::Duration;

use tracing::info;

use crate::{
    domain::{
        common::{
            NutrilensConfig,
            services::{Service, ServiceParts},
        },
        image::normalizer::ImageNormalizer,
        llm::client::{ExternalAnalysisClient, RetryPolicy},
        prompt::cache::PromptCache,
    },
    infrastructure::{
        analysis::{
            cache::MokaAnalysisCache, repositories::analysis_repository::PostgresAnalysisRepository,
        },
        db::postgres::Postgres,
        health::repository::PostgresHealthCheckRepository,
        llm::openai_client::OpenAILLMClient,
        metrics::repositories::usage_metric_repository::PostgresUsageMetricRepository,
        prompt::repositories::prompt_repository::PostgresPromptRepository,
    },
};

pub type NutrilensService = Service<
    PostgresAnalysisRepository,
    MokaAnalysisCache,
    PostgresUsageMetricRepository,
    PostgresPromptRepository,
    OpenAILLMClient,
    PostgresHealthCheckRepository,
>;

pub async fn create_service(config: NutrilensConfig) -> Result<NutrilensService, anyhow::Error> {
    let postgres = Postgres::new(&config.database).await?;
    postgres.migrate().await?;
    let db = postgres.get_db();

    let analysis_cache = MokaAnalysisCache::new(
        Duration::from_secs(config.cache.analysis_ttl_secs),
        config.cache.analysis_max_capacity,
    );
    let prompt_cache = PromptCache::new(Duration::from_secs(config.cache.prompt_ttl_secs));

    let policy = RetryPolicy::from(&config.llm);
    let analysis_client = ExternalAnalysisClient::new(OpenAILLMClient::new(&config.llm), policy);

    info!(
        "Analysis service ready: model={}, timeout={:?}, retries={}",
        config.llm.openai_model, policy.timeout, policy.max_retries
    );

    Ok(Service::new(ServiceParts {
        normalizer: ImageNormalizer::new(&config.image),
        analysis_repository: PostgresAnalysisRepository::new(db.clone()),
        analysis_cache,
        usage_metric_repository: PostgresUsageMetricRepository::new(db.clone()),
        prompt_repository: PostgresPromptRepository::new(db.clone()),
        prompt_cache,
        analysis_client,
        health_check_repository: PostgresHealthCheckRepository::new(db),
        prompt_language: config.prompt.language,
    }))
}
