//! In-memory adapters for exercising [`Service`] without a database or network.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    analysis::{
        entities::{AnalysisRecord, Fingerprint},
        ports::{AnalysisCache, AnalysisRepository},
    },
    common::{ImageConfig, entities::app_errors::CoreError, services::{Service, ServiceParts}},
    health::{entities::DatabaseHealthStatus, ports::HealthCheckRepository},
    image::{RawImage, normalizer::ImageNormalizer},
    llm::{
        client::{ExternalAnalysisClient, RetryPolicy},
        entities::{LlmError, LlmReply, LlmRequest, TokenUsage},
        ports::LLMClient,
    },
    metrics::{
        entities::{MetricOutcome, UsageMetric},
        ports::UsageMetricRepository,
        value_objects::{TokenTotals, UsageAggregate},
    },
    prompt::{
        cache::PromptCache, entities::prompt_version::PromptVersion, ports::PromptRepository,
    },
};

pub type TestService = Service<
    InMemoryAnalysisRepository,
    InMemoryAnalysisCache,
    InMemoryUsageMetricRepository,
    InMemoryPromptRepository,
    ScriptedLlm,
    StaticHealthCheck,
>;

pub fn jpeg(body: &[u8]) -> RawImage {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(body);
    RawImage::new(Some("label.jpg".into()), Some("image/jpeg".into()), data)
}

pub fn png(body: &[u8]) -> RawImage {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(body);
    RawImage::new(Some("label.png".into()), Some("image/png".into()), data)
}

pub fn valid_payload() -> serde_json::Value {
    json!({
        "product": {"name": "Galletas Integrales", "brand": "Campo"},
        "per_serving": {"calories": 120, "sodium": 95},
        "general_rating": {"score": 6, "justification": "Moderate sugar"},
        "summary": "Acceptable snack in moderation."
    })
}

#[derive(Clone, Default)]
pub struct InMemoryAnalysisRepository {
    records: Arc<Mutex<Vec<AnalysisRecord>>>,
    writes_rejected: Arc<AtomicBool>,
}

impl InMemoryAnalysisRepository {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn reject_writes(&self, rejected: bool) {
        self.writes_rejected.store(rejected, Ordering::SeqCst);
    }
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn get_by_fingerprint(
        &self,
        fingerprint: Fingerprint,
    ) -> Result<Option<AnalysisRecord>, CoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.fingerprint == fingerprint).cloned())
    }

    async fn get_by_id(&self, analysis_id: Uuid) -> Result<Option<AnalysisRecord>, CoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == analysis_id).cloned())
    }

    async fn create(&self, record: AnalysisRecord) -> Result<AnalysisRecord, CoreError> {
        if self.writes_rejected.load(Ordering::SeqCst) {
            return Err(CoreError::PersistenceUnavailable(
                "connection refused".to_string(),
            ));
        }

        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.fingerprint == record.fingerprint) {
            return Err(CoreError::PersistenceConflict);
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn get_by_session_id(
        &self,
        session_id: String,
        limit: u64,
    ) -> Result<Vec<AnalysisRecord>, CoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.session_id.as_deref() == Some(session_id.as_str()))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAnalysisCache {
    entries: Arc<Mutex<HashMap<String, AnalysisRecord>>>,
}

impl InMemoryAnalysisCache {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl AnalysisCache for InMemoryAnalysisCache {
    async fn get(&self, fingerprint: Fingerprint) -> Option<AnalysisRecord> {
        self.entries
            .lock()
            .unwrap()
            .get(fingerprint.as_str())
            .cloned()
    }

    async fn insert(&self, record: AnalysisRecord) {
        self.entries
            .lock()
            .unwrap()
            .insert(record.fingerprint.as_str().to_string(), record);
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUsageMetricRepository {
    metrics: Arc<Mutex<Vec<UsageMetric>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryUsageMetricRepository {
    pub fn push(&self, metric: UsageMetric) {
        self.metrics.lock().unwrap().push(metric);
    }

    pub fn all(&self) -> Vec<UsageMetric> {
        self.metrics.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<MetricOutcome> {
        self.all().iter().map(|m| m.outcome).collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl UsageMetricRepository for InMemoryUsageMetricRepository {
    async fn create(&self, metric: UsageMetric) -> Result<UsageMetric, CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::PersistenceUnavailable("metrics table locked".to_string()));
        }
        self.push(metric.clone());
        Ok(metric)
    }

    async fn aggregate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<UsageAggregate, CoreError> {
        let metrics: Vec<UsageMetric> = self
            .all()
            .into_iter()
            .filter(|m| m.created_at >= start && m.created_at <= end)
            .collect();

        let served: Vec<&UsageMetric> = metrics
            .iter()
            .filter(|m| m.outcome != MetricOutcome::Failed)
            .collect();
        let total_requests = served.len() as i64;
        let hits = served.iter().filter(|m| m.cache_hit).count() as f64;
        let total_latency: i64 = served.iter().map(|m| m.response_time_ms).sum();
        let per_request = |value: f64| {
            if total_requests == 0 { 0.0 } else { value / total_requests as f64 }
        };

        Ok(UsageAggregate {
            total_requests,
            cache_hit_rate: per_request(hits),
            average_response_time_ms: per_request(total_latency as f64),
            total_cost_usd: metrics.iter().filter_map(|m| m.cost_usd).sum(),
            token_usage: TokenTotals {
                total_tokens: metrics.iter().filter_map(|m| m.tokens_used).sum(),
                prompt_tokens: metrics.iter().filter_map(|m| m.prompt_tokens).sum(),
                completion_tokens: metrics.iter().filter_map(|m| m.completion_tokens).sum(),
            },
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPromptRepository {
    prompts: Arc<Mutex<Vec<PromptVersion>>>,
}

impl InMemoryPromptRepository {
    pub fn insert(&self, prompt: PromptVersion) {
        self.prompts.lock().unwrap().push(prompt);
    }

    /// Deactivates every version of `language` and adds `prompt` as the active one.
    pub fn replace_active(&self, language: &str, mut prompt: PromptVersion) {
        let mut prompts = self.prompts.lock().unwrap();
        for existing in prompts.iter_mut().filter(|p| p.language == language) {
            existing.active = false;
        }
        prompt.active = true;
        prompts.push(prompt);
    }
}

impl PromptRepository for InMemoryPromptRepository {
    async fn get_active(&self, language: String) -> Result<Option<PromptVersion>, CoreError> {
        let prompts = self.prompts.lock().unwrap();
        Ok(prompts
            .iter()
            .rev()
            .find(|p| p.active && p.language == language)
            .cloned())
    }

    async fn get_by_version(
        &self,
        version: String,
        language: String,
    ) -> Result<Option<PromptVersion>, CoreError> {
        let prompts = self.prompts.lock().unwrap();
        Ok(prompts
            .iter()
            .find(|p| p.version == version && p.language == language)
            .cloned())
    }

    async fn list(&self, language: Option<String>) -> Result<Vec<PromptVersion>, CoreError> {
        let prompts = self.prompts.lock().unwrap();
        Ok(prompts
            .iter()
            .rev()
            .filter(|p| language.as_ref().is_none_or(|l| &p.language == l))
            .cloned()
            .collect())
    }

    async fn create(&self, prompt: PromptVersion) -> Result<PromptVersion, CoreError> {
        let mut prompts = self.prompts.lock().unwrap();
        if prompts
            .iter()
            .any(|p| p.version == prompt.version && p.language == prompt.language)
        {
            return Err(CoreError::PersistenceConflict);
        }
        prompts.push(prompt.clone());
        Ok(prompt)
    }

    async fn activate(
        &self,
        version: String,
        language: String,
    ) -> Result<Option<PromptVersion>, CoreError> {
        let mut prompts = self.prompts.lock().unwrap();
        if !prompts
            .iter()
            .any(|p| p.version == version && p.language == language)
        {
            return Ok(None);
        }

        let mut activated = None;
        for prompt in prompts.iter_mut().filter(|p| p.language == language) {
            prompt.active = prompt.version == version;
            if prompt.active {
                prompt.updated_at = Utc::now();
                activated = Some(prompt.clone());
            }
        }
        Ok(activated)
    }
}

#[derive(Clone, Default)]
pub struct StaticHealthCheck;

impl HealthCheckRepository for StaticHealthCheck {
    async fn health(&self) -> Result<u64, CoreError> {
        Ok(1)
    }

    async fn readiness(&self) -> Result<DatabaseHealthStatus, CoreError> {
        Ok(DatabaseHealthStatus {
            reachable: true,
            latency_ms: 1,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    /// Replies after sleeping on the tokio clock.
    Delay(Duration, String),
    Fail(LlmError),
    Hang,
}

/// Plays back a fixed script. Once it runs out it keeps answering with a valid payload,
/// or with the last step when [`ScriptedLlm::repeat_last`] was called.
#[derive(Clone)]
pub struct ScriptedLlm {
    script: Arc<Mutex<VecDeque<Step>>>,
    fallback: Arc<Mutex<Step>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedLlm {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback: Arc::new(Mutex::new(Step::Reply(valid_payload().to_string()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn repeat_last(&self) {
        if let Some(last) = self.script.lock().unwrap().back().cloned() {
            *self.fallback.lock().unwrap() = last;
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply(text: String) -> LlmReply {
        LlmReply {
            text,
            usage: TokenUsage::new(1000, 500),
            model: "gpt-4o".to_string(),
        }
    }
}

impl LLMClient for ScriptedLlm {
    async fn generate(&self, _request: LlmRequest) -> Result<LlmReply, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();
        let step = step.unwrap_or_else(|| self.fallback.lock().unwrap().clone());

        match step {
            Step::Reply(text) => Ok(Self::reply(text)),
            Step::Delay(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(Self::reply(text))
            }
            Step::Fail(e) => Err(e),
            Step::Hang => std::future::pending().await,
        }
    }

    fn model_name(&self) -> String {
        "gpt-4o".to_string()
    }
}

/// A [`TestService`] wired to in-memory adapters, with handles to inspect them.
pub struct TestHarness {
    pub service: TestService,
    pub analyses: InMemoryAnalysisRepository,
    pub cache: InMemoryAnalysisCache,
    pub metrics: InMemoryUsageMetricRepository,
    pub prompts: InMemoryPromptRepository,
    pub llm: ScriptedLlm,
}

impl TestHarness {
    pub fn new(script: Vec<Step>) -> Self {
        let analyses = InMemoryAnalysisRepository::default();
        let cache = InMemoryAnalysisCache::default();
        let metrics = InMemoryUsageMetricRepository::default();
        let prompts = InMemoryPromptRepository::default();
        let llm = ScriptedLlm::new(script);

        let normalizer = ImageNormalizer::new(&ImageConfig {
            max_file_size: 10 * 1024 * 1024,
            max_images: 3,
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        });
        let policy = RetryPolicy {
            max_retries: 2,
            base_backoff: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        };

        let service = Service::new(ServiceParts {
            normalizer,
            analysis_repository: analyses.clone(),
            analysis_cache: cache.clone(),
            usage_metric_repository: metrics.clone(),
            prompt_repository: prompts.clone(),
            prompt_cache: PromptCache::new(Duration::from_secs(300)),
            analysis_client: ExternalAnalysisClient::new(llm.clone(), policy),
            health_check_repository: StaticHealthCheck,
            prompt_language: "es".to_string(),
        });

        Self {
            service,
            analyses,
            cache,
            metrics,
            prompts,
            llm,
        }
    }
}
