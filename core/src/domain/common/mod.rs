use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

pub mod entities;
pub mod services;
#[cfg(test)]
pub mod test_support;

#[derive(Clone, Debug)]
pub struct NutrilensConfig {
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    pub cache: CacheConfig,
    pub image: ImageConfig,
    pub prompt: PromptConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub max_output_tokens: u32,
    /// Hard wall-clock bound for a single call to the analysis service.
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub analysis_ttl_secs: u64,
    pub analysis_max_capacity: u64,
    pub prompt_ttl_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub max_file_size: usize,
    /// Upper bound on images per request.
    pub max_images: usize,
    pub allowed_types: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct PromptConfig {
    /// Language of the prompt template loaded from `prompt_versions`.
    pub language: String,
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}
