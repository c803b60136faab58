use clap::{ArgAction, Parser, ValueEnum};
use nutrilens_core::domain::common::{
    CacheConfig, DatabaseConfig, ImageConfig, LLMConfig, NutrilensConfig, PromptConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "nutrilens", version, about = "Food label analysis API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub cache: CacheArgs,

    #[command(flatten)]
    pub image: ImageArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(flatten)]
    pub rate_limit: RateLimitArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(id = "server_host", long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(id = "server_port", long = "server-port", env = "SERVER_PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "/api/v1")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long = "env", env = "ENV", value_enum, default_value = "development")]
    pub env: Environment,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    #[arg(id = "database_host", long = "database-host", env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(id = "database_port", long = "database-port", env = "DATABASE_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "database-user", env = "DATABASE_USER", default_value = "postgres")]
    pub user: String,

    #[arg(long = "database-password", env = "DATABASE_PASSWORD", default_value = "postgres")]
    pub password: String,

    #[arg(long = "database-name", env = "DATABASE_NAME", default_value = "nutrilens")]
    pub name: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    #[arg(long = "openai-model", env = "OPENAI_MODEL", default_value = "gpt-4o")]
    pub openai_model: String,

    #[arg(
        long = "openai-base-url",
        env = "OPENAI_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub openai_base_url: String,

    #[arg(long = "openai-max-tokens", env = "OPENAI_MAX_TOKENS", default_value_t = 4096)]
    pub max_output_tokens: u32,

    #[arg(long = "openai-timeout", env = "OPENAI_TIMEOUT", default_value_t = 60)]
    pub timeout_secs: u64,

    #[arg(long = "openai-max-retries", env = "OPENAI_MAX_RETRIES", default_value_t = 2)]
    pub max_retries: u32,

    #[arg(long = "openai-retry-backoff-ms", env = "OPENAI_RETRY_BACKOFF_MS", default_value_t = 500)]
    pub retry_backoff_ms: u64,

    /// Language of the prompt template and default language of the analysis text.
    #[arg(long = "prompt-language", env = "PROMPT_LANGUAGE", default_value = "es")]
    pub prompt_language: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CacheArgs {
    #[arg(long = "cache-ttl", env = "CACHE_TTL", default_value_t = 86_400)]
    pub analysis_ttl_secs: u64,

    #[arg(long = "cache-max-capacity", env = "CACHE_MAX_CAPACITY", default_value_t = 10_000)]
    pub analysis_max_capacity: u64,

    #[arg(long = "prompt-cache-ttl", env = "PROMPT_CACHE_TTL", default_value_t = 300)]
    pub prompt_ttl_secs: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ImageArgs {
    #[arg(long = "max-file-size", env = "MAX_FILE_SIZE", default_value_t = 10 * 1024 * 1024)]
    pub max_file_size: usize,

    #[arg(long = "max-images", env = "MAX_IMAGES", default_value_t = 3)]
    pub max_images: usize,

    #[arg(
        long = "allowed-image-types",
        env = "ALLOWED_IMAGE_TYPES",
        value_delimiter = ',',
        default_value = "image/jpeg,image/png,image/webp"
    )]
    pub allowed_types: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct AuthArgs {
    /// Key expected in the `X-API-Key` header.
    #[arg(long = "api-key", env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long = "api-key-prefix", env = "API_KEY_PREFIX", default_value = "nutrilens_sk_")]
    pub api_key_prefix: String,
}

/// Limits on `/ai/analyze`, per API key or, without one, per client address.
#[derive(Debug, Clone, clap::Args)]
pub struct RateLimitArgs {
    #[arg(
        long = "rate-limit-enabled",
        env = "RATE_LIMIT_ENABLED",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub enabled: bool,

    #[arg(long = "rate-limit-per-minute", env = "RATE_LIMIT_PER_MINUTE", default_value_t = 20)]
    pub per_minute: u32,

    #[arg(long = "rate-limit-per-hour", env = "RATE_LIMIT_PER_HOUR", default_value_t = 160)]
    pub per_hour: u32,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Used when `RUST_LOG` is not set.
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for NutrilensConfig {
    fn from(args: Args) -> Self {
        NutrilensConfig {
            database: DatabaseConfig {
                host: args.db.host,
                port: args.db.port,
                username: args.db.user,
                password: args.db.password,
                name: args.db.name,
            },
            llm: LLMConfig {
                openai_api_key: args.llm.openai_api_key,
                openai_model: args.llm.openai_model,
                openai_base_url: args.llm.openai_base_url,
                max_output_tokens: args.llm.max_output_tokens,
                request_timeout_secs: args.llm.timeout_secs,
                max_retries: args.llm.max_retries,
                retry_backoff_ms: args.llm.retry_backoff_ms,
            },
            cache: CacheConfig {
                analysis_ttl_secs: args.cache.analysis_ttl_secs,
                analysis_max_capacity: args.cache.analysis_max_capacity,
                prompt_ttl_secs: args.cache.prompt_ttl_secs,
            },
            image: ImageConfig {
                max_file_size: args.image.max_file_size,
                max_images: args.image.max_images,
                allowed_types: args.image.allowed_types,
            },
            prompt: PromptConfig {
                language: args.llm.prompt_language,
            },
        }
    }
}
