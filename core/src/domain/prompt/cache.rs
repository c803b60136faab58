use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, error, info, warn};

use crate::domain::prompt::ports::PromptRepository;

/// Template used when no version is active for the requested language.
pub const DEFAULT_PROMPT: &str = include_str!("default_prompt.md");

/// Read-through cache of active prompt contents, keyed by language.
#[derive(Clone)]
pub struct PromptCache {
    entries: Cache<String, String>,
}

impl PromptCache {
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(64)
            .time_to_live(ttl)
            .build();

        Self { entries }
    }

    /// Returns the active prompt for `language`, loading it on a miss.
    /// Falls back to [`DEFAULT_PROMPT`] when the repository has nothing or fails.
    pub async fn resolve<PR: PromptRepository>(&self, repository: &PR, language: &str) -> String {
        if let Some(content) = self.entries.get(language).await {
            debug!("Using cached prompt for language {}", language);
            return content;
        }

        match repository.get_active(language.to_string()).await {
            Ok(Some(prompt)) => {
                info!(
                    "Loaded active prompt: version={}, language={}",
                    prompt.version, prompt.language
                );
                self.entries
                    .insert(language.to_string(), prompt.content.clone())
                    .await;
                prompt.content
            }
            Ok(None) => {
                warn!(
                    "No active prompt for language {}, using built-in template",
                    language
                );
                DEFAULT_PROMPT.to_string()
            }
            Err(e) => {
                error!("Failed to load prompt: {}, using built-in template", e);
                DEFAULT_PROMPT.to_string()
            }
        }
    }

    pub async fn invalidate(&self, language: &str) {
        self.entries.invalidate(language).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        common::test_support::InMemoryPromptRepository,
        prompt::entities::prompt_version::PromptVersion,
    };

    fn active(version: &str, language: &str, content: &str) -> PromptVersion {
        let mut prompt = PromptVersion::new(version.into(), language.into(), content.into());
        prompt.active = true;
        prompt
    }

    #[tokio::test]
    async fn falls_back_to_builtin_template() {
        let cache = PromptCache::new(Duration::from_secs(300));
        let repository = InMemoryPromptRepository::default();

        let content = cache.resolve(&repository, "es").await;

        assert_eq!(content, DEFAULT_PROMPT);
    }

    #[tokio::test]
    async fn serves_cached_content_until_invalidated() {
        let cache = PromptCache::new(Duration::from_secs(300));
        let repository = InMemoryPromptRepository::default();
        repository.insert(active("v1", "es", "first"));

        assert_eq!(cache.resolve(&repository, "es").await, "first");

        repository.replace_active("es", active("v2", "es", "second"));
        assert_eq!(cache.resolve(&repository, "es").await, "first");

        cache.invalidate("es").await;
        assert_eq!(cache.resolve(&repository, "es").await, "second");
    }
}
