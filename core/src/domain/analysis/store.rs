use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{
    analysis::{
        entities::{AnalysisRecord, AnalysisType, Fingerprint},
        ports::{AnalysisCache, AnalysisRepository},
    },
    common::entities::app_errors::CoreError,
};

/// Result store: durable repository with a read-through cache in front.
pub struct ResultStore<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> Clone for ResultStore<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<R, C> ResultStore<R, C> {
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self { repository, cache }
    }
}

impl<R, C> ResultStore<R, C>
where
    R: AnalysisRepository,
    C: AnalysisCache,
{
    pub async fn lookup(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<AnalysisRecord>, CoreError> {
        if let Some(record) = self.cache.get(fingerprint.clone()).await {
            debug!("Cache hit for fingerprint {}", fingerprint.short());
            return Ok(Some(record));
        }

        let record = self
            .repository
            .get_by_fingerprint(fingerprint.clone())
            .await?;

        if let Some(record) = &record {
            debug!("Populating cache for fingerprint {}", fingerprint.short());
            self.cache.insert(record.clone()).await;
        }

        Ok(record)
    }

    /// Persists a new result. When a concurrent request stored the same
    /// fingerprint first, that row is returned instead.
    pub async fn save(
        &self,
        fingerprint: Fingerprint,
        payload: serde_json::Value,
        analysis_type: AnalysisType,
        session_id: Option<String>,
        model_used: Option<String>,
    ) -> Result<AnalysisRecord, CoreError> {
        let record = AnalysisRecord::new(
            fingerprint.clone(),
            session_id,
            analysis_type,
            payload,
            model_used,
        );

        match self.repository.create(record).await {
            Ok(created) => {
                info!("Analysis saved with fingerprint {}", fingerprint.short());
                Ok(created)
            }
            Err(CoreError::PersistenceConflict) => {
                warn!(
                    "Duplicate analysis for fingerprint {}, reading stored row",
                    fingerprint.short()
                );
                let winner = self
                    .repository
                    .get_by_fingerprint(fingerprint.clone())
                    .await?
                    .ok_or_else(|| {
                        error!(
                            "Conflicting row for fingerprint {} could not be read back",
                            fingerprint.short()
                        );
                        CoreError::InternalServerError
                    })?;
                self.cache.insert(winner.clone()).await;
                Ok(winner)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::common::test_support::{InMemoryAnalysisCache, InMemoryAnalysisRepository};

    fn store() -> (
        ResultStore<InMemoryAnalysisRepository, InMemoryAnalysisCache>,
        InMemoryAnalysisRepository,
        InMemoryAnalysisCache,
    ) {
        let repository = InMemoryAnalysisRepository::default();
        let cache = InMemoryAnalysisCache::default();
        let store = ResultStore::new(Arc::new(repository.clone()), Arc::new(cache.clone()));
        (store, repository, cache)
    }

    fn fingerprint() -> Fingerprint {
        Fingerprint::new("ab".repeat(32))
    }

    #[tokio::test]
    async fn lookup_populates_cache_from_durable_store() {
        let (store, _, cache) = store();
        store
            .save(fingerprint(), json!({"a": 1}), AnalysisType::Complete, None, None)
            .await
            .unwrap();
        assert_eq!(cache.len(), 0);

        let found = store.lookup(&fingerprint()).await.unwrap();

        assert!(found.is_some());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn lookup_misses_for_unknown_fingerprint() {
        let (store, _, cache) = store();

        assert_eq!(store.lookup(&fingerprint()).await.unwrap(), None);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn conflicting_save_returns_the_first_row() {
        let (store, repository, _) = store();

        let winner = store
            .save(
                fingerprint(),
                json!({"winner": true}),
                AnalysisType::Complete,
                Some("s1".into()),
                None,
            )
            .await
            .unwrap();
        let loser = store
            .save(
                fingerprint(),
                json!({"winner": false}),
                AnalysisType::Complete,
                Some("s2".into()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(loser, winner);
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_is_surfaced() {
        let (store, repository, _) = store();
        repository.reject_writes(true);

        let result = store
            .save(fingerprint(), json!({}), AnalysisType::Nutrition, None, None)
            .await;

        assert!(matches!(result, Err(CoreError::PersistenceUnavailable(_))));
    }
}
