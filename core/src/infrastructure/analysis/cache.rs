use std::time::Duration;

use moka::future::Cache;

use crate::domain::analysis::{
    entities::{AnalysisRecord, Fingerprint},
    ports::AnalysisCache,
};

/// In-process TTL cache of stored analyses, keyed by fingerprint.
#[derive(Clone)]
pub struct MokaAnalysisCache {
    entries: Cache<String, AnalysisRecord>,
}

impl MokaAnalysisCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { entries }
    }
}

impl AnalysisCache for MokaAnalysisCache {
    async fn get(&self, fingerprint: Fingerprint) -> Option<AnalysisRecord> {
        self.entries.get(fingerprint.as_str()).await
    }

    async fn insert(&self, record: AnalysisRecord) {
        self.entries
            .insert(record.fingerprint.as_str().to_string(), record)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::analysis::entities::AnalysisType;

    fn record(fingerprint: &str) -> AnalysisRecord {
        AnalysisRecord::new(
            Fingerprint::new(fingerprint.to_string()),
            None,
            AnalysisType::Complete,
            json!({"product": {"name": "Oats"}}),
            Some("gpt-4o".to_string()),
        )
    }

    #[tokio::test]
    async fn returns_inserted_records() {
        let cache = MokaAnalysisCache::new(Duration::from_secs(60), 100);
        let stored = record("abc");

        cache.insert(stored.clone()).await;

        assert_eq!(cache.get(Fingerprint::new("abc".into())).await, Some(stored));
        assert_eq!(cache.get(Fingerprint::new("def".into())).await, None);
    }
}
