use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::metrics::{entities::UsageMetric, ports::UsageMetricRepository};

/// Appends usage metrics. Recording never fails the request it belongs to.
pub struct MetricsRecorder<M> {
    repository: Arc<M>,
}

impl<M> Clone for MetricsRecorder<M> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<M> MetricsRecorder<M> {
    pub fn new(repository: Arc<M>) -> Self {
        Self { repository }
    }
}

impl<M: UsageMetricRepository> MetricsRecorder<M> {
    pub async fn record(&self, metric: UsageMetric) {
        let outcome = metric.outcome;
        let response_time_ms = metric.response_time_ms;

        match self.repository.create(metric).await {
            Ok(_) => debug!(
                "Recorded {} metric ({} ms)",
                outcome, response_time_ms
            ),
            Err(e) => warn!("Failed to save consumption metric ({}): {}", outcome, e),
        }
    }
}
