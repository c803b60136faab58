use chrono::Utc;

use crate::domain::{
    analysis::ports::{AnalysisCache, AnalysisRepository},
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    llm::ports::LLMClient,
    metrics::{
        ports::{AnalyticsService, UsageMetricRepository},
        value_objects::{AnalyticsWindow, CostBreakdown, MetricsSummary, PerformanceMetrics},
    },
    prompt::ports::PromptRepository,
};

pub const MAX_SUMMARY_DAYS: u32 = 90;
pub const MAX_COST_DAYS: u32 = 365;

fn analytics_window(days: u32, max_days: u32) -> Result<AnalyticsWindow, CoreError> {
    if days == 0 || days > max_days {
        return Err(CoreError::Validation(format!(
            "days must be between 1 and {}",
            max_days
        )));
    }

    Ok(AnalyticsWindow::ending_at(Utc::now(), days))
}

impl<AR, AC, UM, PR, LLM, HC> AnalyticsService for Service<AR, AC, UM, PR, LLM, HC>
where
    AR: AnalysisRepository,
    AC: AnalysisCache,
    UM: UsageMetricRepository,
    PR: PromptRepository,
    LLM: LLMClient,
    HC: HealthCheckRepository,
{
    async fn get_metrics_summary(&self, days: u32) -> Result<MetricsSummary, CoreError> {
        let window = analytics_window(days, MAX_SUMMARY_DAYS)?;
        let aggregate = self
            .usage_metric_repository
            .aggregate(window.start, window.end)
            .await?;

        Ok(MetricsSummary::new(window, &aggregate))
    }

    async fn get_cost_breakdown(&self, days: u32) -> Result<CostBreakdown, CoreError> {
        let window = analytics_window(days, MAX_COST_DAYS)?;
        let aggregate = self
            .usage_metric_repository
            .aggregate(window.start, window.end)
            .await?;

        Ok(CostBreakdown::new(window, &aggregate))
    }

    async fn get_performance_metrics(&self, days: u32) -> Result<PerformanceMetrics, CoreError> {
        let window = analytics_window(days, MAX_SUMMARY_DAYS)?;
        let aggregate = self
            .usage_metric_repository
            .aggregate(window.start, window.end)
            .await?;

        Ok(PerformanceMetrics::new(window, &aggregate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        common::test_support::TestHarness,
        metrics::{entities::UsageMetric, value_objects::TokenTotals},
        llm::entities::TokenUsage,
    };

    #[tokio::test]
    async fn summary_aggregates_recorded_metrics() {
        let harness = TestHarness::new(vec![]);
        harness
            .metrics
            .push(UsageMetric::miss(None, 3000, 0.02, TokenUsage::new(1000, 300)));
        harness.metrics.push(UsageMetric::hit(None, 20));
        harness.metrics.push(UsageMetric::hit(None, 40));
        harness.metrics.push(UsageMetric::hit(None, 40));
        harness.metrics.push(UsageMetric::failed(None, 100, None, None));

        let summary = harness.service.get_metrics_summary(7).await.unwrap();

        assert_eq!(summary.total_requests, 4);
        assert_eq!(summary.cache_hit_rate, 0.75);
        assert_eq!(summary.average_response_time_ms, 775.0);
        assert_eq!(
            summary.token_usage,
            TokenTotals {
                total_tokens: 1300,
                prompt_tokens: 1000,
                completion_tokens: 300,
            }
        );
    }

    #[tokio::test]
    async fn failed_requests_only_count_towards_spend() {
        let harness = TestHarness::new(vec![]);
        harness.metrics.push(UsageMetric::hit(None, 50));
        harness.metrics.push(UsageMetric::failed(
            None,
            60_000,
            Some(0.03),
            Some(TokenUsage::new(800, 0)),
        ));

        let summary = harness.service.get_metrics_summary(7).await.unwrap();

        assert_eq!(summary.total_requests, 1);
        assert_eq!(summary.cache_hit_rate, 1.0);
        assert_eq!(summary.average_response_time_ms, 50.0);
        assert_eq!(summary.total_openai_cost_usd, 0.03);
        assert_eq!(summary.token_usage.prompt_tokens, 800);
    }

    #[tokio::test]
    async fn rejects_out_of_range_days() {
        let harness = TestHarness::new(vec![]);

        assert!(matches!(
            harness.service.get_metrics_summary(0).await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            harness.service.get_performance_metrics(91).await,
            Err(CoreError::Validation(_))
        ));
        assert!(harness.service.get_cost_breakdown(365).await.is_ok());
    }
}
