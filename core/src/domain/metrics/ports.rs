use chrono::{DateTime, Utc};
use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    metrics::{
        entities::UsageMetric,
        value_objects::{CostBreakdown, MetricsSummary, PerformanceMetrics, UsageAggregate},
    },
};

#[cfg_attr(test, mockall::automock)]
pub trait UsageMetricRepository: Send + Sync {
    fn create(
        &self,
        metric: UsageMetric,
    ) -> impl Future<Output = Result<UsageMetric, CoreError>> + Send;

    /// Aggregates every metric created between `start` and `end`, inclusive.
    fn aggregate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<UsageAggregate, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait AnalyticsService: Send + Sync {
    fn get_metrics_summary(
        &self,
        days: u32,
    ) -> impl Future<Output = Result<MetricsSummary, CoreError>> + Send;

    fn get_cost_breakdown(
        &self,
        days: u32,
    ) -> impl Future<Output = Result<CostBreakdown, CoreError>> + Send;

    fn get_performance_metrics(
        &self,
        days: u32,
    ) -> impl Future<Output = Result<PerformanceMetrics, CoreError>> + Send;
}
