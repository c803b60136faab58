use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenTotals {
    pub total_tokens: i64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}

/// Raw figures over a time window, as computed by the metrics store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageAggregate {
    pub total_requests: i64,
    /// Share of requests served from a stored result, between 0 and 1.
    pub cache_hit_rate: f64,
    pub total_cost_usd: f64,
    pub average_response_time_ms: f64,
    pub token_usage: TokenTotals,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsWindow {
    pub days: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AnalyticsWindow {
    pub fn ending_at(end: DateTime<Utc>, days: u32) -> Self {
        Self {
            days,
            start: end - chrono::Duration::days(days as i64),
            end,
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricsSummary {
    pub period_days: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub cache_hit_rate: f64,
    pub cache_hit_percentage: f64,
    pub total_requests: i64,
    pub total_openai_cost_usd: f64,
    pub average_response_time_ms: f64,
    pub token_usage: TokenTotals,
}

impl MetricsSummary {
    pub fn new(window: AnalyticsWindow, aggregate: &UsageAggregate) -> Self {
        Self {
            period_days: window.days,
            start_date: window.start,
            end_date: window.end,
            cache_hit_rate: round_to(aggregate.cache_hit_rate, 4),
            cache_hit_percentage: round_to(aggregate.cache_hit_rate * 100.0, 2),
            total_requests: aggregate.total_requests,
            total_openai_cost_usd: aggregate.total_cost_usd,
            average_response_time_ms: round_to(aggregate.average_response_time_ms, 2),
            token_usage: aggregate.token_usage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostBreakdown {
    pub period_days: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_cost_usd: f64,
    pub total_requests: i64,
    pub cost_per_request_usd: f64,
    pub daily_average_cost_usd: f64,
    pub projected_monthly_cost_usd: f64,
    pub token_usage: TokenTotals,
}

impl CostBreakdown {
    pub fn new(window: AnalyticsWindow, aggregate: &UsageAggregate) -> Self {
        let cost_per_request = if aggregate.total_requests > 0 {
            aggregate.total_cost_usd / aggregate.total_requests as f64
        } else {
            0.0
        };
        let daily_average = if window.days > 0 {
            aggregate.total_cost_usd / window.days as f64
        } else {
            0.0
        };

        Self {
            period_days: window.days,
            start_date: window.start,
            end_date: window.end,
            total_cost_usd: aggregate.total_cost_usd,
            total_requests: aggregate.total_requests,
            cost_per_request_usd: round_to(cost_per_request, 6),
            daily_average_cost_usd: round_to(daily_average, 4),
            projected_monthly_cost_usd: round_to(daily_average * 30.0, 2),
            token_usage: aggregate.token_usage,
        }
    }
}

/// Time a cache hit is assumed to save compared to an external call.
const ESTIMATED_MS_SAVED_PER_HIT: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PerformanceMetrics {
    pub period_days: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub average_response_time_ms: f64,
    pub cache_hit_rate: f64,
    pub cache_hit_percentage: f64,
    pub total_requests: i64,
    pub estimated_time_saved_ms: i64,
    pub estimated_time_saved_hours: f64,
}

impl PerformanceMetrics {
    pub fn new(window: AnalyticsWindow, aggregate: &UsageAggregate) -> Self {
        let estimated_hits = (aggregate.cache_hit_rate * aggregate.total_requests as f64) as i64;
        let estimated_time_saved_ms = estimated_hits * ESTIMATED_MS_SAVED_PER_HIT;

        Self {
            period_days: window.days,
            start_date: window.start,
            end_date: window.end,
            average_response_time_ms: round_to(aggregate.average_response_time_ms, 2),
            cache_hit_rate: round_to(aggregate.cache_hit_rate, 4),
            cache_hit_percentage: round_to(aggregate.cache_hit_rate * 100.0, 2),
            total_requests: aggregate.total_requests,
            estimated_time_saved_ms,
            estimated_time_saved_hours: round_to(estimated_time_saved_ms as f64 / 3_600_000.0, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn window(days: u32) -> AnalyticsWindow {
        AnalyticsWindow::ending_at(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(), days)
    }

    fn aggregate() -> UsageAggregate {
        UsageAggregate {
            total_requests: 8,
            cache_hit_rate: 0.375,
            total_cost_usd: 0.123456,
            average_response_time_ms: 1234.5678,
            token_usage: TokenTotals {
                total_tokens: 9000,
                prompt_tokens: 6000,
                completion_tokens: 3000,
            },
        }
    }

    #[test]
    fn window_spans_requested_days() {
        let window = window(7);
        assert_eq!(window.end - window.start, chrono::Duration::days(7));
    }

    #[test]
    fn summary_rounds_rates_and_latency() {
        let summary = MetricsSummary::new(window(7), &aggregate());

        assert_eq!(summary.cache_hit_rate, 0.375);
        assert_eq!(summary.cache_hit_percentage, 37.5);
        assert_eq!(summary.average_response_time_ms, 1234.57);
        assert_eq!(summary.total_requests, 8);
        assert_eq!(summary.token_usage.total_tokens, 9000);
    }

    #[test]
    fn cost_breakdown_projects_monthly_cost() {
        let breakdown = CostBreakdown::new(window(30), &aggregate());

        assert_eq!(breakdown.cost_per_request_usd, 0.015432);
        assert_eq!(breakdown.daily_average_cost_usd, 0.0041);
        assert_eq!(breakdown.projected_monthly_cost_usd, 0.12);
    }

    #[test]
    fn cost_breakdown_without_requests_is_zero() {
        let breakdown = CostBreakdown::new(window(30), &UsageAggregate::default());

        assert_eq!(breakdown.cost_per_request_usd, 0.0);
        assert_eq!(breakdown.projected_monthly_cost_usd, 0.0);
    }

    #[test]
    fn performance_estimates_time_saved_by_hits() {
        let performance = PerformanceMetrics::new(window(7), &aggregate());

        assert_eq!(performance.estimated_time_saved_ms, 3000);
        assert_eq!(performance.estimated_time_saved_hours, 0.0);
        assert_eq!(performance.cache_hit_percentage, 37.5);
    }
}
