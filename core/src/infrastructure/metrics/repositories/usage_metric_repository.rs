use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, DatabaseBackend, DatabaseConnection, EntityTrait, FromQueryResult,
    Statement,
};

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        metrics::{
            entities::UsageMetric,
            ports::UsageMetricRepository,
            value_objects::{TokenTotals, UsageAggregate},
        },
    },
    entity::usage_metrics::{ActiveModel as UsageMetricActiveModel, Entity as UsageMetricEntity},
    infrastructure::db::postgres::map_db_error,
};

#[derive(Debug, Clone)]
pub struct PostgresUsageMetricRepository {
    pub db: DatabaseConnection,
}

impl PostgresUsageMetricRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl UsageMetricRepository for PostgresUsageMetricRepository {
    async fn create(&self, metric: UsageMetric) -> Result<UsageMetric, CoreError> {
        let created = UsageMetricEntity::insert(UsageMetricActiveModel {
            id: Set(metric.id),
            session_id: Set(metric.session_id),
            outcome: Set(metric.outcome.as_str().to_string()),
            cache_hit: Set(metric.cache_hit),
            response_time_ms: Set(metric.response_time_ms),
            cost_usd: Set(metric.cost_usd),
            tokens_used: Set(metric.tokens_used),
            prompt_tokens: Set(metric.prompt_tokens),
            completion_tokens: Set(metric.completion_tokens),
            created_at: Set(metric.created_at.fixed_offset()),
        })
        .exec_with_returning(&self.db)
        .await
        .map(UsageMetric::from)
        .map_err(|e| map_db_error("Failed to create usage metric", e))?;

        Ok(created)
    }

    async fn aggregate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<UsageAggregate, CoreError> {
        // Failed requests were never served: they only count towards spend and tokens.
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            SELECT
              COUNT(*) FILTER (WHERE outcome <> 'failed')::bigint AS total_requests,
              COALESCE(AVG(CASE WHEN cache_hit THEN 1.0 ELSE 0.0 END) FILTER (WHERE outcome <> 'failed'), 0)::float8 AS cache_hit_rate,
              COALESCE(SUM(cost_usd), 0)::float8 AS total_cost_usd,
              COALESCE(AVG(response_time_ms) FILTER (WHERE outcome <> 'failed'), 0)::float8 AS average_response_time_ms,
              COALESCE(SUM(tokens_used), 0)::bigint AS total_tokens,
              COALESCE(SUM(prompt_tokens), 0)::bigint AS prompt_tokens,
              COALESCE(SUM(completion_tokens), 0)::bigint AS completion_tokens
            FROM usage_metrics
            WHERE created_at >= $1 AND created_at <= $2
            "#,
            [start.into(), end.into()],
        );

        let row = AggregateRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| map_db_error("Failed to aggregate usage metrics", e))?;

        Ok(row.map(UsageAggregate::from).unwrap_or_default())
    }
}

#[derive(Debug, FromQueryResult)]
struct AggregateRow {
    total_requests: i64,
    cache_hit_rate: f64,
    total_cost_usd: f64,
    average_response_time_ms: f64,
    total_tokens: i64,
    prompt_tokens: i64,
    completion_tokens: i64,
}

impl From<AggregateRow> for UsageAggregate {
    fn from(row: AggregateRow) -> Self {
        UsageAggregate {
            total_requests: row.total_requests,
            cache_hit_rate: row.cache_hit_rate,
            total_cost_usd: row.total_cost_usd,
            average_response_time_ms: row.average_response_time_ms,
            token_usage: TokenTotals {
                total_tokens: row.total_tokens,
                prompt_tokens: row.prompt_tokens,
                completion_tokens: row.completion_tokens,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Duration;
    use sea_orm::{MockDatabase, Value};

    use super::*;

    fn row(total_requests: Value) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("total_requests", total_requests),
            ("cache_hit_rate", Value::Double(Some(0.5))),
            ("total_cost_usd", Value::Double(Some(0.04))),
            ("average_response_time_ms", Value::Double(Some(1200.0))),
            ("total_tokens", Value::BigInt(Some(3000))),
            ("prompt_tokens", Value::BigInt(Some(2000))),
            ("completion_tokens", Value::BigInt(Some(1000))),
        ])
    }

    fn repository(rows: Vec<BTreeMap<&'static str, Value>>) -> PostgresUsageMetricRepository {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        PostgresUsageMetricRepository::new(db)
    }

    #[tokio::test]
    async fn aggregate_reads_every_column() {
        let repository = repository(vec![row(Value::BigInt(Some(4)))]);
        let end = Utc::now();

        let aggregate = repository.aggregate(end - Duration::days(7), end).await.unwrap();

        assert_eq!(aggregate.total_requests, 4);
        assert_eq!(aggregate.cache_hit_rate, 0.5);
        assert_eq!(aggregate.average_response_time_ms, 1200.0);
        assert_eq!(aggregate.token_usage.prompt_tokens, 2000);
    }

    #[tokio::test]
    async fn aggregate_surfaces_undecodable_rows() {
        let repository = repository(vec![row(Value::String(Some(Box::new(
            "four".to_string(),
        ))))]);
        let end = Utc::now();

        let result = repository.aggregate(end - Duration::days(7), end).await;

        assert_eq!(result, Err(CoreError::InternalServerError));
    }
}
