use std::{net::SocketAddr, num::NonZeroU32, sync::Arc};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;

use crate::{
    application::{
        auth::{API_KEY_HEADER, mask_api_key},
        http::server::api_entities::api_error::ApiError,
    },
    args::RateLimitArgs,
};

/// Per-client quotas for the analysis endpoint, one per minute and one per hour.
#[derive(Clone)]
pub struct AnalyzeRateLimit {
    enabled: bool,
    per_minute: Arc<DefaultKeyedRateLimiter<String>>,
    per_hour: Arc<DefaultKeyedRateLimiter<String>>,
    description: String,
}

impl AnalyzeRateLimit {
    pub fn new(args: &RateLimitArgs) -> Self {
        let per_minute = NonZeroU32::new(args.per_minute).unwrap_or(NonZeroU32::MIN);
        let per_hour = NonZeroU32::new(args.per_hour).unwrap_or(NonZeroU32::MIN);

        Self {
            enabled: args.enabled,
            per_minute: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
            per_hour: Arc::new(RateLimiter::keyed(Quota::per_hour(per_hour))),
            description: format!("{per_minute} per minute, {per_hour} per hour"),
        }
    }

    pub fn check(&self, client: &str) -> Result<(), ApiError> {
        if !self.enabled {
            return Ok(());
        }

        let key = client.to_string();
        if self.per_minute.check_key(&key).is_err() || self.per_hour.check_key(&key).is_err() {
            return Err(ApiError::TooManyRequests(format!(
                "Rate limit exceeded: {}",
                self.description
            )));
        }

        Ok(())
    }
}

/// Identifies the caller by API key, then by peer address.
fn client_key(req: &Request) -> String {
    if let Some(key) = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|key| !key.is_empty())
    {
        return format!("key:{key}");
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| format!("ip:{}", addr.ip()))
        .unwrap_or_else(|| "ip:unknown".to_string())
}

pub async fn rate_limit(
    State(limit): State<AnalyzeRateLimit>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(&req);

    if let Err(e) = limit.check(&client) {
        let shown = client
            .strip_prefix("key:")
            .map(mask_api_key)
            .unwrap_or_else(|| client.clone());
        warn!("rate limit exceeded for {}", shown);
        return Err(e);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::{HeaderName, HeaderValue, StatusCode},
        middleware,
        routing::post,
    };
    use axum_test::TestServer;

    use super::*;

    fn limit(enabled: bool, per_minute: u32, per_hour: u32) -> AnalyzeRateLimit {
        AnalyzeRateLimit::new(&RateLimitArgs {
            enabled,
            per_minute,
            per_hour,
        })
    }

    fn server(limit: AnalyzeRateLimit) -> TestServer {
        let app = Router::new()
            .route("/api/v1/ai/analyze", post(|| async { "analyzed" }))
            .layer(middleware::from_fn_with_state(limit, rate_limit));

        TestServer::new(app).unwrap()
    }

    #[test]
    fn minute_quota_is_per_client() {
        let limit = limit(true, 2, 160);

        assert!(limit.check("key:a").is_ok());
        assert!(limit.check("key:a").is_ok());
        assert!(matches!(
            limit.check("key:a"),
            Err(ApiError::TooManyRequests(msg)) if msg.contains("2 per minute")
        ));
        assert!(limit.check("key:b").is_ok());
    }

    #[test]
    fn hour_quota_applies_below_minute_quota() {
        let limit = limit(true, 20, 1);

        assert!(limit.check("ip:10.0.0.1").is_ok());
        assert!(limit.check("ip:10.0.0.1").is_err());
    }

    #[test]
    fn disabled_limit_lets_everything_through() {
        let limit = limit(false, 1, 1);

        for _ in 0..5 {
            assert!(limit.check("key:a").is_ok());
        }
    }

    #[test]
    fn zero_quota_still_allows_one_request() {
        let limit = limit(true, 0, 0);

        assert!(limit.check("key:a").is_ok());
        assert!(limit.check("key:a").is_err());
    }

    #[tokio::test]
    async fn rejects_with_429_once_the_key_is_exhausted() {
        let server = server(limit(true, 1, 160));
        let first_key = HeaderValue::from_static("nutrilens_sk_first_client_key_01");
        let other_key = HeaderValue::from_static("nutrilens_sk_other_client_key_02");
        let api_key = HeaderName::from_static(API_KEY_HEADER);

        let first = server
            .post("/api/v1/ai/analyze")
            .add_header(api_key.clone(), first_key.clone())
            .await;
        let second = server
            .post("/api/v1/ai/analyze")
            .add_header(api_key.clone(), first_key)
            .await;
        let other = server
            .post("/api/v1/ai/analyze")
            .add_header(api_key, other_key)
            .await;

        first.assert_status_ok();
        second.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert!(second.text().contains("E_TOO_MANY_REQUESTS"));
        other.assert_status_ok();
    }

    #[tokio::test]
    async fn requests_without_key_share_the_address_bucket() {
        let server = server(limit(true, 1, 160));

        server.post("/api/v1/ai/analyze").await.assert_status_ok();
        server
            .post("/api/v1/ai/analyze")
            .await
            .assert_status(StatusCode::TOO_MANY_REQUESTS);
    }
}
