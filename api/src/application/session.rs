use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::SET_COOKIE},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Cookie, HeaderMapExt};
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";
pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

const SESSION_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Endpoints answered without `X-Response-Time`, relative to the root path.
const UNTIMED_ENDPOINTS: [&str; 3] = ["/health", "/health/ready", "/metrics"];

/// Documentation trees, matched on whole path segments.
const UNTIMED_TREES: [&str; 5] = ["/api-docs", "/swagger-ui", "/scalar", "/redoc", "/rapidoc"];

/// Paths the session middleware leaves untimed, resolved against the configured root path.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    untimed_endpoints: Arc<Vec<String>>,
    untimed_trees: Arc<Vec<String>>,
}

impl SessionSettings {
    pub fn new(root_path: &str) -> Self {
        let root = root_path.trim_end_matches('/');
        let resolve = |paths: &[&str]| -> Vec<String> {
            paths.iter().map(|path| format!("{root}{path}")).collect()
        };

        Self {
            untimed_endpoints: Arc::new(resolve(&UNTIMED_ENDPOINTS)),
            untimed_trees: Arc::new(resolve(&UNTIMED_TREES)),
        }
    }

    pub fn is_timed_path(&self, path: &str) -> bool {
        let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

        let endpoint = self.untimed_endpoints.iter().any(|untimed| untimed == path);
        let docs = self.untimed_trees.iter().any(|tree| {
            path.strip_prefix(tree.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        });

        !(endpoint || docs)
    }
}

/// Session resolved for the current request, available as an extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
}

pub fn build_session_cookie(session_id: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={session_id}; Max-Age={SESSION_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn is_https(req: &Request) -> bool {
    req.uri().scheme_str() == Some("https")
        || req
            .headers()
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

/// Resolves the caller session from the `session_id` cookie, issuing a new one when absent,
/// and stamps every response with `X-Response-Time`.
pub async fn session(
    State(settings): State<SessionSettings>,
    mut req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let timed = settings.is_timed_path(req.uri().path());
    let secure = is_https(&req);

    let existing = req
        .headers()
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(SESSION_COOKIE).map(str::to_string))
        .filter(|id| !id.is_empty());

    let (session_id, issued) = match existing {
        Some(id) => (id, false),
        None => {
            let id = Uuid::new_v4().to_string();
            debug!("issued new session {}", id);
            (id, true)
        }
    };

    req.extensions_mut().insert(SessionContext {
        session_id: session_id.clone(),
    });

    let mut response = next.run(req).await;

    if issued {
        match HeaderValue::from_str(&build_session_cookie(&session_id, secure)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("could not encode session cookie: {}", e),
        }
    }

    if timed {
        let elapsed_ms = started.elapsed().as_millis();
        if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms}ms")) {
            response.headers_mut().insert(RESPONSE_TIME_HEADER, value);
        }
    }

    response
}
