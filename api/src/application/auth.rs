use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::http::server::{api_entities::api_error::ApiError, app_state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

const MIN_API_KEY_LENGTH: usize = 30;

/// Shortens a key for log lines: first 8 characters, `****`, last 4.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

pub fn has_valid_format(key: &str, prefix: &str) -> bool {
    key.starts_with(prefix) && key.chars().count() >= MIN_API_KEY_LENGTH
}

/// Compares SHA-256 digests so the time taken does not depend on where the keys differ.
fn digests_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

pub fn verify_api_key(provided: Option<&str>, expected: &str, prefix: &str) -> Result<(), ApiError> {
    let provided = provided
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ApiError::Forbidden("Missing API key".to_string()))?;

    if !has_valid_format(provided, prefix) {
        warn!("rejected API key with invalid format: {}", mask_api_key(provided));
        return Err(ApiError::Forbidden("Invalid API key".to_string()));
    }

    if !digests_match(provided, expected) {
        warn!("rejected unknown API key: {}", mask_api_key(provided));
        return Err(ApiError::Forbidden("Invalid API key".to_string()));
    }

    Ok(())
}

/// Rejects requests without a valid `X-API-Key` header with 403.
pub async fn auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    verify_api_key(
        provided,
        &state.args.auth.api_key,
        &state.args.auth.api_key_prefix,
    )?;

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "nutrilens_sk_";
    const KEY: &str = "nutrilens_sk_0123456789abcdefghij";

    #[test]
    fn masks_long_keys() {
        assert_eq!(mask_api_key(KEY), "nutrilen****ghij");
    }

    #[test]
    fn masks_short_keys_entirely() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("exactly12chr"), "****");
    }

    #[test]
    fn format_requires_prefix_and_length() {
        assert!(has_valid_format(KEY, PREFIX));
        assert!(!has_valid_format("other_sk_0123456789abcdefghijklmn", PREFIX));
        assert!(!has_valid_format("nutrilens_sk_short", PREFIX));
    }

    #[test]
    fn accepts_matching_key() {
        assert!(verify_api_key(Some(KEY), KEY, PREFIX).is_ok());
    }

    #[test]
    fn rejects_missing_or_wrong_key() {
        assert_eq!(
            verify_api_key(None, KEY, PREFIX),
            Err(ApiError::Forbidden("Missing API key".to_string()))
        );
        assert_eq!(
            verify_api_key(Some(""), KEY, PREFIX),
            Err(ApiError::Forbidden("Missing API key".to_string()))
        );

        let wrong = "nutrilens_sk_9999999999999999999999";
        assert_eq!(
            verify_api_key(Some(wrong), KEY, PREFIX),
            Err(ApiError::Forbidden("Invalid API key".to_string()))
        );
    }
}
