use serde_json::Value;

use crate::application::http::server::api_entities::api_error::ApiError;

/// Splits a comma separated form value, dropping blank items.
pub fn parse_comma_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_user_profile(value: Option<&str>) -> Result<Option<Value>, ApiError> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(profile @ Value::Object(_)) => Ok(Some(profile)),
        Ok(_) => Err(ApiError::BadRequest(
            "user_profile must be a JSON object".to_string(),
        )),
        Err(_) => Err(ApiError::BadRequest(
            "Invalid JSON in user_profile".to_string(),
        )),
    }
}

/// Blank values fall back to the configured default.
pub fn parse_content_language(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|language| !language.is_empty())
        .map(|language| language.to_ascii_lowercase())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn comma_lists_are_trimmed() {
        assert_eq!(
            parse_comma_list(Some(" vegan, ,gluten_free ,")),
            vec!["vegan".to_string(), "gluten_free".to_string()]
        );
        assert!(parse_comma_list(Some("  ")).is_empty());
        assert!(parse_comma_list(None).is_empty());
    }

    #[test]
    fn user_profile_must_be_json_object() {
        assert_eq!(
            parse_user_profile(Some(r#"{"age": 34}"#)).unwrap(),
            Some(json!({"age": 34}))
        );
        assert_eq!(parse_user_profile(Some("")).unwrap(), None);
        assert_eq!(parse_user_profile(None).unwrap(), None);
        assert!(matches!(
            parse_user_profile(Some("{age: 34")),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            parse_user_profile(Some("[1, 2]")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn content_language_defaults() {
        assert_eq!(parse_content_language(None, "es"), "es");
        assert_eq!(parse_content_language(Some(" EN "), "es"), "en");
    }
}
