use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePromptValidator {
    #[validate(length(min = 1, max = 50, message = "version must be between 1 and 50 characters"))]
    pub version: String,

    #[validate(length(min = 2, max = 10, message = "language must be between 2 and 10 characters"))]
    pub language: String,

    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,

    /// Makes this the only active version of its language.
    #[serde(default)]
    pub activate: bool,
}

#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LanguageParams {
    /// Language code, e.g. `es` or `en`.
    pub language: Option<String>,
}

impl LanguageParams {
    pub fn language_or(&self, default: &str) -> String {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_content() {
        let payload = CreatePromptValidator {
            version: "v2.0".to_string(),
            language: "es".to_string(),
            content: String::new(),
            activate: false,
        };

        assert!(payload.validate().is_err());
    }

    #[test]
    fn activate_defaults_to_false() {
        let payload: CreatePromptValidator =
            serde_json::from_str(r#"{"version": "v2.0", "language": "en", "content": "Analyze"}"#)
                .unwrap();

        assert!(!payload.activate);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn language_falls_back_when_blank() {
        assert_eq!(LanguageParams { language: None }.language_or("es"), "es");
        assert_eq!(
            LanguageParams { language: Some(" ".to_string()) }.language_or("es"),
            "es"
        );
        assert_eq!(
            LanguageParams { language: Some("en".to_string()) }.language_or("es"),
            "en"
        );
    }
}
