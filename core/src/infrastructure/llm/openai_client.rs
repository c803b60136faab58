use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::domain::{
    common::LLMConfig,
    llm::{
        entities::{LlmError, LlmReply, LlmRequest, TokenUsage},
        ports::LLMClient,
    },
};

/// Client for the OpenAI Responses API.
#[derive(Debug, Clone)]
pub struct OpenAILLMClient {
    api_key: String,
    model_name: String,
    base_url: String,
    max_output_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: Vec<InputMessage>,
    max_output_tokens: u32,
    text: TextOptions,
}

#[derive(Debug, Serialize)]
struct InputMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    InputText { text: String },
    InputImage { image_url: String },
}

#[derive(Debug, Serialize)]
struct TextOptions {
    format: TextFormat,
}

#[derive(Debug, Serialize)]
struct TextFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    usage: Option<ResponsesUsage>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ResponsesUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl ResponsesResponse {
    /// Concatenated `output_text` parts of every message item.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
            .collect()
    }
}

fn classify_status(status: StatusCode, body: String) -> LlmError {
    let reason = format!("LLM API returned error: {} - {}", status, body);
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        LlmError::Transient(reason)
    } else {
        LlmError::Rejected(reason)
    }
}

impl OpenAILLMClient {
    pub fn new(config: &LLMConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            model_name: config.openai_model.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            max_output_tokens: config.max_output_tokens,
            client: Client::new(),
        }
    }

    fn build_request(&self, request: LlmRequest) -> ResponsesRequest {
        let mut user_content = vec![ContentPart::InputText {
            text: request.user_prompt,
        }];
        user_content.extend(request.images.iter().map(|image| ContentPart::InputImage {
            image_url: image.data_url(),
        }));

        ResponsesRequest {
            model: self.model_name.clone(),
            input: vec![
                InputMessage {
                    role: "system",
                    content: vec![ContentPart::InputText {
                        text: request.system_prompt,
                    }],
                },
                InputMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            max_output_tokens: self.max_output_tokens,
            text: TextOptions {
                format: TextFormat {
                    kind: "json_object",
                },
            },
        }
    }
}

impl LLMClient for OpenAILLMClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmReply, LlmError> {
        let url = format!("{}/responses", self.base_url);
        let images = request.images.len();
        let body = self.build_request(request);

        info!(
            "Calling OpenAI API with model {} and {} image(s)",
            self.model_name, images
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI API request failed: {}", e);
                LlmError::Transient(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error: {} - {}", status, error_text);
            return Err(classify_status(status, error_text));
        }

        let parsed: ResponsesResponse = response.json().await.map_err(|e| {
            error!("Failed to parse OpenAI response: {}", e);
            LlmError::Rejected(format!("Failed to parse LLM response: {}", e))
        })?;

        let text = parsed.output_text();
        let usage = parsed
            .usage
            .as_ref()
            .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens))
            .unwrap_or_default();
        debug!(
            "OpenAI response: {} characters, {} tokens",
            text.len(),
            usage.total_tokens
        );

        // Priced by the configured name; the API echoes dated snapshots.
        Ok(LlmReply {
            text,
            usage,
            model: self.model_name.clone(),
        })
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::image::{ImageMediaType, NormalizedImage};

    fn client() -> OpenAILLMClient {
        OpenAILLMClient::new(&LLMConfig {
            openai_api_key: "sk-test".to_string(),
            openai_model: "gpt-4o".to_string(),
            openai_base_url: "https://api.openai.com/v1/".to_string(),
            max_output_tokens: 4000,
            request_timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
        })
    }

    #[test]
    fn request_carries_prompt_images_and_json_format() {
        let image = NormalizedImage::from_bytes("a.png".into(), ImageMediaType::Png, b"png");
        let body = client().build_request(LlmRequest {
            system_prompt: "system".into(),
            user_prompt: "user".into(),
            images: vec![image.clone()],
        });

        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["text"], json!({"format": {"type": "json_object"}}));
        assert_eq!(value["input"][0]["role"], "system");
        assert_eq!(
            value["input"][1]["content"][0],
            json!({"type": "input_text", "text": "user"})
        );
        assert_eq!(
            value["input"][1]["content"][1],
            json!({"type": "input_image", "image_url": image.data_url()})
        );
    }

    #[test]
    fn output_text_joins_message_parts() {
        let response: ResponsesResponse = serde_json::from_value(json!({
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "{\"a\":"},
                    {"type": "output_text", "text": " 1}"}
                ]}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5, "total_tokens": 15}
        }))
        .unwrap();

        assert_eq!(response.output_text(), "{\"a\": 1}");
    }

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            LlmError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, String::new()),
            LlmError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            LlmError::Rejected(_)
        ));
    }
}
