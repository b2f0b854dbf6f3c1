use serde_json::{json, Value};
use shared::ShapeType;

use super::{AiError, GenerateFuture, SuggestionBackend};
use crate::state::settings::{api_key_from_env, AiSettings};

/// Generative language REST backend
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Backend configured from settings with the key from the environment
    pub fn from_settings(settings: &AiSettings) -> Result<Self, AiError> {
        let api_key = api_key_from_env().ok_or(AiError::MissingApiKey)?;
        Ok(Self::new(api_key, &settings.model, &settings.endpoint))
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn request(&self, instruction: &str) -> Result<String, AiError> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request_body(instruction))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        extract_text(&body).ok_or(AiError::EmptyResponse)
    }
}

impl SuggestionBackend for GeminiBackend {
    fn generate<'a>(&'a self, instruction: &'a str) -> GenerateFuture<'a> {
        Box::pin(self.request(instruction))
    }
}

/// JSON schema the reply must follow: an array of shape records with
/// every field required
pub fn response_schema() -> Value {
    let kinds: Vec<&str> = ShapeType::AI_KINDS.iter().map(ShapeType::as_str).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "enum": kinds },
                "position": {
                    "type": "ARRAY",
                    "items": { "type": "NUMBER" },
                    "description": "Array of [x, y, z]"
                },
                "scale": {
                    "type": "ARRAY",
                    "items": { "type": "NUMBER" },
                    "description": "Array of [x, y, z]"
                },
                "color": { "type": "STRING" },
                "name": { "type": "STRING" }
            },
            "required": ["type", "position", "scale", "color", "name"]
        }
    })
}

pub fn build_request_body(instruction: &str) -> Value {
    json!({
        "contents": [
            { "parts": [ { "text": instruction } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Concatenated text parts of the first candidate
fn extract_text(body: &Value) -> Option<String> {
    let parts = body["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .and_then(|c| c["content"]["parts"].as_array())?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = build_request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");

        let schema = &body["generationConfig"]["responseSchema"];
        assert_eq!(schema["type"], "ARRAY");
        let kinds = schema["items"]["properties"]["type"]["enum"].as_array().unwrap();
        assert_eq!(kinds.len(), 9);
        assert!(kinds.contains(&json!("torusKnot")));
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_url() {
        let backend = GeminiBackend::new("k", "m", "https://example.test/v1beta/");
        assert_eq!(backend.url(), "https://example.test/v1beta/models/m:generateContent");
    }

    #[test]
    fn test_extract_text() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "[" }, { "text": "]" }] } }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("[]"));
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        assert_eq!(extract_text(&json!({})), None);
    }
}
