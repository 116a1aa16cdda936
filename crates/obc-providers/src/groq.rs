//! Groq backend (OpenAI-compatible chat completions API)
//!
//! Implements both [`StructuredModel`] and [`Generator`] over the same
//! endpoint. Structured calls request a JSON-object response format and
//! leniently pull the first JSON object out of the completion before
//! falling back to raw text.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    Generator, StructuredModel,
    error::{Error, Result},
    types::{RecordShape, StructuredResponse, first_json_object},
};

/// Default model id
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Bounded wait for every provider call; expiry is treated the same as any
/// other provider failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Groq API client
pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqProvider {
    /// Create a new Groq provider with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create from environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| Error::InvalidApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Override the model id
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the base URL (local gateways, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run one completion and return the assistant text
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_str(), text));
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::UnexpectedResponse("completion had no choices".to_string()))
    }
}

#[async_trait]
impl StructuredModel for GroqProvider {
    async fn invoke(
        &self,
        instruction: &str,
        input: &str,
        shape: &RecordShape,
    ) -> Result<StructuredResponse> {
        let system = format!(
            "{}\n\nRespond with a single {} JSON object containing exactly these string fields: {}.",
            instruction,
            shape.name,
            shape.fields.join(", ")
        );
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: input.to_string() },
            ],
            response_format: Some(ResponseFormat { format_type: "json_object" }),
        };

        let content = self.complete(&request).await?;
        Ok(parse_structured(&content))
    }
}

#[async_trait]
impl Generator for GroqProvider {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: system.to_string() },
                ChatMessage { role: "user", content: user.to_string() },
            ],
            response_format: None,
        };
        self.complete(&request).await
    }
}

/// Parse a completion into a record if it contains a JSON object, otherwise
/// hand back the raw text for the caller to interpret.
fn parse_structured(content: &str) -> StructuredResponse {
    if let Some(object) = first_json_object(content) {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(object) {
            return StructuredResponse::Record(map);
        }
    }
    StructuredResponse::Text(content.to_string())
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_record() {
        let parsed = parse_structured(r#"{"query_type": "legal_query"}"#);
        match parsed {
            StructuredResponse::Record(map) => {
                assert_eq!(map["query_type"], "legal_query");
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_structured_record_with_prose() {
        let parsed = parse_structured(
            r#"Sure, here is the extraction: {"project_type": "deck", "city": "Austin", "geo_state": "TX"}"#,
        );
        match parsed {
            StructuredResponse::Record(map) => {
                assert_eq!(map["city"], "Austin");
                assert_eq!(map.len(), 3);
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_structured_plain_text() {
        let parsed = parse_structured("legal_query");
        assert_eq!(parsed, StructuredResponse::Text("legal_query".to_string()));
    }

    #[test]
    fn test_parse_structured_malformed_json_falls_back_to_text() {
        let content = r#"{"city": "Austin", oops}"#;
        let parsed = parse_structured(content);
        assert_eq!(parsed, StructuredResponse::Text(content.to_string()));
    }

    #[test]
    fn test_request_omits_response_format_when_none() {
        let request = ChatRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage { role: "user", content: "hi".to_string() }],
            response_format: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("response_format"), "got: {}", json);
    }

    #[test]
    fn test_request_serializes_json_object_format() {
        let request = ChatRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![],
            response_format: Some(ResponseFormat { format_type: "json_object" }),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""response_format":{"type":"json_object"}"#), "got: {}", json);
    }
}
