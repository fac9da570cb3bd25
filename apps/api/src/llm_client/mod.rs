//! LLM Client: the single point of entry for chat completion calls.
//!
//! Talks to an OpenAI-compatible `/v1/chat/completions` endpoint.
//! Model and temperature are fixed; only the base URL is configurable.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// The model used for all completion calls.
pub const MODEL: &str = "gpt-4o-mini";
/// High temperature favors variety across generated quotes.
pub const TEMPERATURE: f64 = 0.9;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Seam between the generate handler and the hosted completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one system + user exchange and returns the raw assistant text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

/// Token counts are informational only; providers may omit any of them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice, or an empty string when the provider sent none.
    pub fn text(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat completions client. Cheap to clone; the inner reqwest client is shared.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Makes a single call to the chat completions API. No retries.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        Ok(response.text().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_text_takes_first_choice() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "[\"One\"]" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text(), "[\"One\"]");
    }

    #[test]
    fn test_text_is_empty_without_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert_eq!(response.text(), "");

        let response: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.text(), "");

        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "finish_reason": "length" }]
        }))
        .unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_partial_usage_is_tolerated() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "[\"Hi\"]" } }],
            "usage": { "total_tokens": 7 }
        }))
        .unwrap();
        assert_eq!(response.text(), "[\"Hi\"]");
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 0);
        assert_eq!(usage.completion_tokens, 0);
    }

    #[tokio::test]
    async fn test_complete_with_partial_usage_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": "[\"Congrats!\"]" } }],
                    "usage": { "total_tokens": 7 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = LlmClient::new("k".to_string(), server.url()).unwrap();
        let text = client.complete("sys", "hello").await.unwrap();
        assert_eq!(text, "[\"Congrats!\"]");
    }

    #[tokio::test]
    async fn test_complete_sends_fixed_model_and_temperature() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "temperature": 0.9,
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": "[\"Cheers!\"]" } }],
                    "usage": { "prompt_tokens": 12, "completion_tokens": 4 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = LlmClient::new("test-key".to_string(), server.url()).unwrap();
        let text = client.complete("sys", "hello").await.unwrap();

        assert_eq!(text, "[\"Cheers!\"]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_message_is_extracted() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let client = LlmClient::new("bad".to_string(), format!("{}/", server.url())).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = LlmClient::new("k".to_string(), server.url()).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();

        assert!(err.to_string().contains("status 503"));
        assert!(err.to_string().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = LlmClient::new("k".to_string(), server.url()).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
