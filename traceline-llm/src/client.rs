//! Chat completions client for an OpenAI-compatible endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::message::ChatMessage;
use crate::{Error, Result};

/// Optional generation parameters forwarded to the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    pub top_p: Option<f64>,
    /// Number of completions to request
    pub n: Option<u32>,
}

/// A chat completion request
///
/// The prompt is always delivered as a single trailing `user` message
/// appended to whatever history was supplied.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier sent to the endpoint
    pub model: String,
    /// Preceding conversation, if any
    pub history: Vec<ChatMessage>,
    /// The prompt for this call
    pub prompt: String,
    /// Generation parameters
    pub params: GenerationParams,
}

impl ChatRequest {
    /// Create a request with an empty history
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            history: Vec::new(),
            prompt: prompt.into(),
            params: GenerationParams::default(),
        }
    }

    /// Supply conversation history preceding the prompt
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.params.temperature = Some(temperature);
        self
    }

    /// Set the nucleus sampling threshold
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.params.top_p = Some(top_p);
        self
    }

    /// Set the number of completions to request
    pub fn with_choices(mut self, n: u32) -> Self {
        self.params.n = Some(n);
        self
    }

    /// Full message list: history plus the trailing user prompt
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(self.prompt.clone()));
        messages
    }
}

/// Wire body for the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Trait for chat completion backends
///
/// The pipeline talks to the model only through this trait, which keeps the
/// extraction and review paths testable with scripted responses.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send a completion request and return the first choice's content
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
///
/// No timeout or retry is applied; a transport or API failure surfaces as an
/// error for the caller to handle at its own boundary.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8000/v1`)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| Error::Endpoint(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// The completions URL this client posts to
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatApi for LlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = CompletionBody {
            model: &request.model,
            messages: request.messages(),
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            n: request.params.n,
        };

        debug!(
            model = %request.model,
            messages = body.messages.len(),
            "Sending completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Response(e.to_string()))?;

        let first = parsed.choices.into_iter().next().ok_or(Error::EmptyChoices)?;

        debug!(chars = first.message.content.len(), "Received completion");
        Ok(first.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn test_request_appends_trailing_user_message() {
        let request = ChatRequest::new("test-model", "the prompt")
            .with_history(vec![ChatMessage::system("context")]);

        let messages = request.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "the prompt");
    }

    #[test]
    fn test_request_without_history() {
        let request = ChatRequest::new("m", "hello");
        let messages = request.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    }

    #[test]
    fn test_body_omits_unset_params() {
        let request = ChatRequest::new("m", "p");
        let body = CompletionBody {
            model: &request.model,
            messages: request.messages(),
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            n: request.params.n,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("top_p").is_none());
        assert!(json.get("n").is_none());
    }

    #[test]
    fn test_body_includes_set_params() {
        let request = ChatRequest::new("m", "p")
            .with_temperature(0.2)
            .with_top_p(0.9)
            .with_choices(1);
        let body = CompletionBody {
            model: &request.model,
            messages: request.messages(),
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            n: request.params.n,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["temperature"], 0.2);
        assert_eq!(json["n"], 1);
    }

    #[test]
    fn test_parse_completion_response() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hello"}}
            ]
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "hello");
    }

    #[test]
    fn test_parse_response_without_choices() {
        let parsed: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        assert!(LlmClient::new("not a url", "key").is_err());
    }

    #[test]
    fn test_completions_url_joining() {
        let client = LlmClient::new("http://localhost:8000/v1/", "0").unwrap();
        assert_eq!(
            client.completions_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_client_debug_redacts_key() {
        let client = LlmClient::new("http://localhost:8000/v1", "secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
    }
}
