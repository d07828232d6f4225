// src/services/upstream.rs
//! OpenAI-compatible completion client. The relay only ever talks to the
//! upstream through [`CompletionClient`], so tests can swap in a fake.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{config::RelayConfig, error::RelayError, message::ChatMessage};

pub const MODEL: &str = "openai/gpt-4o-mini";
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;
pub const PRESENCE_PENALTY: f32 = 0.1;
pub const FREQUENCY_PENALTY: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<Value>,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, RelayError>;
}

/// Outbound body. Sampling parameters are fixed; only `messages` varies.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'static str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    pub temperature: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub stream: bool,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            model: MODEL,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Takes `choices[0].message.content`; anything missing or blank is a failure,
    /// since a blank reply would be rejected when the widget sends it back.
    pub fn into_completion(self) -> Result<Completion, RelayError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(RelayError::EmptyReply)?;

        Ok(Completion { content, usage: self.usage })
    }
}

#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    site_url: String,
    app_title: String,
}

impl Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("endpoint", &self.endpoint)
            .field("site_url", &self.site_url)
            .finish()
    }
}

impl OpenRouterClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, config: &RelayConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: format!("{}/chat/completions", config.base_url),
            site_url: config.site_url.clone(),
            app_title: config.app_title.clone(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &RelayConfig) -> Option<Self> {
        let key = config.api_key.as_deref()?;
        Some(Self::new(reqwest::Client::new(), key, config))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, RelayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.app_title)
            .json(&CompletionRequest::new(messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: CompletionResponse = serde_json::from_slice(&body)?;
        parsed.into_completion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use serde_json::json;

    fn parse(body: Value) -> Result<Completion, RelayError> {
        serde_json::from_value::<CompletionResponse>(body).unwrap().into_completion()
    }

    #[test]
    fn request_body_carries_fixed_parameters() {
        let messages = vec![ChatMessage::new(Role::User, "hello")];
        let body = serde_json::to_value(CompletionRequest::new(&messages)).unwrap();

        assert_eq!(body["model"], MODEL);
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"], json!([{ "role": "user", "content": "hello" }]));
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_choice_and_usage() {
        let completion = parse(json!({
            "choices": [{ "message": { "content": "Hello" } }],
            "usage": { "total_tokens": 10 }
        }))
        .unwrap();
        assert_eq!(completion.content, "Hello");
        assert_eq!(completion.usage, Some(json!({ "total_tokens": 10 })));
    }

    #[test]
    fn missing_or_blank_content_is_empty_reply() {
        for body in [
            json!({ "choices": [] }),
            json!({ "choices": [{ "message": { "content": "" } }] }),
            json!({ "choices": [{ "message": { "content": null } }] }),
            json!({ "choices": [{}] }),
            json!({ "choices": [{ "message": { "content": "  \n " } }] }),
        ] {
            assert!(matches!(parse(body), Err(RelayError::EmptyReply)));
        }
    }

    #[test]
    fn no_client_without_key() {
        let cfg = RelayConfig::from_lookup(|_| None).unwrap();
        assert!(OpenRouterClient::from_config(&cfg).is_none());
    }

    #[test]
    fn endpoint_joins_base_url() {
        let cfg = RelayConfig::from_lookup(|key| match key {
            "OPENROUTER_API_KEY" => Some("k".to_string()),
            _ => None,
        })
        .unwrap();
        let client = OpenRouterClient::from_config(&cfg).unwrap();
        assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
        assert!(!format!("{client:?}").contains("\"k\""));
    }
}
