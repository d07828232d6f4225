use portfolio_chat_relay::error::RelayError;
use portfolio_chat_relay::message::{ChatMessage, Role};
use portfolio_chat_relay::services::metrics_manager::RelayMetrics;
use portfolio_chat_relay::services::relay::{FALLBACK_MESSAGE, relay_chat};
use portfolio_chat_relay::services::upstream::{Completion, CompletionClient};

use async_trait::async_trait;
use serde_json::json;

struct Replies;

#[async_trait]
impl CompletionClient for Replies {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, RelayError> {
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(Completion {
            content: format!("echo: {last}"),
            usage: Some(json!({ "prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6 })),
        })
    }
}

struct AlwaysEmpty;

#[async_trait]
impl CompletionClient for AlwaysEmpty {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<Completion, RelayError> {
        Err(RelayError::EmptyReply)
    }
}

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::new(Role::System, "You answer questions about the site owner."),
        ChatMessage::new(Role::User, "What IoT work do you do?"),
    ]
}

#[tokio::test]
async fn test_success_keeps_usage_and_counts_relay() {
    let metrics = RelayMetrics::new();
    let resp = relay_chat(&Replies, &conversation(), &metrics).await;

    assert_eq!(resp.message, "echo: What IoT work do you do?");
    assert_eq!(resp.usage.unwrap()["total_tokens"], 6);

    let data = metrics.get_metrics().await;
    assert_eq!(data.relayed, 1);
    assert!(data.fallbacks.is_empty());
}

#[tokio::test]
async fn test_failure_returns_fallback_and_counts_kind() {
    let metrics = RelayMetrics::new();

    for _ in 0..2 {
        let resp = relay_chat(&AlwaysEmpty, &conversation(), &metrics).await;
        assert_eq!(resp.message, FALLBACK_MESSAGE);
        assert!(resp.usage.is_none());
    }

    let data = metrics.get_metrics().await;
    assert_eq!(data.relayed, 0);
    assert_eq!(data.fallbacks.get("empty_reply"), Some(&2));
}

#[test]
fn test_error_kinds_are_stable() {
    assert_eq!(RelayError::EmptyReply.kind(), "empty_reply");
    assert_eq!(
        RelayError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS).kind(),
        "upstream_status"
    );
    let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert_eq!(RelayError::from(decode).kind(), "decode");
}
