// src/services/relay.rs
use tracing::{debug, error};

use super::{metrics_manager::RelayMetrics, upstream::CompletionClient};
use crate::message::{ChatMessage, ChatResponse};

/// Served whenever the upstream call fails, for any reason.
pub const FALLBACK_MESSAGE: &str = "Hi! I'm Abdul Wahab's AI Assistant! 🤖 While I'm having technical difficulties, I'd love to help you learn about Abdul's expertise in AI agent development and IoT solutions. Abdul specializes in:\n\n🔹 AI Agents with LangChain, LangGraph, CrewAI\n🔹 IoT Solutions with ESP32, MQTT, LoRaWAN\n🔹 Automation with N8N, Make.com, Zapier\n🔹 Full-stack development with Next.js, React\n\nFeel free to contact Abdul directly:\n📧 abdulwahabawan82@gmail.com\n📱 WhatsApp: +92 321 942 4726\n\nWhat specific project can Abdul help you with? 🚀";

pub fn fallback_response() -> ChatResponse {
    ChatResponse {
        message: FALLBACK_MESSAGE.to_string(),
        usage: None,
    }
}

/// One upstream attempt. Never fails: upstream errors become the fallback reply.
pub async fn relay_chat(
    client: &dyn CompletionClient,
    messages: &[ChatMessage],
    metrics: &RelayMetrics,
) -> ChatResponse {
    match client.complete(messages).await {
        Ok(completion) => {
            debug!(reply_len = completion.content.len(), "upstream reply relayed");
            metrics.record_relayed().await;
            ChatResponse {
                message: completion.content,
                usage: completion.usage,
            }
        }
        Err(err) => {
            error!(kind = err.kind(), error = %err, "upstream relay failed, serving fallback");
            metrics.record_fallback(err.kind()).await;
            fallback_response()
        }
    }
}
