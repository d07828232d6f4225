use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, ValidationError},
    message::{ChatRequest, ChatResponse},
    services::{metrics_manager::MetricsData, relay::relay_chat, upstream::CompletionClient},
    state::{AppState, SharedState},
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let (client, request) = match admit(&state, payload) {
        Ok(admitted) => admitted,
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "chat request rejected");
            state.metrics.record_rejected(err.kind()).await;
            return Err(err);
        }
    };

    let span = info_span!(
        "relay",
        request_id = %Uuid::new_v4(),
        messages = request.messages.len()
    );
    let response = relay_chat(client, &request.messages, &state.metrics)
        .instrument(span)
        .await;

    Ok(Json(response))
}

// Key check comes first: without a key nothing is relayed, whatever the body.
fn admit(
    state: &AppState,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(&dyn CompletionClient, ChatRequest), AppError> {
    let client = state.client.as_deref().ok_or(AppError::NotConfigured)?;
    let Json(request) =
        payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
    request.validate()?;
    Ok((client, request))
}

pub async fn get_metrics_handler(State(state): State<SharedState>) -> Json<MetricsData> {
    Json(state.metrics.get_metrics().await)
}
