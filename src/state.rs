// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::metrics_manager::RelayMetrics;
use crate::services::upstream::{CompletionClient, OpenRouterClient};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: RelayConfig,
    /// `None` when no upstream key is configured.
    pub client: Option<Arc<dyn CompletionClient>>,
    pub metrics: RelayMetrics,
}

impl AppState {
    pub fn from_config(config: RelayConfig) -> Self {
        let client = OpenRouterClient::from_config(&config)
            .map(|c| Arc::new(c) as Arc<dyn CompletionClient>);
        Self {
            config,
            client,
            metrics: RelayMetrics::new(),
        }
    }

    pub fn with_client(config: RelayConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            config,
            client: Some(client),
            metrics: RelayMetrics::new(),
        }
    }
}
