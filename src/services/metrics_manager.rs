use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Outcome counters. Fallbacks look like successes to the caller, so this
/// is where operators tell them apart.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MetricsData {
    pub relayed: u64,
    pub fallbacks: HashMap<String, u64>,
    pub rejected: HashMap<String, u64>,
}

#[derive(Debug, Clone)]
pub struct RelayMetrics {
    inner: Arc<RwLock<MetricsData>>,
}

impl Default for RelayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsData::default())),
        }
    }

    pub async fn record_relayed(&self) {
        self.inner.write().await.relayed += 1;
    }

    pub async fn record_fallback(&self, kind: &str) {
        let mut data = self.inner.write().await;
        *data.fallbacks.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub async fn record_rejected(&self, kind: &str) {
        let mut data = self.inner.write().await;
        *data.rejected.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub async fn get_metrics(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}
