//! Gauge registry — last known status per label tuple.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use tcpcheck_core::TargetLabels;

/// Process-wide store of `tcp_endpoint_up` values.
///
/// Cheap to clone; all clones share the same map. Concurrent upserts
/// from probe tasks are serialized by the inner lock.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    gauges: Arc<RwLock<BTreeMap<TargetLabels, f64>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gauge for `labels` to 1.0 or 0.0, creating the series on
    /// first use.
    pub async fn set_up(&self, labels: &TargetLabels, up: bool) {
        let value = if up { 1.0 } else { 0.0 };
        let mut gauges = self.gauges.write().await;
        match gauges.get_mut(labels) {
            Some(current) => *current = value,
            None => {
                debug!(host = %labels.host, port = %labels.port, env = %labels.env, alias = %labels.alias, "new metric series");
                gauges.insert(labels.clone(), value);
            }
        }
    }

    pub async fn get(&self, labels: &TargetLabels) -> Option<f64> {
        self.gauges.read().await.get(labels).copied()
    }

    /// Number of distinct series observed so far.
    pub async fn len(&self) -> usize {
        self.gauges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.gauges.read().await.is_empty()
    }

    /// Copy of every series, ordered by labels.
    pub async fn snapshot(&self) -> Vec<(TargetLabels, f64)> {
        let gauges = self.gauges.read().await;
        gauges.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}
