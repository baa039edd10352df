//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! Every field is cheap to clone.

use crate::config::AppConfig;
use crate::repositories::Store;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage behind the analytics services
    pub store: Arc<dyn Store>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Prometheus render handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the store
    #[inline]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
