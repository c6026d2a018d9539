//! Application state.

use std::sync::Arc;

use catclip_analytics::PerformanceStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<PerformanceStore>,
}

impl AppState {
    /// Serve an existing store, typically the one a pipeline appends to.
    pub fn new(config: ApiConfig, store: Arc<PerformanceStore>) -> Self {
        Self { config, store }
    }

    /// Serve a fresh, empty store.
    pub fn with_empty_store(config: ApiConfig) -> Self {
        Self::new(config, Arc::new(PerformanceStore::new()))
    }
}
