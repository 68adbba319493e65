//! Shared test helpers for integration tests.

use std::sync::Arc;

use hookflow::OrderService;
use hookflow_core::config::AppConfig;
use hookflow_engine::MetricsCollector;

/// Test application context
pub struct TestApp {
    /// Order service under test
    pub service: OrderService,
    /// Per-hook statistics recorded by the engine
    pub metrics: Arc<MetricsCollector>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Create a new test application with the given configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let metrics = Arc::new(MetricsCollector::new());
        let service = OrderService::with_observer(&config, metrics.clone()).await;

        Self {
            service,
            metrics,
            config,
        }
    }

    /// Wait for async hooks and fail the test if they hang
    pub async fn drain(&self) {
        assert!(
            self.service.shutdown().await,
            "async hooks did not finish within {:?}",
            self.config.engine.drain_timeout()
        );
    }
}
