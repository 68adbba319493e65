//! Dispatch engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Dispatch engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of asynchronous hooks running at the same time.
    #[serde(default = "default_async_concurrency")]
    pub async_concurrency: usize,
    /// How long `drain` waits for in-flight asynchronous hooks, in seconds.
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_seconds: u64,
    /// Hook invocations slower than this are logged at `warn`, in milliseconds.
    #[serde(default = "default_slow_hook_threshold")]
    pub slow_hook_threshold_ms: u64,
}

impl EngineConfig {
    /// Drain timeout as a [`Duration`].
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_seconds)
    }

    /// Slow-hook threshold as a [`Duration`].
    pub fn slow_hook_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_hook_threshold_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            async_concurrency: default_async_concurrency(),
            drain_timeout_seconds: default_drain_timeout(),
            slow_hook_threshold_ms: default_slow_hook_threshold(),
        }
    }
}

fn default_async_concurrency() -> usize {
    64
}

fn default_drain_timeout() -> u64 {
    5
}

fn default_slow_hook_threshold() -> u64 {
    500
}
