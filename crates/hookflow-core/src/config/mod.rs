//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default, so an absent file is a
//! valid configuration.

pub mod engine;
pub mod logging;
pub mod order;

use serde::{Deserialize, Serialize};

pub use self::engine::EngineConfig;
pub use self::logging::LoggingConfig;
pub use self::order::OrderConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay + `HOOKFLOW__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dispatch engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Order service settings.
    #[serde(default)]
    pub order: OrderConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default` with an environment-specific overlay and
    /// environment variables prefixed with `HOOKFLOW__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("HOOKFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.engine.async_concurrency, 64);
        assert_eq!(config.engine.drain_timeout_seconds, 5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.order.risk_limit, 10_000);
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"engine":{"async_concurrency":2}}"#)
            .expect("partial config should deserialize");
        assert_eq!(config.engine.async_concurrency, 2);
        assert_eq!(config.engine.slow_hook_threshold_ms, 500);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_without_files() {
        let config = AppConfig::load("does-not-exist").expect("missing files are optional");
        assert!(config.engine.async_concurrency > 0);
    }
}
