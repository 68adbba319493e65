//! Order service configuration.

use serde::{Deserialize, Serialize};

/// Settings for the order service hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Orders with an amount above this are rejected by the risk check.
    #[serde(default = "default_risk_limit")]
    pub risk_limit: i64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            risk_limit: default_risk_limit(),
        }
    }
}

fn default_risk_limit() -> i64 {
    10_000
}
