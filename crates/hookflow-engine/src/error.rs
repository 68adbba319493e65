//! Hook and dispatch error types.

use hookflow_core::error::{AppError, ErrorKind};

use crate::hooks::definitions::Phase;

/// Failure produced by a single hook invocation.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The callback reported a failure.
    #[error("{0}")]
    Failed(String),

    /// The callback stopped because its context was cancelled.
    #[error("hook cancelled")]
    Cancelled,

    /// The callback panicked; the panic was caught at the hook boundary.
    #[error("hook panicked: {0}")]
    Panicked(String),

    /// Any other error bubbled up from the callback.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    /// Creates a [`HookError::Failed`] from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Returns whether this failure was a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

/// Error returned by a phase run that was aborted.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A synchronous `must_succeed` hook failed.
    #[error("critical hook failed [{hook}]: {source}")]
    CriticalHookFailed {
        /// Name of the failing hook.
        hook: String,
        /// Phase that was aborted.
        phase: Phase,
        /// Underlying failure.
        #[source]
        source: HookError,
    },
}

impl DispatchError {
    /// Name of the hook that aborted the phase.
    pub fn hook_name(&self) -> &str {
        match self {
            Self::CriticalHookFailed { hook, .. } => hook,
        }
    }

    /// Phase that was aborted.
    pub fn phase(&self) -> &Phase {
        match self {
            Self::CriticalHookFailed { phase, .. } => phase,
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        AppError::with_source(ErrorKind::Rejected, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_dispatch_error_names_hook_and_cause() {
        let err = DispatchError::CriticalHookFailed {
            hook: "RiskCheck".to_string(),
            phase: Phase::Before,
            source: HookError::failed("risk rejected"),
        };
        assert_eq!(err.to_string(), "critical hook failed [RiskCheck]: risk rejected");
        assert_eq!(err.hook_name(), "RiskCheck");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("risk rejected"));
    }

    #[test]
    fn test_maps_to_rejected_app_error() {
        let err = DispatchError::CriticalHookFailed {
            hook: "Gate".to_string(),
            phase: Phase::named("validate"),
            source: HookError::Panicked("boom".to_string()),
        };
        let app: AppError = err.into();
        assert!(app.is_rejection());
        assert!(app.message.contains("[Gate]"));
        assert!(app.message.contains("hook panicked: boom"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: HookError = anyhow::anyhow!("downstream unavailable").into();
        assert_eq!(err.to_string(), "downstream unavailable");
        assert!(!err.is_panic());
    }
}
