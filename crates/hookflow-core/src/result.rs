//! Convenience result type alias for hookflow.

use crate::error::AppError;

/// A specialized `Result` type for hookflow operations.
pub type AppResult<T> = Result<T, AppError>;
