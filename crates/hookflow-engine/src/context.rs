//! Execution context handed to every hook invocation.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Cancellable context for one unit of work.
///
/// The engine never cancels anything itself; callbacks may observe the
/// token to stop early when the caller gives up.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Cancellation signal owned by the caller.
    token: CancellationToken,
    /// Correlation id for log lines emitted by hooks.
    request_id: Uuid,
}

impl ExecutionContext {
    /// Creates a context with a fresh token and request id.
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Creates a context bound to an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            request_id: Uuid::now_v7(),
        }
    }

    /// Derives a context whose token is cancelled together with this one.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            request_id: self.request_id,
        }
    }

    /// Returns the request id.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits until cancellation is requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
