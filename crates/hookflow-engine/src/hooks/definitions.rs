//! Phase, execution mode and hook descriptor definitions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::error::HookError;

/// Execution phase a hook is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Runs before the main operation. Usually gates it.
    Before,
    /// Runs after the main operation. Usually best-effort.
    After,
    /// Any other caller-defined stage.
    Named(String),
}

impl Phase {
    /// Creates a caller-defined phase.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the string name of this phase.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the engine runs a hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookMode {
    /// Awaited in-line on the caller's task.
    #[default]
    Sync,
    /// Submitted to the worker pool; never blocks the caller.
    Async,
}

impl fmt::Display for HookMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => write!(f, "sync"),
            Self::Async => write!(f, "async"),
        }
    }
}

/// Callback invoked by the engine.
///
/// The payload is shared by every hook of a phase run, including hooks
/// still running on the worker pool after `execute` returned, so any
/// mutation has to go through interior mutability on `P`.
#[async_trait]
pub trait HookHandler<P: Send + Sync + 'static>: Send + Sync {
    /// Runs the hook against the payload.
    async fn call(&self, ctx: ExecutionContext, payload: Arc<P>) -> Result<(), HookError>;
}

/// Adapter turning an async closure into a [`HookHandler`].
struct FnHook<F> {
    f: F,
}

#[async_trait]
impl<P, F, Fut> HookHandler<P> for FnHook<F>
where
    P: Send + Sync + 'static,
    F: Fn(ExecutionContext, Arc<P>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    async fn call(&self, ctx: ExecutionContext, payload: Arc<P>) -> Result<(), HookError> {
        (self.f)(ctx, payload).await
    }
}

/// Wraps an async closure as a shareable hook handler.
pub fn hook_fn<P, F, Fut>(f: F) -> Arc<dyn HookHandler<P>>
where
    P: Send + Sync + 'static,
    F: Fn(ExecutionContext, Arc<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    Arc::new(FnHook { f })
}

/// Immutable description of one registered hook.
///
/// No validation happens here: empty or duplicate names and any priority
/// value are accepted.
pub struct HookDescriptor<P: Send + Sync + 'static> {
    name: String,
    priority: i32,
    must_succeed: bool,
    mode: HookMode,
    handler: Arc<dyn HookHandler<P>>,
}

impl<P: Send + Sync + 'static> HookDescriptor<P> {
    /// Creates a synchronous, non-critical hook with priority 0.
    pub fn new(name: impl Into<String>, handler: Arc<dyn HookHandler<P>>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            must_succeed: false,
            mode: HookMode::Sync,
            handler,
        }
    }

    /// Creates a descriptor from an async closure.
    pub fn from_fn<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ExecutionContext, Arc<P>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        Self::new(name, hook_fn(f))
    }

    /// Sets the priority (higher = runs earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets whether a synchronous failure aborts the phase.
    pub fn must_succeed(mut self, must_succeed: bool) -> Self {
        self.must_succeed = must_succeed;
        self
    }

    /// Sets the execution mode.
    pub fn with_mode(mut self, mode: HookMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `with_mode(HookMode::Async)`.
    pub fn asynchronous(self) -> Self {
        self.with_mode(HookMode::Async)
    }

    /// Returns the hook name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns whether a failure of this hook is critical.
    pub fn is_must_succeed(&self) -> bool {
        self.must_succeed
    }

    /// Returns the execution mode.
    pub fn mode(&self) -> HookMode {
        self.mode
    }

    /// Returns the callback.
    pub fn handler(&self) -> &Arc<dyn HookHandler<P>> {
        &self.handler
    }
}

impl<P: Send + Sync + 'static> Clone for HookDescriptor<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            priority: self.priority,
            must_succeed: self.must_succeed,
            mode: self.mode,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<P: Send + Sync + 'static> fmt::Debug for HookDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDescriptor")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("must_succeed", &self.must_succeed)
            .field("mode", &self.mode)
            .finish()
    }
}
