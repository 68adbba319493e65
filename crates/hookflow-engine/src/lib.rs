//! # hookflow-engine
//!
//! Priority-ordered extension-point dispatcher. Provides:
//!
//! - Hook descriptors (name, priority, failure policy, execution mode, callback)
//! - A per-phase hook registry kept in descending priority order
//! - A dispatch engine running synchronous hooks in-line and submitting
//!   asynchronous hooks to a bounded worker pool
//! - Per-hook panic isolation
//! - Cost, error and panic instrumentation through [`HookObserver`]

pub mod context;
pub mod error;
pub mod hooks;
pub mod instrumentation;
pub mod pool;

pub use context::ExecutionContext;
pub use error::{DispatchError, HookError};
pub use hooks::definitions::{HookDescriptor, HookHandler, HookMode, Phase, hook_fn};
pub use hooks::engine::{HookEngine, HookOutcome, PhaseReport};
pub use hooks::registry::HookRegistry;
pub use instrumentation::{
    CompositeObserver, HookObserver, HookStats, MetricsCollector, TracingObserver,
};
pub use pool::AsyncHookPool;
