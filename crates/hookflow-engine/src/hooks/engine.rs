//! Dispatch engine — runs the hooks of a phase against a shared payload.
//!
//! Hooks run in descending priority order over a snapshot of the phase
//! taken when `execute` starts:
//! - Synchronous hooks are awaited one at a time on the caller's task. A
//!   failing `must_succeed` hook stops the run and its error is returned;
//!   any other failure is reported and the run continues.
//! - Asynchronous hooks are submitted to the worker pool and never affect
//!   the result, whatever their `must_succeed` flag says.
//!
//! A panic inside a callback is caught at that hook and handled as a
//! failure of that hook.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tracing::{debug, warn};

use hookflow_core::config::EngineConfig;

use super::definitions::{HookDescriptor, HookMode, Phase};
use super::registry::HookRegistry;
use crate::context::ExecutionContext;
use crate::error::{DispatchError, HookError};
use crate::instrumentation::{HookObserver, TracingObserver};
use crate::pool::AsyncHookPool;

/// What happened to one hook during a completed phase run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Synchronous hook returned `Ok`.
    Succeeded {
        /// Hook name.
        hook: String,
        /// Invocation cost.
        cost: Duration,
    },
    /// Synchronous, non-critical hook failed and was skipped.
    Failed {
        /// Hook name.
        hook: String,
        /// Invocation cost.
        cost: Duration,
        /// Rendered failure.
        error: String,
    },
    /// Asynchronous hook was handed to the worker pool.
    Dispatched {
        /// Hook name.
        hook: String,
    },
}

impl HookOutcome {
    /// Name of the hook this outcome belongs to.
    pub fn hook(&self) -> &str {
        match self {
            Self::Succeeded { hook, .. } | Self::Failed { hook, .. } | Self::Dispatched { hook } => {
                hook
            }
        }
    }
}

/// Result of a phase run that reached completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    /// The phase that ran.
    pub phase: Phase,
    /// One entry per hook, in execution order.
    pub outcomes: Vec<HookOutcome>,
}

impl PhaseReport {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            outcomes: Vec::new(),
        }
    }

    /// Names of synchronous hooks that failed without aborting the run.
    pub fn failed_hooks(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, HookOutcome::Failed { .. }))
            .map(HookOutcome::hook)
            .collect()
    }

    /// Number of asynchronous hooks handed to the worker pool.
    pub fn dispatched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, HookOutcome::Dispatched { .. }))
            .count()
    }

    /// Returns whether the phase had no hooks.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Priority-ordered hook dispatcher over payloads of type `P`.
pub struct HookEngine<P: Send + Sync + 'static> {
    /// Phase → ordered hooks.
    registry: Arc<HookRegistry<P>>,
    /// Worker pool for asynchronous hooks.
    pool: AsyncHookPool,
    /// Instrumentation sink.
    observer: Arc<dyn HookObserver>,
    /// Engine settings.
    config: EngineConfig,
}

impl<P: Send + Sync + 'static> HookEngine<P> {
    /// Creates an engine that reports through `tracing`.
    pub fn new(config: EngineConfig) -> Self {
        let observer = Arc::new(TracingObserver::new(config.slow_hook_threshold()));
        Self::with_observer(config, observer)
    }

    /// Creates an engine with a custom instrumentation sink.
    pub fn with_observer(config: EngineConfig, observer: Arc<dyn HookObserver>) -> Self {
        Self {
            registry: Arc::new(HookRegistry::new()),
            pool: AsyncHookPool::new(config.async_concurrency),
            observer,
            config,
        }
    }

    /// Registers a hook into a phase.
    pub async fn register(&self, phase: Phase, descriptor: HookDescriptor<P>) {
        self.registry.register(phase, descriptor).await;
    }

    /// Runs every hook registered for `phase`.
    ///
    /// Returns an error only when a synchronous `must_succeed` hook fails.
    /// Asynchronous hooks may still be running when this returns.
    pub async fn execute(
        &self,
        phase: &Phase,
        ctx: &ExecutionContext,
        payload: Arc<P>,
    ) -> Result<PhaseReport, DispatchError> {
        let hooks = self.registry.snapshot(phase).await;
        let mut report = PhaseReport::new(phase.clone());

        if hooks.is_empty() {
            return Ok(report);
        }

        debug!(
            phase = %phase,
            hook_count = hooks.len(),
            request_id = %ctx.request_id(),
            "Executing phase"
        );

        for descriptor in hooks {
            match descriptor.mode() {
                HookMode::Async => {
                    report.outcomes.push(HookOutcome::Dispatched {
                        hook: descriptor.name().to_string(),
                    });

                    let phase = phase.clone();
                    let ctx = ctx.clone();
                    let payload = Arc::clone(&payload);
                    let observer = Arc::clone(&self.observer);
                    self.pool.submit(async move {
                        let _ = invoke(&phase, &descriptor, ctx, payload, observer.as_ref()).await;
                    });
                }
                HookMode::Sync => {
                    let (cost, result) = invoke(
                        phase,
                        &descriptor,
                        ctx.clone(),
                        Arc::clone(&payload),
                        self.observer.as_ref(),
                    )
                    .await;

                    match result {
                        Ok(()) => report.outcomes.push(HookOutcome::Succeeded {
                            hook: descriptor.name().to_string(),
                            cost,
                        }),
                        Err(error) if descriptor.is_must_succeed() => {
                            warn!(
                                phase = %phase,
                                hook = %descriptor.name(),
                                error = %error,
                                "Critical hook failed, aborting phase"
                            );
                            return Err(DispatchError::CriticalHookFailed {
                                hook: descriptor.name().to_string(),
                                phase: phase.clone(),
                                source: error,
                            });
                        }
                        Err(error) => report.outcomes.push(HookOutcome::Failed {
                            hook: descriptor.name().to_string(),
                            cost,
                            error: error.to_string(),
                        }),
                    }
                }
            }
        }

        Ok(report)
    }

    /// Waits for in-flight asynchronous hooks, up to the configured timeout.
    pub async fn drain(&self) -> bool {
        self.pool.drain(self.config.drain_timeout()).await
    }

    /// Waits for in-flight asynchronous hooks, up to `timeout`.
    pub async fn drain_for(&self, timeout: Duration) -> bool {
        self.pool.drain(timeout).await
    }

    /// Number of asynchronous hooks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.pool.in_flight()
    }

    /// Hook names of a phase in execution order.
    pub async fn hook_names(&self, phase: &Phase) -> Vec<String> {
        self.registry.hook_names(phase).await
    }

    /// Number of hooks registered for a phase.
    pub async fn hook_count(&self, phase: &Phase) -> usize {
        self.registry.hook_count(phase).await
    }

    /// All phases with at least one hook.
    pub async fn registered_phases(&self) -> Vec<Phase> {
        self.registry.registered_phases().await
    }

    /// Returns the hook registry.
    pub fn registry(&self) -> &Arc<HookRegistry<P>> {
        &self.registry
    }

    /// Returns the engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<P: Send + Sync + 'static> std::fmt::Debug for HookEngine<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookEngine")
            .field("pool", &self.pool)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Invokes one hook behind a panic boundary and reports the outcome.
async fn invoke<P: Send + Sync + 'static>(
    phase: &Phase,
    descriptor: &HookDescriptor<P>,
    ctx: ExecutionContext,
    payload: Arc<P>,
    observer: &dyn HookObserver,
) -> (Duration, Result<(), HookError>) {
    let start = Instant::now();
    let handler = Arc::clone(descriptor.handler());

    let result = match AssertUnwindSafe(async move { handler.call(ctx, payload).await })
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            observer.on_panic(phase, descriptor.name(), &message);
            Err(HookError::Panicked(message))
        }
    };

    let cost = start.elapsed();
    observer.on_cost(phase, descriptor.name(), cost);
    if let Err(error) = &result {
        observer.on_error(phase, descriptor.name(), error);
    }

    (cost, result)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
