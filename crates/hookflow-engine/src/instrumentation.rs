//! Hook instrumentation — cost, error and panic events.
//!
//! Every invocation emits a cost event. Failures additionally emit an error
//! event, and caught panics emit a panic event before the error event.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{error, info, warn};

use crate::error::HookError;
use crate::hooks::definitions::Phase;

/// Sink for hook instrumentation events.
pub trait HookObserver: Send + Sync {
    /// Records how long one invocation took, whatever its outcome.
    fn on_cost(&self, phase: &Phase, hook: &str, cost: Duration);

    /// Records a failed invocation.
    fn on_error(&self, phase: &Phase, hook: &str, error: &HookError);

    /// Records a panic caught at the hook boundary.
    fn on_panic(&self, phase: &Phase, hook: &str, panic: &str);
}

/// Writes instrumentation events as structured `tracing` lines.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Costs at or above this are logged at `warn`.
    slow_threshold: Duration,
}

impl TracingObserver {
    /// Creates an observer with the given slow-hook threshold.
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl HookObserver for TracingObserver {
    fn on_cost(&self, phase: &Phase, hook: &str, cost: Duration) {
        let cost_us = cost.as_micros() as u64;
        if cost >= self.slow_threshold {
            warn!(target: "hookflow::metric", phase = %phase, hook = %hook, cost_us, "Slow hook");
        } else {
            info!(target: "hookflow::metric", phase = %phase, hook = %hook, cost_us, "Hook finished");
        }
    }

    fn on_error(&self, phase: &Phase, hook: &str, error: &HookError) {
        warn!(target: "hookflow::error", phase = %phase, hook = %hook, error = %error, "Hook failed");
    }

    fn on_panic(&self, phase: &Phase, hook: &str, panic: &str) {
        error!(target: "hookflow::panic", phase = %phase, hook = %hook, panic = %panic, "Hook panicked");
    }
}

/// Aggregated statistics for one hook name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookStats {
    /// Number of completed invocations (cost events).
    pub invocations: u64,
    /// Number of failed invocations, panics included.
    pub failures: u64,
    /// Number of caught panics.
    pub panics: u64,
    /// Sum of all invocation costs.
    pub total_cost: Duration,
    /// Slowest single invocation.
    pub max_cost: Duration,
}

impl HookStats {
    /// Mean cost per invocation.
    pub fn average_cost(&self) -> Duration {
        if self.invocations == 0 {
            Duration::ZERO
        } else {
            let nanos = self.total_cost.as_nanos() / u128::from(self.invocations);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }
}

/// In-memory per-hook statistics.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    /// Hook name → statistics.
    stats: DashMap<String, HookStats>,
}

impl MetricsCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics for a hook.
    pub fn get(&self, hook: &str) -> Option<HookStats> {
        self.stats.get(hook).map(|s| s.value().clone())
    }

    /// Returns statistics for every hook seen so far.
    pub fn snapshot(&self) -> HashMap<String, HookStats> {
        self.stats
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Returns whether no event has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Clears all statistics.
    pub fn reset(&self) {
        self.stats.clear();
    }
}

impl HookObserver for MetricsCollector {
    fn on_cost(&self, _phase: &Phase, hook: &str, cost: Duration) {
        let mut stats = self.stats.entry(hook.to_string()).or_default();
        stats.invocations += 1;
        stats.total_cost += cost;
        stats.max_cost = stats.max_cost.max(cost);
    }

    fn on_error(&self, _phase: &Phase, hook: &str, _error: &HookError) {
        self.stats.entry(hook.to_string()).or_default().failures += 1;
    }

    fn on_panic(&self, _phase: &Phase, hook: &str, _panic: &str) {
        self.stats.entry(hook.to_string()).or_default().panics += 1;
    }
}

/// Fans every event out to several observers.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn HookObserver>>,
}

impl CompositeObserver {
    /// Creates an empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    pub fn with(mut self, observer: Arc<dyn HookObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl HookObserver for CompositeObserver {
    fn on_cost(&self, phase: &Phase, hook: &str, cost: Duration) {
        for observer in &self.observers {
            observer.on_cost(phase, hook, cost);
        }
    }

    fn on_error(&self, phase: &Phase, hook: &str, error: &HookError) {
        for observer in &self.observers {
            observer.on_error(phase, hook, error);
        }
    }

    fn on_panic(&self, phase: &Phase, hook: &str, panic: &str) {
        for observer in &self.observers {
            observer.on_panic(phase, hook, panic);
        }
    }
}
