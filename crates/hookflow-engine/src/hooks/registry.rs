//! Hook registry — hooks are registered by phase and kept in priority order.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::definitions::{HookDescriptor, Phase};

/// Registry of hook descriptors organized by phase.
///
/// One lock guards every phase. Each phase's list is sorted by descending
/// priority after every registration; equal priorities keep registration
/// order.
pub struct HookRegistry<P: Send + Sync + 'static> {
    /// Phase → descriptors, highest priority first.
    hooks: RwLock<HashMap<Phase, Vec<Arc<HookDescriptor<P>>>>>,
}

impl<P: Send + Sync + 'static> HookRegistry<P> {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a hook for a phase.
    pub async fn register(&self, phase: Phase, descriptor: HookDescriptor<P>) {
        let name = descriptor.name().to_string();
        let priority = descriptor.priority();
        let mode = descriptor.mode();

        let mut hooks = self.hooks.write().await;
        let entries = hooks.entry(phase.clone()).or_default();

        entries.push(Arc::new(descriptor));

        // Stable: equal priorities stay in registration order
        entries.sort_by_key(|e| Reverse(e.priority()));

        info!(
            phase = %phase,
            hook = %name,
            priority = priority,
            mode = %mode,
            "Hook registered"
        );
    }

    /// Returns a copy of the ordered descriptors for a phase.
    ///
    /// The read lock is released before returning, so later registrations
    /// never affect the returned list.
    pub async fn snapshot(&self, phase: &Phase) -> Vec<Arc<HookDescriptor<P>>> {
        let hooks = self.hooks.read().await;
        hooks.get(phase).cloned().unwrap_or_default()
    }

    /// Returns hook names for a phase in execution order.
    pub async fn hook_names(&self, phase: &Phase) -> Vec<String> {
        let hooks = self.hooks.read().await;
        hooks
            .get(phase)
            .map(|entries| entries.iter().map(|e| e.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Returns the number of hooks registered for a phase.
    pub async fn hook_count(&self, phase: &Phase) -> usize {
        let hooks = self.hooks.read().await;
        hooks.get(phase).map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns all phases that have at least one hook.
    pub async fn registered_phases(&self) -> Vec<Phase> {
        let hooks = self.hooks.read().await;
        hooks.keys().cloned().collect()
    }
}

impl<P: Send + Sync + 'static> Default for HookRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send + Sync + 'static> std::fmt::Debug for HookRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry").finish_non_exhaustive()
    }
}
