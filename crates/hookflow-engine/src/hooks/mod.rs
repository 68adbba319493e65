//! Hook system — definitions, registry, and dispatch engine.

pub mod definitions;
pub mod engine;
pub mod registry;

pub use definitions::{HookDescriptor, HookHandler, HookMode, Phase};
pub use engine::HookEngine;
pub use registry::HookRegistry;
