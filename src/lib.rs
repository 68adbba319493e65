//! # hookflow
//!
//! Example order service built on `hookflow-engine`.

pub mod order;

pub use order::{Order, OrderContext, OrderService};
