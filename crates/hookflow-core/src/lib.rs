//! # hookflow-core
//!
//! Core crate for hookflow. Contains the configuration schemas and the
//! unified error system shared by the engine and its callers.
//!
//! This crate has **no** internal dependencies on other hookflow crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
