//! Integration tests for the order service and hook engine.

mod helpers;
mod order_test;
