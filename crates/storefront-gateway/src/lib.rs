//! Storefront gateway library entry.
//!
//! This crate wires configuration, the store, the metrics registry, and the
//! REST handlers into one axum application. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
