//! Storefront core: domain rows, the shared error surface, and the in-process
//! metrics registry.
//!
//! This crate carries no HTTP or runtime dependencies so the metrics core can
//! be embedded by the gateway, by tests, and by any other request-handling
//! host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Instrumentation sits on the request hot path, so every failure inside it
//! must be absorbed and logged rather than unwinding into a handler.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod model;

/// Shared result type.
pub use error::{Result, StorefrontError};
pub use metrics::{MetricsRegistry, RequestGuard, TimerHandle};
