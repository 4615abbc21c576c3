//! Top-level facade crate for the storefront backend.
//!
//! Re-exports the core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use storefront_core::*;
}

pub mod gateway {
    pub use storefront_gateway::*;
}
