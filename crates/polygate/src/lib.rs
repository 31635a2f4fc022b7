//! Top-level facade crate for polygate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use polygate_core::*;
}

pub mod gateway {
    pub use polygate_gateway::*;
}
