//! polygate core: pipeline contracts and error types shared by the loader,
//! the bundled policies, and the gateway pipeline.
//!
//! This crate defines the handler invocation contract (`properties`,
//! `context`, `flow`) and the error surface. It intentionally carries no
//! filesystem or runtime dependencies so policy implementations can be
//! compiled and tested in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `GateError`/`Result` so the gateway
//! process does not crash on bad configuration or bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod context;
pub mod error;
pub mod flow;
pub mod handler;

pub use context::RequestContext;
pub use error::{GateError, Result};
pub use flow::{Flow, FlowOutcome, RecordingFlow};
pub use handler::{Handler, PolicyHandler};
