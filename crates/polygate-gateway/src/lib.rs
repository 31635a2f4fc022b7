//! polygate gateway library entry.
//!
//! This crate wires the policy loader (path resolution, definition scanning,
//! registry merging) and the bundled built-in policies into the registry the
//! request pipeline consumes. It is intended to be used by the binary
//! (`main.rs`) and by integration tests.

pub mod builtin;
pub mod catalog;
pub mod loader;

pub use catalog::{HandlerCatalog, HandlerFactory};
pub use loader::{LoaderOptions, PolicyLoader, PolicyRegistry};
