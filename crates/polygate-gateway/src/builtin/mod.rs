//! Bundled policy handlers.
//!
//! Each module pairs a `HandlerFactory` (registered in
//! `HandlerCatalog::with_builtins`) with the handler it builds. The matching
//! policy units live in this crate's `policies/` directory.

pub mod cors;
pub mod invoke;
pub mod rate_limit;
pub mod set_variable;

use serde::de::DeserializeOwned;
use serde_json::Value;

use polygate_core::{GateError, Result};

/// Parse a unit's `config` mapping into a typed config, treating a missing
/// (`Null`) config as the default.
fn parse_config<T: DeserializeOwned + Default>(config: &Value) -> Result<T> {
    if config.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(config.clone())
        .map_err(|e| GateError::InvalidDefinition(format!("invalid policy config: {e}")))
}
