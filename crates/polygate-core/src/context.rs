//! Per-request shared context passed through the policy chain.
//!
//! Policies read and write the context to hand data to surrounding pipeline
//! stages. Nested response fields follow explicit set semantics: writers go
//! through [`RequestContext::message_headers_mut`], which guarantees the
//! `message` object and its `headers` sub-object exist before the write.

use serde_json::{Map, Value};

use crate::error::GateError;

/// Callback fired once after the main policy chain completes.
pub type PostFlowCallback = Box<dyn FnOnce(&mut RequestContext) + Send>;

/// Mutable, request-scoped shared map.
///
/// One instance per request; never shared across requests. The pipeline
/// passes it `&mut` into each handler invocation, so no synchronization is
/// involved.
#[derive(Default)]
pub struct RequestContext {
    values: Map<String, Value>,
    post_flow: Vec<PostFlowCallback>,
    error: Option<GateError>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a top-level context value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set a top-level context value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Response headers sub-map, created on first use.
    ///
    /// Ensures `message` is an object and `message.headers` is an object
    /// before returning it mutably. A non-object value found at either key is
    /// replaced with an empty object; sibling fields of `message` survive.
    pub fn message_headers_mut(&mut self) -> &mut Map<String, Value> {
        let message = self
            .values
            .entry("message".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let headers = ensure_object(message)
            .entry("headers".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        ensure_object(headers)
    }

    /// Register a callback to run after the main policy chain completes.
    pub fn subscribe_post_flow(
        &mut self,
        callback: impl FnOnce(&mut RequestContext) + Send + 'static,
    ) {
        self.post_flow.push(Box::new(callback));
    }

    /// Run all post-flow callbacks in registration order.
    ///
    /// Callbacks are drained before running, so each fires at most once;
    /// callbacks registered while firing are kept for a later pass.
    pub fn fire_post_flow(&mut self) {
        let callbacks = std::mem::take(&mut self.post_flow);
        for cb in callbacks {
            cb(self);
        }
    }

    /// Record the error that aborted the chain.
    pub fn set_error(&mut self, error: GateError) {
        tracing::debug!(error = %error, "request chain aborted");
        self.error = Some(error);
    }

    pub fn error(&self) -> Option<&GateError> {
        self.error.as_ref()
    }
}

/// Force `slot` to hold an object and return it mutably.
fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!(), // just forced to an object
    }
}
