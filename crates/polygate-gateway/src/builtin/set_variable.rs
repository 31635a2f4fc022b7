//! `set-variable` policy: stamp configured values into the request context.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use polygate_core::{Flow, Handler, PolicyHandler, RequestContext, Result};

use crate::catalog::HandlerFactory;

use super::parse_config;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct SetVariableConfig {
    /// Name/value pairs written into the context on every invocation.
    set: Map<String, Value>,
}

pub struct SetVariablePolicy {
    vars: Map<String, Value>,
}

impl PolicyHandler for SetVariablePolicy {
    fn invoke(&self, properties: &Value, context: &mut RequestContext, flow: &mut dyn Flow) {
        for (name, value) in &self.vars {
            context.set(name.clone(), value.clone());
        }
        // Per-use properties stack on top of the unit configuration.
        if let Some(set) = properties.get("set").and_then(Value::as_object) {
            for (name, value) in set {
                context.set(name.clone(), value.clone());
            }
        }
        flow.proceed();
    }
}

pub struct SetVariableFactory;

impl HandlerFactory for SetVariableFactory {
    fn kind(&self) -> &'static str {
        "set-variable"
    }

    fn build(&self, config: &Value) -> Result<Handler> {
        let cfg: SetVariableConfig = parse_config(config)?;
        Ok(Arc::new(SetVariablePolicy { vars: cfg.set }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use polygate_core::RecordingFlow;
    use serde_json::json;

    #[test]
    fn stamps_unit_config_then_properties() {
        let handler = SetVariableFactory
            .build(&json!({"set": {"policyName": "mypolicy1", "tier": "gold"}}))
            .unwrap();

        let mut ctx = RequestContext::new();
        let mut flow = RecordingFlow::new();
        handler.invoke(&json!({"set": {"tier": "bronze"}}), &mut ctx, &mut flow);

        assert!(flow.proceeded());
        assert_eq!(ctx.get("policyName"), Some(&json!("mypolicy1")));
        assert_eq!(ctx.get("tier"), Some(&json!("bronze")));
    }

    #[test]
    fn rejects_unknown_config_field() {
        let err = SetVariableFactory
            .build(&json!({"sett": {}}))
            .unwrap_err();
        assert_eq!(err.client_code().as_str(), "INVALID_DEFINITION");
    }
}
