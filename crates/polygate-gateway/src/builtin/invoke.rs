//! `invoke` policy: select the upstream target for the pipeline's connector.
//!
//! The gateway's upstream connector performs the actual HTTP egress; this
//! policy only validates the target and records it in the context.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use polygate_core::{Flow, GateError, Handler, PolicyHandler, RequestContext, Result};

use crate::catalog::HandlerFactory;

use super::parse_config;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct InvokeConfig {
    /// Default upstream URL; per-use properties may override it.
    url: Option<String>,
}

pub struct InvokePolicy {
    url: Option<String>,
}

impl PolicyHandler for InvokePolicy {
    fn invoke(&self, properties: &Value, context: &mut RequestContext, flow: &mut dyn Flow) {
        let url = properties
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.url.clone());

        match url {
            Some(url) => {
                tracing::debug!(%url, "invoke target selected");
                context.set("invoke.url", url);
                flow.proceed();
            }
            None => flow.fail(GateError::BadRequest(
                "invoke policy requires a url".to_string(),
            )),
        }
    }
}

pub struct InvokeFactory;

impl HandlerFactory for InvokeFactory {
    fn kind(&self) -> &'static str {
        "invoke"
    }

    fn build(&self, config: &Value) -> Result<Handler> {
        let config: InvokeConfig = parse_config(config)?;
        Ok(Arc::new(InvokePolicy { url: config.url }))
    }
}
