//! `cors` policy: decorate the response with CORS headers.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use polygate_core::{Flow, Handler, PolicyHandler, RequestContext, Result};

use crate::catalog::HandlerFactory;

use super::parse_config;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct CorsConfig {
    allow_origin: String,
    allow_methods: String,
    allow_headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            allow_headers: "Content-Type,Authorization".to_string(),
        }
    }
}

pub struct CorsPolicy {
    config: CorsConfig,
}

impl PolicyHandler for CorsPolicy {
    fn invoke(&self, _properties: &Value, context: &mut RequestContext, flow: &mut dyn Flow) {
        // Headers go on the response, so stamping waits for post-flow.
        let origin = self.config.allow_origin.clone();
        let methods = self.config.allow_methods.clone();
        let headers = self.config.allow_headers.clone();
        context.subscribe_post_flow(move |ctx| {
            let map = ctx.message_headers_mut();
            map.insert("Access-Control-Allow-Origin".to_string(), origin.into());
            map.insert("Access-Control-Allow-Methods".to_string(), methods.into());
            map.insert("Access-Control-Allow-Headers".to_string(), headers.into());
        });
        flow.proceed();
    }
}

pub struct CorsFactory;

impl HandlerFactory for CorsFactory {
    fn kind(&self) -> &'static str {
        "cors"
    }

    fn build(&self, config: &Value) -> Result<Handler> {
        let config: CorsConfig = parse_config(config)?;
        Ok(Arc::new(CorsPolicy { config }))
    }
}
