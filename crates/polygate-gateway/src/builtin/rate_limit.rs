//! `rate-limiting` response helper: decorate responses with `X-RateLimit-*`
//! headers, or abort the chain once a hard limit is exhausted.
//!
//! The counters themselves (`limit`, `remaining`, `reset`) are computed by
//! the pipeline's limiter and arrive through the invocation properties; this
//! policy only decides reject-vs-decorate.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use polygate_core::{Flow, GateError, Handler, PolicyHandler, RequestContext, Result};

use crate::catalog::HandlerFactory;

use super::parse_config;

/// Decorate the response, or fail the flow when the quota is exhausted and
/// `reject` is set.
///
/// When `remaining < 0` and `reject` holds, the headers are stamped
/// immediately, the error is recorded in the context, and the chain aborts
/// with a 429-classed error. Otherwise a post-flow callback stamps the
/// headers and the chain proceeds.
pub fn handle_response(
    limit: i64,
    remaining: i64,
    reset: i64,
    reject: bool,
    context: &mut RequestContext,
    flow: &mut dyn Flow,
) {
    if remaining < 0 && reject {
        stamp_headers(context, limit, remaining, reset);
        tracing::debug!(limit, remaining, "rate limit exceeded");
        context.set_error(GateError::RateLimitExceeded);
        flow.fail(GateError::RateLimitExceeded);
        return;
    }

    context.subscribe_post_flow(move |ctx| stamp_headers(ctx, limit, remaining, reset));
    flow.proceed();
}

fn stamp_headers(context: &mut RequestContext, limit: i64, remaining: i64, reset: i64) {
    tracing::debug!(limit, remaining, reset, "stamping rate limit headers");
    let headers = context.message_headers_mut();
    headers.insert("X-RateLimit-Limit".to_string(), limit.into());
    headers.insert("X-RateLimit-Remaining".to_string(), remaining.into());
    headers.insert("X-RateLimit-Reset".to_string(), reset.into());
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct RateLimitConfig {
    /// Reject once the quota is exhausted; a soft limit only decorates.
    reject: bool,
}

pub struct RateLimitPolicy {
    reject: bool,
}

impl PolicyHandler for RateLimitPolicy {
    fn invoke(&self, properties: &Value, context: &mut RequestContext, flow: &mut dyn Flow) {
        let limit = properties.get("limit").and_then(Value::as_i64).unwrap_or(0);
        let remaining = properties
            .get("remaining")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let reset = properties.get("reset").and_then(Value::as_i64).unwrap_or(0);
        let reject = properties
            .get("reject")
            .and_then(Value::as_bool)
            .unwrap_or(self.reject);

        handle_response(limit, remaining, reset, reject, context, flow);
    }
}

pub struct RateLimitFactory;

impl HandlerFactory for RateLimitFactory {
    fn kind(&self) -> &'static str {
        "rate-limiting"
    }

    fn build(&self, config: &Value) -> Result<Handler> {
        let config: RateLimitConfig = parse_config(config)?;
        Ok(Arc::new(RateLimitPolicy {
            reject: config.reject,
        }))
    }
}
