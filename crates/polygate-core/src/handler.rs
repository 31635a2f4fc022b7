//! Policy handler invocation contract.

use std::sync::Arc;

use serde_json::Value;

use crate::context::RequestContext;
use crate::flow::Flow;

/// A named, pluggable request/response handler invoked as a pipeline stage.
///
/// `properties` carries the static, per-use configuration the pipeline
/// attaches to this policy instance; `context` is the mutable per-request
/// shared map; `flow` advances or aborts the chain.
pub trait PolicyHandler: Send + Sync {
    fn invoke(&self, properties: &Value, context: &mut RequestContext, flow: &mut dyn Flow);
}

/// Shared, immutable handle to a policy handler.
pub type Handler = Arc<dyn PolicyHandler>;

impl std::fmt::Debug for dyn PolicyHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PolicyHandler")
    }
}

/// Plain closures usable as handlers (test doubles, ad-hoc policies).
impl<F> PolicyHandler for F
where
    F: Fn(&Value, &mut RequestContext, &mut dyn Flow) + Send + Sync,
{
    fn invoke(&self, properties: &Value, context: &mut RequestContext, flow: &mut dyn Flow) {
        self(properties, context, flow)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::flow::RecordingFlow;
    use serde_json::json;

    #[test]
    fn closure_acts_as_handler() {
        let handler: Handler = Arc::new(
            |props: &Value, ctx: &mut RequestContext, flow: &mut dyn Flow| {
                ctx.set("echo", props.clone());
                flow.proceed();
            },
        );

        let mut ctx = RequestContext::new();
        let mut flow = RecordingFlow::new();
        handler.invoke(&json!({"k": "v"}), &mut ctx, &mut flow);

        assert!(flow.proceeded());
        assert_eq!(ctx.get("echo"), Some(&json!({"k": "v"})));
    }
}
