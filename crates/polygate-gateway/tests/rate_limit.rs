//! Rate-limiting policy tests: header decoration and hard-limit rejection.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{json, Value};

use polygate_core::{GateError, PolicyHandler, RecordingFlow, RequestContext};
use polygate_gateway::builtin::rate_limit::{handle_response, RateLimitFactory};
use polygate_gateway::catalog::HandlerFactory;

fn headers(ctx: &RequestContext) -> Value {
    ctx.get("message").unwrap()["headers"].clone()
}

#[test]
fn exhausted_hard_limit_rejects_with_429() {
    let handler = RateLimitFactory.build(&Value::Null).unwrap();

    let mut ctx = RequestContext::new();
    let mut flow = RecordingFlow::new();
    handler.invoke(
        &json!({"limit": 100, "remaining": -1, "reset": 60, "reject": true}),
        &mut ctx,
        &mut flow,
    );

    assert!(!flow.proceeded());
    let err = flow.failure().unwrap();
    assert_eq!(err.http_status(), 429);
    assert_eq!(err.client_code().as_str(), "RATE_LIMITED");
    // the aborting error is recorded for the pipeline's error handling
    assert!(matches!(ctx.error(), Some(GateError::RateLimitExceeded)));
    // headers are stamped even on the rejection path
    assert_eq!(headers(&ctx)["X-RateLimit-Remaining"], json!(-1));
}

#[test]
fn soft_limit_decorates_instead_of_rejecting() {
    // same counters, but reject unset: the chain continues
    let handler = RateLimitFactory.build(&Value::Null).unwrap();

    let mut ctx = RequestContext::new();
    let mut flow = RecordingFlow::new();
    handler.invoke(
        &json!({"limit": 100, "remaining": -1, "reset": 60}),
        &mut ctx,
        &mut flow,
    );

    assert!(flow.proceeded());
    assert!(ctx.error().is_none());
}

#[test]
fn headers_are_stamped_at_post_flow() {
    let handler = RateLimitFactory.build(&Value::Null).unwrap();

    let mut ctx = RequestContext::new();
    let mut flow = RecordingFlow::new();
    handler.invoke(
        &json!({"limit": 100, "remaining": 42, "reset": 60, "reject": true}),
        &mut ctx,
        &mut flow,
    );

    assert!(flow.proceeded());
    assert!(ctx.get("message").is_none(), "headers must wait for post-flow");

    ctx.fire_post_flow();
    let headers = headers(&ctx);
    assert_eq!(headers["X-RateLimit-Limit"], json!(100));
    assert_eq!(headers["X-RateLimit-Remaining"], json!(42));
    assert_eq!(headers["X-RateLimit-Reset"], json!(60));
}

#[test]
fn unit_config_supplies_the_reject_default() {
    // bundled unit ships `reject: true`; properties omit the flag
    let handler = RateLimitFactory.build(&json!({"reject": true})).unwrap();

    let mut ctx = RequestContext::new();
    let mut flow = RecordingFlow::new();
    handler.invoke(
        &json!({"limit": 10, "remaining": -2, "reset": 30}),
        &mut ctx,
        &mut flow,
    );

    assert!(!flow.proceeded());
    assert_eq!(flow.failure().unwrap().http_status(), 429);
}

#[test]
fn helper_preserves_existing_response_fields() {
    let mut ctx = RequestContext::new();
    ctx.set("message", json!({"body": "ok"}));

    let mut flow = RecordingFlow::new();
    handle_response(100, 7, 15, true, &mut ctx, &mut flow);
    assert!(flow.proceeded());

    ctx.fire_post_flow();
    let message = ctx.get("message").unwrap();
    assert_eq!(message["body"], json!("ok"));
    assert_eq!(message["headers"]["X-RateLimit-Remaining"], json!(7));
}
