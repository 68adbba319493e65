//! Integration tests for order creation through Before/After hooks.

use std::sync::Arc;

use serde_json::json;

use hookflow::{Order, OrderContext};
use hookflow_core::config::AppConfig;
use hookflow_core::error::ErrorKind;
use hookflow_engine::{ExecutionContext, HookOutcome, Phase};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_hooks_registered_in_priority_order() {
    let app = TestApp::new().await;
    let engine = app.service.engine();

    assert_eq!(engine.hook_names(&Phase::Before).await, vec!["RiskCheck"]);
    assert_eq!(
        engine.hook_names(&Phase::After).await,
        vec!["AddPoints", "SendSms"]
    );
}

#[tokio::test]
async fn test_normal_order_passes_both_phases() {
    let app = TestApp::new().await;
    let ctx = ExecutionContext::new();

    let payload = app
        .service
        .create_order(&ctx, &Order::new("order_001", "user_1001", 500))
        .await
        .expect("order under the risk limit is accepted");

    assert_eq!(payload.metadata("risk_checked").await, Some(json!(true)));

    app.drain().await;
    assert_eq!(payload.metadata("points_added").await, Some(json!(500)));
    assert_eq!(payload.metadata("sms_sent").await, Some(json!(true)));

    for hook in ["RiskCheck", "AddPoints", "SendSms"] {
        let stats = app.metrics.get(hook).expect("hook recorded");
        assert_eq!(stats.invocations, 1, "{hook} should run once");
        assert_eq!(stats.failures, 0, "{hook} should not fail");
    }
}

#[tokio::test]
async fn test_large_order_rejected_by_risk_check() {
    let app = TestApp::new().await;
    let ctx = ExecutionContext::new();

    let err = app
        .service
        .create_order(&ctx, &Order::new("order_002", "user_1002", 20_000))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Rejected);
    assert_eq!(
        err.message,
        "critical hook failed [RiskCheck]: risk rejected"
    );

    app.drain().await;
    assert_eq!(app.metrics.get("RiskCheck").map(|s| s.failures), Some(1));
    assert!(app.metrics.get("AddPoints").is_none());
    assert!(app.metrics.get("SendSms").is_none());
}

#[tokio::test]
async fn test_after_phase_independent_of_rejected_before() {
    let app = TestApp::new().await;
    let engine = app.service.engine();
    let ctx = ExecutionContext::new();
    let payload = Arc::new(OrderContext::from_order(&Order::new(
        "order_002",
        "user_1002",
        20_000,
    )));

    assert!(
        engine
            .execute(&Phase::Before, &ctx, Arc::clone(&payload))
            .await
            .is_err()
    );

    let report = engine
        .execute(&Phase::After, &ctx, Arc::clone(&payload))
        .await
        .expect("After phase has no critical sync hooks");
    assert_eq!(
        report.outcomes,
        vec![
            HookOutcome::Dispatched {
                hook: "AddPoints".to_string()
            },
            HookOutcome::Dispatched {
                hook: "SendSms".to_string()
            },
        ]
    );

    app.drain().await;
    assert_eq!(payload.metadata("points_added").await, Some(json!(20_000)));
}

#[tokio::test]
async fn test_risk_limit_from_config() {
    let mut config = AppConfig::default();
    config.order.risk_limit = 100;
    let app = TestApp::with_config(config).await;
    let ctx = ExecutionContext::new();

    let err = app
        .service
        .create_order(&ctx, &Order::new("order_003", "user_1003", 500))
        .await
        .unwrap_err();
    assert!(err.is_rejection());

    app.service
        .create_order(&ctx, &Order::new("order_004", "user_1003", 100))
        .await
        .expect("amount equal to the limit is accepted");
    app.drain().await;
}

#[tokio::test]
async fn test_unknown_phase_is_a_no_op() {
    let app = TestApp::new().await;
    let payload = Arc::new(OrderContext::from_order(&Order::new("order_005", "u", 1)));

    let report = app
        .service
        .engine()
        .execute(&Phase::named("refund"), &ExecutionContext::new(), payload)
        .await
        .expect("phase without hooks succeeds");

    assert!(report.is_empty());
    assert!(app.metrics.is_empty());
}

#[tokio::test]
async fn test_cancelled_context_skips_sms() {
    let app = TestApp::new().await;
    let ctx = ExecutionContext::new();
    ctx.cancel();

    let payload = app
        .service
        .create_order(&ctx, &Order::new("order_005", "user_1005", 500))
        .await
        .expect("After-phase failures never fail the order");

    app.drain().await;
    assert_eq!(payload.metadata("sms_sent").await, None);
    assert_eq!(payload.metadata("points_added").await, Some(json!(500)));

    let sms = app.metrics.get("SendSms").expect("hook recorded");
    assert_eq!(sms.invocations, 1);
    assert_eq!(sms.failures, 1);
    assert_eq!(sms.panics, 0);
}
