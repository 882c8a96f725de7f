//! Integration tests for release activation and condition evaluation
//!
//! Releases are activated from inline YAML and evaluated end-to-end against
//! JSON data through the public SDK API.

mod common;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{data, TestEngine};
use conval_sdk::{
    CancellationToken, ConditionEngineBuilder, FixedClock, ProviderError, ReleaseFormat,
    ResolveContext, SdkError, Value, ValueService,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const MOTOR_RELEASE: &str = r#"
release:
  id: motor-claims
  version: 3
conditions:
  high_value:
    number: { path: claim.amount }
    isGreaterThan: 10000

  internal_network:
    ipAddress: { path: request.ip }
    isInRange: 10.0.0.0/8

  policy_expired:
    date: { path: policy.expiry }
    isBefore: { now: {} }

  known_repairer:
    list: [garage-12, garage-40]
    value: { path: claim.repairer }

  requires_manual_review:
    or:
      - // routed to the fraud team as well
      - number: { path: claim.amount }
        isGreaterThan: 10000
      - and:
          - not:
              list: [garage-12, garage-40]
              value: { path: claim.repairer }
          - text: { path: claim.description }
            contains: total loss
            ignoreCase: true

  fast_track:
    path: claim.fastTrack
"#;

fn fixed_clock() -> Arc<FixedClock> {
    let instant = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    Arc::new(FixedClock(instant))
}

/// Service that echoes its input back
struct EchoService;

#[async_trait]
impl ValueService for EchoService {
    async fn call(&self, input: Value) -> Result<Value, ProviderError> {
        Ok(input)
    }
}

/// Service that never answers in test time
struct SlowService;

#[async_trait]
impl ValueService for SlowService {
    async fn call(&self, _input: Value) -> Result<Value, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Value::Bool(true))
    }
}

// ============================================================================
// Activation
// ============================================================================

#[tokio::test]
async fn test_release_activation() {
    let engine = TestEngine::new().with_release(MOTOR_RELEASE).build().await;

    assert_eq!(engine.releases(), ["motor-claims@3".to_string()]);
    assert_eq!(
        engine.condition_names(),
        vec![
            "fast_track",
            "high_value",
            "internal_network",
            "known_repairer",
            "policy_expired",
            "requires_manual_review",
        ]
    );
    assert!(engine.contains("high_value"));
    assert!(!engine.contains("low_value"));
}

#[tokio::test]
async fn test_unresolvable_shape_rejects_activation() {
    let result = ConditionEngineBuilder::new()
        .add_release_content(
            ReleaseFormat::Yaml,
            "release: { id: broken }\nconditions:\n  bad: { colour: red }",
        )
        .build()
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, SdkError::Parse(_)));
    assert!(error.to_string().contains("colour"));
}

#[tokio::test]
async fn test_unknown_service_rejects_activation() {
    let result = ConditionEngineBuilder::new()
        .add_release_content(
            ReleaseFormat::Yaml,
            "release: { id: services }\nconditions:\n  scored: { service: fraud-score }",
        )
        .build()
        .await;

    assert!(matches!(
        result.unwrap_err(),
        SdkError::Build { condition, .. } if condition == "scored"
    ));
}

#[tokio::test]
async fn test_one_bad_release_rejects_all() {
    let result = ConditionEngineBuilder::new()
        .add_release_content(ReleaseFormat::Yaml, MOTOR_RELEASE)
        .add_release_content(
            ReleaseFormat::Json,
            r#"{"release": {"id": "home"}, "conditions": {"bad": {"integer": "x", "isLessThan": 1}}}"#,
        )
        .build()
        .await;
    assert!(matches!(result.unwrap_err(), SdkError::Build { .. }));
}

#[tokio::test]
async fn test_fail_on_empty_release() {
    let empty = "release: { id: empty }";

    let engine = ConditionEngineBuilder::new()
        .add_release_content(ReleaseFormat::Yaml, empty)
        .build()
        .await
        .unwrap();
    assert_eq!(engine.releases(), ["empty".to_string()]);

    let result = ConditionEngineBuilder::new()
        .add_release_content(ReleaseFormat::Yaml, empty)
        .fail_on_empty_release(true)
        .build()
        .await;
    assert!(matches!(result.unwrap_err(), SdkError::Config(_)));
}

#[tokio::test]
async fn test_later_release_redefines_condition() {
    let engine = TestEngine::new()
        .with_release("release: { id: base }\nconditions:\n  enabled: false")
        .with_release("release: { id: override }\nconditions:\n  enabled: true")
        .build()
        .await;

    assert_eq!(engine.evaluate("enabled", Value::Null).await.unwrap(), Some(true));
}

// ============================================================================
// Evaluation
// ============================================================================

#[tokio::test]
async fn test_evaluate_motor_release() {
    let engine = TestEngine::new()
        .with_release(MOTOR_RELEASE)
        .with_clock(fixed_clock())
        .build()
        .await;

    let claim = data(json!({
        "claim": {
            "amount": 2500,
            "repairer": "garage-99",
            "description": "Vehicle declared a TOTAL LOSS after flooding"
        },
        "policy": {"expiry": "2024-05-31"},
        "request": {"ip": "10.20.30.40"}
    }));

    let evaluate = |name: &'static str| {
        let engine = &engine;
        let claim = claim.clone();
        async move { engine.evaluate(name, claim).await.unwrap() }
    };

    assert_eq!(evaluate("high_value").await, Some(false));
    assert_eq!(evaluate("internal_network").await, Some(true));
    assert_eq!(evaluate("policy_expired").await, Some(true));
    assert_eq!(evaluate("known_repairer").await, Some(false));
    assert_eq!(evaluate("requires_manual_review").await, Some(true));
    assert_eq!(evaluate("fast_track").await, None);
}

#[tokio::test]
async fn test_resolution_error_surfaces_structured_error() {
    let engine = TestEngine::new().with_release(MOTOR_RELEASE).build().await;

    let error = engine
        .evaluate("internal_network", data(json!({"request": {"ip": "10.0.0"}})))
        .await
        .unwrap_err();

    match error {
        SdkError::Provider(error) => {
            assert_eq!(error.code(), "invalid_ip_address");
            assert_eq!(
                error.data().get("value"),
                Some(&Value::String("10.0.0".to_string()))
            );
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_unknown_condition() {
    let engine = TestEngine::new().with_release(MOTOR_RELEASE).build().await;

    assert!(matches!(
        engine.evaluate("missing", Value::Null).await,
        Err(SdkError::ConditionNotFound(name)) if name == "missing"
    ));
    assert_eq!(
        engine
            .resolve("missing", &ResolveContext::default())
            .await
            .unwrap_err()
            .code(),
        "missing_provider"
    );
}

#[tokio::test]
async fn test_resolve_with_caller_context() {
    let engine = TestEngine::new().with_release(MOTOR_RELEASE).build().await;

    let ctx = ResolveContext::from_json(json!({"policy": {"expiry": "2024-06-02"}}))
        .with_clock(fixed_clock());
    let result = engine.resolve("policy_expired", &ctx).await.unwrap();
    assert_eq!(result.into_value(), Some(false));
}

#[tokio::test]
async fn test_service_with_input() {
    let engine = TestEngine::new()
        .with_release(
            r#"
release: { id: scoring }
conditions:
  risky:
    number:
      service: echo
      input: { path: score }
    isGreaterThanOrEqualTo: 0.8
"#,
        )
        .with_service("echo", Arc::new(EchoService))
        .build()
        .await;

    assert_eq!(
        engine.evaluate("risky", data(json!({"score": 0.9}))).await.unwrap(),
        Some(true)
    );
    assert_eq!(
        engine.evaluate("risky", data(json!({"score": "0.5"}))).await.unwrap(),
        Some(false)
    );
}

#[tokio::test]
async fn test_concurrent_evaluations_share_engine() {
    let engine = Arc::new(TestEngine::new().with_release(MOTOR_RELEASE).build().await);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let amount = i * 1000;
                let result = engine
                    .evaluate("high_value", data(json!({"claim": {"amount": amount}})))
                    .await
                    .unwrap();
                (amount, result)
            })
        })
        .collect();

    for handle in handles {
        let (amount, result) = handle.await.unwrap();
        assert_eq!(result, Some(amount > 10000));
    }
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancelled_token_stops_evaluation_up_front() {
    let engine = TestEngine::new().with_release(MOTOR_RELEASE).build().await;
    let token = CancellationToken::new();
    token.cancel();

    let result = engine
        .evaluate_with_cancellation("high_value", Value::Null, &token)
        .await;
    assert!(matches!(result, Err(SdkError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_pending_evaluation() {
    let engine = TestEngine::new()
        .with_release("release: { id: slow }\nconditions:\n  slow: { service: slow }")
        .with_service("slow", Arc::new(SlowService))
        .build()
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });

    let result = engine
        .evaluate_with_cancellation("slow", Value::Null, &token)
        .await;
    assert!(matches!(result, Err(SdkError::Cancelled)));
}

#[tokio::test]
async fn test_uncancelled_evaluation_completes() {
    let engine = TestEngine::new().with_release(MOTOR_RELEASE).build().await;
    let token = CancellationToken::new();

    let result = engine
        .evaluate_with_cancellation(
            "high_value",
            data(json!({"claim": {"amount": 20000}})),
            &token,
        )
        .await
        .unwrap();
    assert_eq!(result, Some(true));
}
