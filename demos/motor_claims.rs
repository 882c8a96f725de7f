//! Motor claims routing example
//!
//! This example demonstrates:
//! - Activating a release from a YAML file
//! - Registering a value service
//! - Evaluating conditions against claim data
//! - Handling null results and structured errors

use async_trait::async_trait;
use conval_sdk::{ConditionEngineBuilder, ProviderError, SdkError, Value, ValueService};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scores a claim from its amount; stands in for a remote fraud model
struct FraudScoreService;

#[async_trait]
impl ValueService for FraudScoreService {
    async fn call(&self, input: Value) -> Result<Value, ProviderError> {
        let amount = match input.as_object().and_then(|claim| claim.get("amount")) {
            Some(Value::Number(amount)) => *amount,
            _ => {
                return Err(ProviderError::Service {
                    service: "fraud-score".to_string(),
                    message: "claim has no numeric amount".to_string(),
                })
            }
        };
        Ok(Value::Number((amount / 50_000.0).min(1.0)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    println!("=== Motor Claims Example ===\n");

    let engine = ConditionEngineBuilder::new()
        .add_release_file("demos/releases/motor_claims.yaml")
        .with_service("fraud-score", Arc::new(FraudScoreService))
        .build()
        .await?;

    println!("Activated releases: {:?}\n", engine.releases());

    let claim = Value::from(json!({
        "claim": {
            "amount": 42000,
            "description": "Total loss after motorway collision",
            "repairer": "garage-77"
        },
        "policy": {"expiry": "2026-01-31"},
        "request": {"ip": "203.0.113.9"}
    }));

    for name in engine.condition_names() {
        match engine.evaluate(name, claim.clone()).await {
            Ok(Some(result)) => println!("  {:<24} {}", name, result),
            Ok(None) => println!("  {:<24} (null)", name),
            Err(SdkError::Provider(error)) => {
                println!("  {:<24} error [{}]: {}", name, error.code(), error)
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(())
}
