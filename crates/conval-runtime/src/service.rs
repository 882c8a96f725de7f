//! Injected value services
//!
//! Services let a release read values that are not part of the data graph,
//! such as a customer lookup or a fraud score. They are registered by name
//! when the engine is built and called from `{"service": ...}` providers.

use async_trait::async_trait;
use conval_core::{ProviderError, Value};

/// An external source of values
#[async_trait]
pub trait ValueService: Send + Sync {
    /// Call the service with the resolved input (`Value::Null` when none is configured)
    async fn call(&self, input: Value) -> Result<Value, ProviderError>;
}

/// Service returning a fixed value, useful for tests and static lookups
#[derive(Debug, Clone)]
pub struct StaticService {
    value: Value,
}

impl StaticService {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[async_trait]
impl ValueService for StaticService {
    async fn call(&self, _input: Value) -> Result<Value, ProviderError> {
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_service_ignores_input() {
        let service = StaticService::new(42i64);
        let result = service.call(Value::String("x".to_string())).await.unwrap();
        assert_eq!(result, Value::Number(42.0));
    }
}
