//! Clock and service value providers

use super::{resolve_optional, BoxedProvider, Provider};
use crate::context::ResolveContext;
use crate::service::ValueService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conval_core::{Data, DataType, ProviderError, ProviderResult, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Current instant from the context clock, converted to `T`
#[derive(Debug)]
pub struct ClockProvider<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T: DataType> ClockProvider<T> {
    /// `None` when `T` cannot be produced from an instant
    pub fn new() -> Option<Self> {
        T::from_instant(DateTime::<Utc>::default())?;
        Some(Self {
            _target: PhantomData,
        })
    }
}

#[async_trait]
impl<T: DataType> Provider<T> for ClockProvider<T> {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<T> {
        Ok(Data::from_option(T::from_instant(ctx.now())))
    }
}

/// Value returned by a named service, converted to `T`
pub struct ServiceProvider<T> {
    name: String,
    service: Arc<dyn ValueService>,
    input: Option<BoxedProvider<Value>>,
    _target: PhantomData<fn() -> T>,
}

impl<T: DataType> ServiceProvider<T> {
    pub fn new(
        name: impl Into<String>,
        service: Arc<dyn ValueService>,
        input: Option<BoxedProvider<Value>>,
    ) -> Self {
        Self {
            name: name.into(),
            service,
            input,
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ServiceProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("name", &self.name)
            .field("input", &self.input)
            .finish()
    }
}

#[async_trait]
impl<T: DataType> Provider<T> for ServiceProvider<T> {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<T> {
        let input = resolve_optional(&self.input, ctx)
            .await?
            .into_value()
            .unwrap_or_default();
        let output = self.service.call(input).await?;
        if output.is_null() {
            return Ok(Data::null());
        }

        T::from_value(&output)
            .map(Data::new)
            .ok_or_else(|| ProviderError::TypeMismatch {
                path: format!("service:{}", self.name),
                expected: T::NAME.to_string(),
                actual: output.type_name().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FixedClock;
    use crate::service::StaticService;
    use chrono::{NaiveDate, NaiveTime};

    fn ctx() -> ResolveContext {
        let instant = DateTime::parse_from_rfc3339("2024-03-15T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        ResolveContext::default().with_clock(Arc::new(FixedClock(instant)))
    }

    #[tokio::test]
    async fn test_clock_targets() {
        let date = ClockProvider::<NaiveDate>::new().unwrap();
        assert_eq!(
            date.resolve(&ctx()).await.unwrap(),
            Data::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );

        let time = ClockProvider::<NaiveTime>::new().unwrap();
        assert_eq!(
            time.resolve(&ctx()).await.unwrap(),
            Data::new(NaiveTime::from_hms_opt(8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_clock_rejects_non_temporal_targets() {
        assert!(ClockProvider::<i64>::new().is_none());
        assert!(ClockProvider::<String>::new().is_none());
    }

    #[tokio::test]
    async fn test_service_output_conversion() {
        let provider =
            ServiceProvider::<f64>::new("score", Arc::new(StaticService::new("0.75")), None);
        assert_eq!(provider.resolve(&ctx()).await.unwrap(), Data::new(0.75));

        let provider = ServiceProvider::<f64>::new("score", Arc::new(StaticService::new(true)), None);
        let error = provider.resolve(&ctx()).await.unwrap_err();
        assert_eq!(
            error,
            ProviderError::TypeMismatch {
                path: "service:score".to_string(),
                expected: "number".to_string(),
                actual: "boolean".to_string(),
            }
        );
    }
}
