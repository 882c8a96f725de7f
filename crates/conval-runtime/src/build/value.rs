//! Builders for typed value positions

use super::{optional, BuildContext, Buildable};
use crate::error::{BuildError, Result};
use crate::provider::{
    BoxedProvider, ClockProvider, ConstantProvider, FallbackPolicy, PathLookupProvider,
    ServiceProvider,
};
use conval_core::{DataType, PathExpression, Value};
use conval_parser::{PathLookupConfig, ServiceConfig, ValueConfig};
use std::sync::Arc;

impl<T: DataType> Buildable<T> for ValueConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<T>> {
        match self {
            ValueConfig::Literal(Value::Null) => Ok(Arc::new(ConstantProvider::<T>::null())),
            ValueConfig::Literal(literal) => match T::from_value(&literal) {
                Some(value) => Ok(Arc::new(ConstantProvider::new(value))),
                None => Err(BuildError::InvalidLiteral {
                    expected: T::NAME.to_string(),
                    value: literal.to_string(),
                }),
            },
            ValueConfig::Path(config) => config.build(ctx),
            ValueConfig::Service(config) => config.build(ctx),
            ValueConfig::Now => match ClockProvider::<T>::new() {
                Some(provider) => Ok(Arc::new(provider)),
                None => Err(BuildError::UnsupportedClockTarget(T::NAME.to_string())),
            },
        }
    }
}

impl<T: DataType> Buildable<T> for PathLookupConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<T>> {
        let path = PathExpression::parse(&self.path)?;

        let policy = FallbackPolicy {
            value_if_not_found: optional::<Value, _>(self.value_if_not_found, ctx)?,
            raise_error_if_not_found: optional(self.raise_error_if_not_found, ctx)?,
            value_if_null: optional::<Value, _>(self.value_if_null, ctx)?,
            raise_error_if_null: optional(self.raise_error_if_null, ctx)?,
            value_if_type_mismatch: optional::<Value, _>(self.value_if_type_mismatch, ctx)?,
            raise_error_if_type_mismatch: optional(self.raise_error_if_type_mismatch, ctx)?,
            default_value: optional::<Value, _>(self.default_value, ctx)?,
        };

        let mut provider = PathLookupProvider::<T>::new(path).with_policy(policy);
        if let Some(data_source) = optional::<Value, _>(self.data_source, ctx)? {
            provider = provider.with_data_source(data_source);
        }
        Ok(Arc::new(provider))
    }
}

impl<T: DataType> Buildable<T> for ServiceConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<T>> {
        let service = ctx.service(&self.service)?;
        let input = optional::<Value, _>(self.input, ctx)?;
        Ok(Arc::new(ServiceProvider::<T>::new(self.service, service, input)))
    }
}
