//! Path lookup with a configurable fallback policy
//!
//! A lookup reads a value from the data graph (or from a custom data source)
//! and converts it to the target type in four stages:
//!
//! 1. the path is not found
//! 2. the value is null
//! 3. the value converts to the target type
//! 4. the value does not convert
//!
//! Stages 1, 2 and 4 either raise a structured error, substitute a fallback
//! value or produce null data, as configured. A fallback taken in one stage
//! still goes through the checks of the following stages.

use super::{resolve_optional, BoxedProvider, Provider};
use crate::context::ResolveContext;
use async_trait::async_trait;
use conval_core::{Data, DataType, Lookup, PathExpression, ProviderError, ProviderResult, Value};
use std::marker::PhantomData;

/// Per-lookup fallback configuration.
///
/// Flags that are absent or resolve null count as `false`.
#[derive(Debug, Default)]
pub struct FallbackPolicy {
    pub value_if_not_found: Option<BoxedProvider<Value>>,
    pub raise_error_if_not_found: Option<BoxedProvider<bool>>,
    pub value_if_null: Option<BoxedProvider<Value>>,
    pub raise_error_if_null: Option<BoxedProvider<bool>>,
    pub value_if_type_mismatch: Option<BoxedProvider<Value>>,
    pub raise_error_if_type_mismatch: Option<BoxedProvider<bool>>,
    /// Used by any stage without its own fallback value
    pub default_value: Option<BoxedProvider<Value>>,
}

impl FallbackPolicy {
    async fn raise(
        &self,
        flag: &Option<BoxedProvider<bool>>,
        ctx: &ResolveContext,
    ) -> Result<bool, ProviderError> {
        Ok(resolve_optional(flag, ctx).await?.into_value().unwrap_or(false))
    }

    /// Resolve the stage fallback, or the default value when the stage has none.
    /// `None` means no fallback is configured.
    async fn fallback(
        &self,
        stage: &Option<BoxedProvider<Value>>,
        ctx: &ResolveContext,
    ) -> Result<Option<Value>, ProviderError> {
        match stage.as_ref().or(self.default_value.as_ref()) {
            Some(provider) => Ok(Some(provider.resolve(ctx).await?.into_value().unwrap_or_default())),
            None => Ok(None),
        }
    }
}

/// Typed lookup of a path expression
#[derive(Debug)]
pub struct PathLookupProvider<T> {
    path: PathExpression,
    data_source: Option<BoxedProvider<Value>>,
    policy: FallbackPolicy,
    _target: PhantomData<fn() -> T>,
}

impl<T: DataType> PathLookupProvider<T> {
    pub fn new(path: PathExpression) -> Self {
        Self {
            path,
            data_source: None,
            policy: FallbackPolicy::default(),
            _target: PhantomData,
        }
    }

    /// Read from the given object instead of the context data graph
    pub fn with_data_source(mut self, data_source: BoxedProvider<Value>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn type_mismatch(&self, actual: &Value) -> ProviderError {
        ProviderError::TypeMismatch {
            path: self.path.to_string(),
            expected: T::NAME.to_string(),
            actual: actual.type_name().to_string(),
        }
    }
}

#[async_trait]
impl<T: DataType> Provider<T> for PathLookupProvider<T> {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<T> {
        let policy = &self.policy;

        let custom_source = match &self.data_source {
            Some(provider) => Some(provider.resolve(ctx).await?.into_value().unwrap_or_default()),
            None => None,
        };
        let source = custom_source.as_ref().unwrap_or_else(|| ctx.data());

        // Stage 1: not found
        let value = match self.path.lookup(source) {
            Lookup::Found(value) => value.clone(),
            Lookup::NotFound => {
                if policy.raise(&policy.raise_error_if_not_found, ctx).await? {
                    return Err(ProviderError::PathNotFound {
                        path: self.path.to_string(),
                    });
                }
                match policy.fallback(&policy.value_if_not_found, ctx).await? {
                    Some(fallback) => fallback,
                    None => return Ok(Data::null()),
                }
            }
        };

        // Stage 2: null
        let value = if value.is_null() {
            if policy.raise(&policy.raise_error_if_null, ctx).await? {
                return Err(ProviderError::NullValue {
                    path: self.path.to_string(),
                });
            }
            match policy.fallback(&policy.value_if_null, ctx).await? {
                Some(fallback) if !fallback.is_null() => fallback,
                _ => return Ok(Data::null()),
            }
        } else {
            value
        };

        // Stage 3: conversion
        if let Some(parsed) = T::from_value(&value) {
            return Ok(Data::new(parsed));
        }

        // Stage 4: type mismatch
        if policy.raise(&policy.raise_error_if_type_mismatch, ctx).await? {
            return Err(self.type_mismatch(&value));
        }
        match policy.fallback(&policy.value_if_type_mismatch, ctx).await? {
            Some(fallback) if !fallback.is_null() => T::from_value(&fallback)
                .map(Data::new)
                .ok_or_else(|| self.type_mismatch(&fallback)),
            _ => Ok(Data::null()),
        }
    }
}
