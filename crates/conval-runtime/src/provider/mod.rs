//! Provider graph
//!
//! A provider is an immutable node that resolves a typed value against a
//! [`ResolveContext`]. Conditions are providers of `bool`; value positions
//! inside a condition are providers of the type that position compares.
//!
//! Trees are built once per release and shared through `Arc`, so the same
//! tree can serve any number of concurrent evaluations.

mod comparison;
mod logical;
mod membership;
mod network;
mod path;
mod text;
mod value;

pub use comparison::{ordering, within_period, ComparisonProvider, Predicate};
pub use logical::{AndProvider, NotProvider, OrProvider, XorProvider};
pub use membership::{list_contains, object_contains_property};
pub use network::ip_in_range;
pub use path::{FallbackPolicy, PathLookupProvider};
pub use text::{regex_match, TextProvider};
pub use value::{ClockProvider, ServiceProvider};

use crate::context::ResolveContext;
use async_trait::async_trait;
use conval_core::{Data, ProviderResult};
use std::fmt::Debug;
use std::sync::Arc;

/// A node that resolves a value of type `T`
#[async_trait]
pub trait Provider<T>: Send + Sync + Debug {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<T>;
}

/// Shared, type-erased provider
pub type BoxedProvider<T> = Arc<dyn Provider<T>>;

/// Provider of a value fixed at build time
#[derive(Debug, Clone)]
pub struct ConstantProvider<T> {
    value: Option<T>,
}

impl<T> ConstantProvider<T> {
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// A provider that always resolves to null data
    pub fn null() -> Self {
        Self { value: None }
    }
}

#[async_trait]
impl<T> Provider<T> for ConstantProvider<T>
where
    T: Clone + Send + Sync + Debug,
{
    async fn resolve(&self, _ctx: &ResolveContext) -> ProviderResult<T> {
        Ok(Data::from_option(self.value.clone()))
    }
}

/// Resolve an optional provider, treating an absent one as null
pub(crate) async fn resolve_optional<T>(
    provider: &Option<BoxedProvider<T>>,
    ctx: &ResolveContext,
) -> ProviderResult<T> {
    match provider {
        Some(provider) => provider.resolve(ctx).await,
        None => Ok(Data::null()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_constant_provider() {
        let ctx = ResolveContext::default();
        let provider = ConstantProvider::new(7i64);
        assert_eq!(provider.resolve(&ctx).await.unwrap(), Data::new(7));

        let null = ConstantProvider::<i64>::null();
        assert!(null.resolve(&ctx).await.unwrap().is_null());
    }
}
