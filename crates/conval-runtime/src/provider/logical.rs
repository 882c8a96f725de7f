//! Logical combinators
//!
//! Combinators never short-circuit: every child is resolved, concurrently,
//! and the results are combined strictly by position. A failing child fails
//! the combinator even when an earlier child already decided the outcome,
//! and when several children fail the first one by position wins.

use super::{BoxedProvider, Provider};
use crate::context::ResolveContext;
use async_trait::async_trait;
use conval_core::{Data, ProviderResult};
use futures::future::join_all;

/// Resolve all children together and return their values by position
async fn resolve_all(
    children: &[BoxedProvider<bool>],
    ctx: &ResolveContext,
) -> Result<Vec<Option<bool>>, conval_core::ProviderError> {
    let results = join_all(children.iter().map(|child| child.resolve(ctx))).await;
    results
        .into_iter()
        .map(|result| result.map(Data::into_value))
        .collect()
}

/// True iff every child resolves `true`; empty is `true`
#[derive(Debug)]
pub struct AndProvider {
    children: Vec<BoxedProvider<bool>>,
}

impl AndProvider {
    pub fn new(children: Vec<BoxedProvider<bool>>) -> Self {
        Self { children }
    }
}

#[async_trait]
impl Provider<bool> for AndProvider {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<bool> {
        let values = resolve_all(&self.children, ctx).await?;
        Ok(Data::new(values.iter().all(|value| *value == Some(true))))
    }
}

/// True iff at least one child resolves `true`; empty is `false`
#[derive(Debug)]
pub struct OrProvider {
    children: Vec<BoxedProvider<bool>>,
}

impl OrProvider {
    pub fn new(children: Vec<BoxedProvider<bool>>) -> Self {
        Self { children }
    }
}

#[async_trait]
impl Provider<bool> for OrProvider {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<bool> {
        let values = resolve_all(&self.children, ctx).await?;
        Ok(Data::new(values.iter().any(|value| *value == Some(true))))
    }
}

/// Negation; null stays null
#[derive(Debug)]
pub struct NotProvider {
    child: BoxedProvider<bool>,
}

impl NotProvider {
    pub fn new(child: BoxedProvider<bool>) -> Self {
        Self { child }
    }
}

#[async_trait]
impl Provider<bool> for NotProvider {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<bool> {
        Ok(self.child.resolve(ctx).await?.map(|value| !value))
    }
}

/// Exclusive or of two conditions; null if either side is null
#[derive(Debug)]
pub struct XorProvider {
    first: BoxedProvider<bool>,
    second: BoxedProvider<bool>,
}

impl XorProvider {
    pub fn new(first: BoxedProvider<bool>, second: BoxedProvider<bool>) -> Self {
        Self { first, second }
    }
}

#[async_trait]
impl Provider<bool> for XorProvider {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<bool> {
        let (first, second) = futures::join!(self.first.resolve(ctx), self.second.resolve(ctx));
        match (first?.into_value(), second?.into_value()) {
            (Some(a), Some(b)) => Ok(Data::new(a != b)),
            _ => Ok(Data::null()),
        }
    }
}
