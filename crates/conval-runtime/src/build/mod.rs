//! Building provider graphs from configuration
//!
//! Every configuration structure knows how to turn itself into a provider
//! through [`Buildable`]. Building happens once, when a release is activated;
//! any error here is a configuration error and stops the activation.

mod condition;
mod value;

use crate::error::{BuildError, Result};
use crate::provider::BoxedProvider;
use crate::service::ValueService;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Configuration that can produce a provider of `T`
pub trait Buildable<T> {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<T>>;
}

/// Everything builders may need besides the configuration itself
#[derive(Clone, Default)]
pub struct BuildContext {
    services: HashMap<String, Arc<dyn ValueService>>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under a name
    pub fn with_service(mut self, name: impl Into<String>, service: Arc<dyn ValueService>) -> Self {
        self.services.insert(name.into(), service);
        self
    }

    pub fn register_service(&mut self, name: impl Into<String>, service: Arc<dyn ValueService>) {
        self.services.insert(name.into(), service);
    }

    pub fn service(&self, name: &str) -> Result<Arc<dyn ValueService>> {
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownService(name.to_string()))
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.services.keys().collect();
        names.sort();
        f.debug_struct("BuildContext").field("services", &names).finish()
    }
}

/// Unwrap a sub-builder the selected shape requires
fn required<B>(config: Option<B>, condition: &str, field: &str) -> Result<B> {
    config.ok_or_else(|| BuildError::MissingBuilder {
        condition: condition.to_string(),
        field: field.to_string(),
    })
}

/// Build a sub-builder the selected shape can do without
fn optional<T, B: Buildable<T>>(
    config: Option<Box<B>>,
    ctx: &BuildContext,
) -> Result<Option<BoxedProvider<T>>> {
    config.map(|config| (*config).build(ctx)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StaticService;

    #[test]
    fn test_service_registration() {
        let ctx = BuildContext::new().with_service("score", Arc::new(StaticService::new(1i64)));
        assert!(ctx.service("score").is_ok());
        assert!(matches!(
            ctx.service("missing"),
            Err(BuildError::UnknownService(name)) if name == "missing"
        ));
    }
}
