//! Text conditions

use super::{resolve_optional, BoxedProvider, Predicate, Provider};
use crate::context::ResolveContext;
use async_trait::async_trait;
use conval_core::{Data, ProviderError, ProviderResult};
use conval_parser::TextOperation;
use regex::Regex;
use std::sync::Arc;

/// Contains / starts-with / ends-with / equality over two strings
#[derive(Debug)]
pub struct TextProvider {
    operation: TextOperation,
    text: BoxedProvider<String>,
    comparand: BoxedProvider<String>,
    ignore_case: Option<BoxedProvider<bool>>,
}

impl TextProvider {
    pub fn new(
        operation: TextOperation,
        text: BoxedProvider<String>,
        comparand: BoxedProvider<String>,
        ignore_case: Option<BoxedProvider<bool>>,
    ) -> Self {
        Self {
            operation,
            text,
            comparand,
            ignore_case,
        }
    }

    fn apply(&self, text: &str, comparand: &str) -> bool {
        match self.operation {
            TextOperation::Contains => text.contains(comparand),
            TextOperation::StartsWith => text.starts_with(comparand),
            TextOperation::EndsWith => text.ends_with(comparand),
            TextOperation::EqualTo => text == comparand,
        }
    }
}

#[async_trait]
impl Provider<bool> for TextProvider {
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<bool> {
        let (text, comparand, ignore_case) = futures::join!(
            self.text.resolve(ctx),
            self.comparand.resolve(ctx),
            resolve_optional(&self.ignore_case, ctx)
        );
        let (text, comparand) = (text?, comparand?);
        let ignore_case = ignore_case?.into_value().unwrap_or(false);

        let (Some(text), Some(comparand)) = (text.value(), comparand.value()) else {
            tracing::debug!("Null operand in text {}, returning false", self.operation.key());
            return Ok(Data::new(false));
        };

        let matched = if ignore_case {
            self.apply(&text.to_lowercase(), &comparand.to_lowercase())
        } else {
            self.apply(text, comparand)
        };
        Ok(Data::new(matched))
    }
}

/// True when the pattern (second operand) matches anywhere in the text.
///
/// The pattern is compiled on every resolution; a malformed pattern is an
/// `InvalidRegex` error.
pub fn regex_match() -> Predicate<String, String> {
    Arc::new(|text: &String, pattern: &String| -> Result<bool, ProviderError> {
        let regex = Regex::new(pattern).map_err(|err| ProviderError::InvalidRegex {
            pattern: pattern.clone(),
            reason: err.to_string(),
        })?;
        Ok(regex.is_match(text))
    })
}
