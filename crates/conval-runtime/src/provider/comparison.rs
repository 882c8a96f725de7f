//! Generic two-operand comparison
//!
//! Ordering comparisons, regex matching, period checks, IP range checks and
//! the membership tests are all instances of [`ComparisonProvider`]: two
//! operand providers resolved together and a predicate applied to their
//! values.

use super::{BoxedProvider, Provider};
use crate::context::ResolveContext;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use conval_core::{Data, Interval, ProviderError, ProviderResult};
use conval_parser::ComparisonOperator;
use std::fmt;
use std::sync::Arc;

/// Predicate over resolved operand values
pub type Predicate<A, B> = Arc<dyn Fn(&A, &B) -> Result<bool, ProviderError> + Send + Sync>;

/// Ordering predicate for an operator over any `PartialOrd` type
pub fn ordering<T>(operator: ComparisonOperator) -> Predicate<T, T>
where
    T: PartialOrd + 'static,
{
    let compare: fn(&T, &T) -> bool = match operator {
        ComparisonOperator::LessThan => |a, b| a < b,
        ComparisonOperator::LessThanOrEqual => |a, b| a <= b,
        ComparisonOperator::Equal => |a, b| a == b,
        ComparisonOperator::GreaterThan => |a, b| a > b,
        ComparisonOperator::GreaterThanOrEqual => |a, b| a >= b,
    };
    Arc::new(move |a: &T, b: &T| -> Result<bool, ProviderError> { Ok(compare(a, b)) })
}

/// True when the instant lies in the half-open period `[start, end)`
pub fn within_period() -> Predicate<DateTime<FixedOffset>, Interval> {
    Arc::new(
        |instant: &DateTime<FixedOffset>, period: &Interval| -> Result<bool, ProviderError> {
            Ok(period.contains(instant))
        },
    )
}

/// Condition comparing the values of two providers
pub struct ComparisonProvider<A, B> {
    label: String,
    first: BoxedProvider<A>,
    second: BoxedProvider<B>,
    predicate: Predicate<A, B>,
}

impl<A, B> ComparisonProvider<A, B> {
    pub fn new(
        label: impl Into<String>,
        first: BoxedProvider<A>,
        second: BoxedProvider<B>,
        predicate: Predicate<A, B>,
    ) -> Self {
        Self {
            label: label.into(),
            first,
            second,
            predicate,
        }
    }
}

impl<A, B> fmt::Debug for ComparisonProvider<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonProvider")
            .field("label", &self.label)
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

#[async_trait]
impl<A, B> Provider<bool> for ComparisonProvider<A, B>
where
    A: fmt::Debug + Send + Sync + 'static,
    B: fmt::Debug + Send + Sync + 'static,
{
    async fn resolve(&self, ctx: &ResolveContext) -> ProviderResult<bool> {
        let (first, second) = futures::join!(self.first.resolve(ctx), self.second.resolve(ctx));
        let (first, second) = (first?, second?);

        match (first.value(), second.value()) {
            (Some(a), Some(b)) => Ok(Data::new((self.predicate)(a, b)?)),
            (a, b) => {
                tracing::debug!(
                    "Null operand in {}: {:?}, {:?}, returning false",
                    self.label,
                    a,
                    b
                );
                Ok(Data::new(false))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ConstantProvider;
    use chrono::NaiveTime;

    fn comparison<T>(a: Option<T>, operator: ComparisonOperator, b: T) -> ComparisonProvider<T, T>
    where
        T: PartialOrd + Clone + fmt::Debug + Send + Sync + 'static,
    {
        let first = match a {
            Some(a) => ConstantProvider::new(a),
            None => ConstantProvider::null(),
        };
        ComparisonProvider::new(
            "test",
            Arc::new(first),
            Arc::new(ConstantProvider::new(b)),
            ordering(operator),
        )
    }

    #[tokio::test]
    async fn test_ordering_operators() {
        let ctx = ResolveContext::default();
        let cases = [
            (ComparisonOperator::LessThan, false),
            (ComparisonOperator::LessThanOrEqual, true),
            (ComparisonOperator::Equal, true),
            (ComparisonOperator::GreaterThan, false),
            (ComparisonOperator::GreaterThanOrEqual, true),
        ];
        for (operator, expected) in cases {
            let result = comparison(Some(5i64), operator, 5).resolve(&ctx).await.unwrap();
            assert_eq!(result, Data::new(expected), "operator {}", operator);
        }
    }

    #[tokio::test]
    async fn test_time_comparison() {
        let ctx = ResolveContext::default();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let result = comparison(Some(nine), ComparisonOperator::LessThan, ten)
            .resolve(&ctx)
            .await
            .unwrap();
        assert_eq!(result, Data::new(true));
    }

    #[test]
    fn test_period_is_half_open() {
        let at = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();
        let period = Interval::new(at("2024-01-01T00:00:00Z"), at("2024-02-01T00:00:00Z")).unwrap();
        let within = within_period();
        assert!(within(&at("2024-01-01T00:00:00Z"), &period).unwrap());
        assert!(within(&at("2024-01-31T23:59:59+00:00"), &period).unwrap());
        assert!(!within(&at("2024-02-01T00:00:00Z"), &period).unwrap());
        assert!(within(&at("2024-02-01T00:59:00+01:00"), &period).unwrap());
    }

    #[tokio::test]
    async fn test_null_operand_is_false() {
        let ctx = ResolveContext::default();
        let result = comparison(None, ComparisonOperator::LessThan, 1.5f64)
            .resolve(&ctx)
            .await
            .unwrap();
        assert_eq!(result, Data::new(false));
    }
}
