//! Builders for boolean conditions

use super::{optional, required, BuildContext, Buildable};
use crate::error::Result;
use crate::provider::{
    ip_in_range, list_contains, object_contains_property, ordering, regex_match, within_period,
    AndProvider, BoxedProvider, ComparisonProvider, ConstantProvider, NotProvider, OrProvider,
    Predicate, TextProvider, XorProvider,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use conval_core::{DataType, Interval, Map, Value};
use conval_parser::{
    ComparisonConfig, ConditionConfig, DataKind, IpRangeConfig, ListContainsConfig, LogicalConfig,
    NotConfig, ObjectPropertyConfig, PeriodConfig, RegexConfig, TextConfig, ValueConfig,
    XorConfig,
};
use std::sync::Arc;

impl Buildable<bool> for ConditionConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        match self {
            ConditionConfig::Constant(value) => Ok(Arc::new(ConstantProvider::new(value))),
            ConditionConfig::And(config) => {
                Ok(Arc::new(AndProvider::new(build_children(config, ctx)?)))
            }
            ConditionConfig::Or(config) => {
                Ok(Arc::new(OrProvider::new(build_children(config, ctx)?)))
            }
            ConditionConfig::Not(config) => config.build(ctx),
            ConditionConfig::Xor(config) => config.build(ctx),
            ConditionConfig::Comparison(config) => config.build(ctx),
            ConditionConfig::Period(config) => config.build(ctx),
            ConditionConfig::IpRange(config) => config.build(ctx),
            ConditionConfig::ListContains(config) => config.build(ctx),
            ConditionConfig::ObjectProperty(config) => config.build(ctx),
            ConditionConfig::Text(config) => config.build(ctx),
            ConditionConfig::Regex(config) => config.build(ctx),
            ConditionConfig::PathLookup(config) => config.build(ctx),
            ConditionConfig::Service(config) => config.build(ctx),
        }
    }
}

fn build_children(config: LogicalConfig, ctx: &BuildContext) -> Result<Vec<BoxedProvider<bool>>> {
    config
        .conditions
        .into_iter()
        .map(|condition| condition.build(ctx))
        .collect()
}

/// Build both operands of a two-operand condition into a comparison
fn compare<A: DataType, B: DataType>(
    condition: &str,
    (first_field, first): (&str, Option<ValueConfig>),
    (second_field, second): (&str, Option<ValueConfig>),
    predicate: Predicate<A, B>,
    ctx: &BuildContext,
) -> Result<BoxedProvider<bool>> {
    let first: BoxedProvider<A> = required(first, condition, first_field)?.build(ctx)?;
    let second: BoxedProvider<B> = required(second, condition, second_field)?.build(ctx)?;
    Ok(Arc::new(ComparisonProvider::new(
        condition, first, second, predicate,
    )))
}

impl Buildable<bool> for NotConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        let child = (*required(self.condition, "not", "not")?).build(ctx)?;
        Ok(Arc::new(NotProvider::new(child)))
    }
}

impl Buildable<bool> for XorConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        let first = (*required(self.first_condition, "xor", "firstCondition")?).build(ctx)?;
        let second = (*required(self.second_condition, "xor", "secondCondition")?).build(ctx)?;
        Ok(Arc::new(XorProvider::new(first, second)))
    }
}

impl Buildable<bool> for ComparisonConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        fn typed<T: DataType + PartialOrd>(
            config: ComparisonConfig,
            ctx: &BuildContext,
        ) -> Result<BoxedProvider<bool>> {
            let operator_key = config
                .kind
                .operator_keys()
                .iter()
                .find(|(_, operator)| *operator == config.operator)
                .map(|(key, _)| *key)
                .unwrap_or("operator");
            let label = format!("{} {}", config.kind.key(), config.operator);
            compare::<T, T>(
                &label,
                (config.kind.key(), config.first),
                (operator_key, config.second),
                ordering(config.operator),
                ctx,
            )
        }

        match self.kind {
            DataKind::Date => typed::<NaiveDate>(self, ctx),
            DataKind::DateTime => typed::<DateTime<FixedOffset>>(self, ctx),
            DataKind::Time => typed::<NaiveTime>(self, ctx),
            DataKind::Integer => typed::<i64>(self, ctx),
            DataKind::Number => typed::<f64>(self, ctx),
        }
    }
}

impl Buildable<bool> for PeriodConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        compare::<DateTime<FixedOffset>, Interval>(
            "dateTimeInPeriod",
            ("dateTime", self.date_time),
            ("isInPeriod", self.is_in_period),
            within_period(),
            ctx,
        )
    }
}

impl Buildable<bool> for IpRangeConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        compare::<String, String>(
            "ipAddressInRange",
            ("ipAddress", self.ip_address),
            ("isInRange", self.is_in_range),
            ip_in_range(),
            ctx,
        )
    }
}

impl Buildable<bool> for ListContainsConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        compare::<Vec<Value>, Value>(
            "listContainsValue",
            ("list", self.list),
            ("value", self.value),
            list_contains(),
            ctx,
        )
    }
}

impl Buildable<bool> for ObjectPropertyConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        compare::<Map, String>(
            "objectContainsProperty",
            ("object", self.object),
            ("propertyName", self.property_name),
            object_contains_property(),
            ctx,
        )
    }
}

impl Buildable<bool> for RegexConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        compare::<String, String>(
            "regexMatch",
            ("text", self.text),
            ("regexPattern", self.regex_pattern),
            regex_match(),
            ctx,
        )
    }
}

impl Buildable<bool> for TextConfig {
    fn build(self, ctx: &BuildContext) -> Result<BoxedProvider<bool>> {
        let operation = self.operation.key();
        let text = required(self.text, "text", "text")?.build(ctx)?;
        let comparand = required(self.comparand, "text", operation)?.build(ctx)?;
        let ignore_case = optional(self.ignore_case, ctx)?;
        Ok(Arc::new(TextProvider::new(
            self.operation,
            text,
            comparand,
            ignore_case,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResolveContext;
    use crate::error::BuildError;
    use conval_core::Data;
    use serde_json::json;

    fn condition(config: serde_json::Value) -> ConditionConfig {
        serde_json::from_value(config).unwrap()
    }

    async fn evaluate(config: serde_json::Value, data: serde_json::Value) -> Data<bool> {
        let provider = condition(config).build(&BuildContext::new()).unwrap();
        provider
            .resolve(&ResolveContext::from_json(data))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_number_comparison_against_data() {
        let result = evaluate(
            json!({"number": {"path": "claim.amount"}, "isGreaterThan": 1000}),
            json!({"claim": {"amount": 1500.5}}),
        )
        .await;
        assert_eq!(result, Data::new(true));
    }

    #[tokio::test]
    async fn test_date_time_equality_across_offsets() {
        let result = evaluate(
            json!({"dateTime": "2024-01-01T12:00:00+02:00", "isEqualTo": "2024-01-01T10:00:00Z"}),
            json!({}),
        )
        .await;
        assert_eq!(result, Data::new(true));
    }

    #[tokio::test]
    async fn test_period_with_object_literal() {
        let result = evaluate(
            json!({
                "dateTime": {"path": "claim.reportedAt"},
                "isInPeriod": {"start": "2024-01-01T00:00:00Z", "end": "2025-01-01T00:00:00Z"}
            }),
            json!({"claim": {"reportedAt": "2024-06-30T09:15:00Z"}}),
        )
        .await;
        assert_eq!(result, Data::new(true));
    }

    #[test]
    fn test_missing_operand_is_build_error() {
        let config = condition(json!({"list": null, "value": 1}));
        let error = config.build(&BuildContext::new()).unwrap_err();
        assert!(matches!(
            error,
            BuildError::MissingBuilder { ref condition, ref field }
                if condition == "listContainsValue" && field == "list"
        ));
    }

    #[test]
    fn test_invalid_literal_in_comparison() {
        let config = condition(json!({"integer": "abc", "isLessThan": 3}));
        let error = config.build(&BuildContext::new()).unwrap_err();
        assert!(matches!(error, BuildError::InvalidLiteral { .. }));
    }
}
