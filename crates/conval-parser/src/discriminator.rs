//! Discriminator resolver
//!
//! Authored configuration carries no type tag: the set of property keys in
//! an object decides which configuration type it represents. Shapes are
//! checked against a static table in a fixed priority order and the first
//! match wins, so ties cannot occur. An object no shape accepts is a
//! configuration error.
//!
//! # Condition shapes (in priority order)
//!
//! | keys                                                  | configuration          |
//! |-------------------------------------------------------|------------------------|
//! | `and`                                                 | [`LogicalConfig`]      |
//! | `or`                                                  | [`LogicalConfig`]      |
//! | `xor` (`firstCondition`, `secondCondition`)           | [`XorConfig`]          |
//! | `not`                                                 | [`NotConfig`]          |
//! | `ipAddress`, `isInRange`                              | [`IpRangeConfig`]      |
//! | `list`, `value`                                       | [`ListContainsConfig`] |
//! | `object`, `propertyName`                              | [`ObjectPropertyConfig`] |
//! | `text`, `regexPattern`                                | [`RegexConfig`]        |
//! | `text`, `contains\|startsWith\|endsWith\|isEqualTo`   | [`TextConfig`]         |
//! | `dateTime`, `isInPeriod`                              | [`PeriodConfig`]       |
//! | `date\|dateTime\|time\|integer\|number`, operator     | [`ComparisonConfig`]   |
//! | `path`                                                | [`PathLookupConfig`]   |
//! | `service`                                             | [`ServiceConfig`]      |
//!
//! A bare boolean (or a string spelling one) in a condition position is the
//! literal shorthand for a constant condition.

use crate::error::{ParseError, Result};
use crate::model::{
    ComparisonConfig, ConditionConfig, DataKind, IpRangeConfig, ListContainsConfig, LogicalConfig,
    NotConfig, ObjectPropertyConfig, PathLookupConfig, PeriodConfig, RegexConfig, ServiceConfig,
    TextConfig, TextOperation, ValueConfig, XorConfig,
};
use conval_core::{DataType, Value};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

type JsonMap = Map<String, JsonValue>;

/// One entry of a discriminator table
struct ShapeRule<T: 'static> {
    name: &'static str,
    matches: fn(&JsonMap) -> bool,
    resolve: fn(JsonMap) -> Result<T>,
}

static CONDITION_SHAPES: &[ShapeRule<ConditionConfig>] = &[
    ShapeRule {
        name: "and",
        matches: has_and,
        resolve: resolve_and,
    },
    ShapeRule {
        name: "or",
        matches: has_or,
        resolve: resolve_or,
    },
    ShapeRule {
        name: "xor",
        matches: has_xor,
        resolve: resolve_xor,
    },
    ShapeRule {
        name: "not",
        matches: has_not,
        resolve: resolve_not,
    },
    ShapeRule {
        name: "ipAddressInRange",
        matches: has_ip_range,
        resolve: resolve_ip_range,
    },
    ShapeRule {
        name: "listContainsValue",
        matches: has_list_contains,
        resolve: resolve_list_contains,
    },
    ShapeRule {
        name: "objectContainsProperty",
        matches: has_object_property,
        resolve: resolve_object_property,
    },
    ShapeRule {
        name: "regexMatch",
        matches: has_regex,
        resolve: resolve_regex,
    },
    ShapeRule {
        name: "text",
        matches: has_text_operation,
        resolve: resolve_text,
    },
    ShapeRule {
        name: "dateTimeInPeriod",
        matches: has_period,
        resolve: resolve_period,
    },
    ShapeRule {
        name: "dateComparison",
        matches: has_date,
        resolve: resolve_date,
    },
    ShapeRule {
        name: "dateTimeComparison",
        matches: has_date_time,
        resolve: resolve_date_time,
    },
    ShapeRule {
        name: "timeComparison",
        matches: has_time,
        resolve: resolve_time,
    },
    ShapeRule {
        name: "integerComparison",
        matches: has_integer,
        resolve: resolve_integer,
    },
    ShapeRule {
        name: "numberComparison",
        matches: has_number,
        resolve: resolve_number,
    },
    ShapeRule {
        name: "pathLookup",
        matches: has_path,
        resolve: resolve_path_condition,
    },
    ShapeRule {
        name: "service",
        matches: has_service,
        resolve: resolve_service_condition,
    },
];

static VALUE_SHAPES: &[ShapeRule<ValueConfig>] = &[
    ShapeRule {
        name: "pathLookup",
        matches: has_path,
        resolve: resolve_path_value,
    },
    ShapeRule {
        name: "service",
        matches: has_service,
        resolve: resolve_service_value,
    },
    ShapeRule {
        name: "now",
        matches: has_now,
        resolve: resolve_now,
    },
];

/// Resolve a parsed configuration value in a condition position
pub fn resolve_condition(raw: JsonValue) -> Result<ConditionConfig> {
    match raw {
        JsonValue::Object(map) => {
            let rule = CONDITION_SHAPES
                .iter()
                .find(|rule| (rule.matches)(&map))
                .ok_or_else(|| ParseError::UnresolvableShape {
                    target: "condition".to_string(),
                    keys: map.keys().cloned().collect(),
                })?;
            tracing::debug!("Resolved condition shape '{}'", rule.name);
            (rule.resolve)(map)
        }
        scalar => {
            let literal = Value::from(scalar);
            bool::from_value(&literal)
                .map(ConditionConfig::Constant)
                .ok_or_else(|| ParseError::InvalidShape {
                    target: "condition".to_string(),
                    message: format!(
                        "a {} literal cannot be used as a condition",
                        literal.type_name()
                    ),
                })
        }
    }
}

/// Resolve a parsed configuration value in a typed value position
pub fn resolve_value(raw: JsonValue) -> Result<ValueConfig> {
    match raw {
        JsonValue::Object(map) => match VALUE_SHAPES.iter().find(|rule| (rule.matches)(&map)) {
            Some(rule) => {
                tracing::debug!("Resolved value shape '{}'", rule.name);
                (rule.resolve)(map)
            }
            None => Ok(ValueConfig::Literal(Value::from(JsonValue::Object(map)))),
        },
        other => Ok(ValueConfig::Literal(Value::from(other))),
    }
}

/// Whether an array element is a comment token rather than a condition
fn is_comment(item: &JsonValue) -> bool {
    match item {
        JsonValue::String(s) => s.trim_start().starts_with("//"),
        JsonValue::Object(map) => map.len() == 1 && map.contains_key("$comment"),
        _ => false,
    }
}

fn deserialize<T: DeserializeOwned>(map: JsonMap) -> Result<T> {
    Ok(serde_json::from_value(JsonValue::Object(map))?)
}

fn single_key(map: &JsonMap, key: &str) -> bool {
    map.len() == 1 && map.contains_key(key)
}

// ========== Logical combinators ==========

fn has_and(map: &JsonMap) -> bool {
    single_key(map, "and")
}

fn has_or(map: &JsonMap) -> bool {
    single_key(map, "or")
}

fn has_xor(map: &JsonMap) -> bool {
    single_key(map, "xor")
}

fn has_not(map: &JsonMap) -> bool {
    single_key(map, "not")
}

fn resolve_and(mut map: JsonMap) -> Result<ConditionConfig> {
    let body = map.remove("and").unwrap_or(JsonValue::Null);
    Ok(ConditionConfig::And(resolve_logical("and", body)?))
}

fn resolve_or(mut map: JsonMap) -> Result<ConditionConfig> {
    let body = map.remove("or").unwrap_or(JsonValue::Null);
    Ok(ConditionConfig::Or(resolve_logical("or", body)?))
}

/// Children come either as an array or as `{conditions: [...]}`
fn resolve_logical(name: &str, body: JsonValue) -> Result<LogicalConfig> {
    let items = match body {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut inner) if inner.len() == 1 && inner.contains_key("conditions") => {
            match inner.remove("conditions") {
                Some(JsonValue::Array(items)) => items,
                _ => {
                    return Err(ParseError::InvalidShape {
                        target: name.to_string(),
                        message: "'conditions' must be an array".to_string(),
                    })
                }
            }
        }
        _ => {
            return Err(ParseError::InvalidShape {
                target: name.to_string(),
                message: "expected an array of conditions or {conditions: [...]}".to_string(),
            })
        }
    };

    let conditions = items
        .into_iter()
        .filter(|item| !is_comment(item))
        .map(resolve_condition)
        .collect::<Result<Vec<_>>>()?;

    Ok(LogicalConfig { conditions })
}

fn resolve_xor(mut map: JsonMap) -> Result<ConditionConfig> {
    match map.remove("xor") {
        Some(JsonValue::Object(inner)) => Ok(ConditionConfig::Xor(deserialize::<XorConfig>(inner)?)),
        _ => Err(ParseError::InvalidShape {
            target: "xor".to_string(),
            message: "expected {firstCondition, secondCondition}".to_string(),
        }),
    }
}

fn resolve_not(mut map: JsonMap) -> Result<ConditionConfig> {
    let condition = match map.remove("not") {
        None | Some(JsonValue::Null) => None,
        Some(inner) => Some(Box::new(resolve_condition(inner)?)),
    };
    Ok(ConditionConfig::Not(NotConfig { condition }))
}

// ========== Membership and format checks ==========

fn has_ip_range(map: &JsonMap) -> bool {
    map.contains_key("ipAddress") && map.contains_key("isInRange")
}

fn resolve_ip_range(map: JsonMap) -> Result<ConditionConfig> {
    Ok(ConditionConfig::IpRange(deserialize::<IpRangeConfig>(map)?))
}

fn has_list_contains(map: &JsonMap) -> bool {
    map.contains_key("list") && map.contains_key("value")
}

fn resolve_list_contains(map: JsonMap) -> Result<ConditionConfig> {
    Ok(ConditionConfig::ListContains(deserialize::<ListContainsConfig>(map)?))
}

fn has_object_property(map: &JsonMap) -> bool {
    map.contains_key("object") && map.contains_key("propertyName")
}

fn resolve_object_property(map: JsonMap) -> Result<ConditionConfig> {
    Ok(ConditionConfig::ObjectProperty(deserialize::<ObjectPropertyConfig>(map)?))
}

fn has_regex(map: &JsonMap) -> bool {
    map.contains_key("text") && map.contains_key("regexPattern")
}

fn resolve_regex(map: JsonMap) -> Result<ConditionConfig> {
    Ok(ConditionConfig::Regex(deserialize::<RegexConfig>(map)?))
}

fn has_text_operation(map: &JsonMap) -> bool {
    map.contains_key("text") && TextOperation::ALL.iter().any(|(key, _)| map.contains_key(*key))
}

fn resolve_text(mut map: JsonMap) -> Result<ConditionConfig> {
    let present: Vec<_> = TextOperation::ALL
        .iter()
        .filter(|(key, _)| map.contains_key(*key))
        .collect();
    if present.len() > 1 {
        return Err(ParseError::AmbiguousShape {
            target: "text".to_string(),
            keys: present.iter().map(|(key, _)| key.to_string()).collect(),
        });
    }
    let (key, operation) = *present[0];

    let text = take_value(&mut map, "text")?;
    let comparand = take_value(&mut map, key)?;
    let ignore_case = match map.remove("ignoreCase") {
        None | Some(JsonValue::Null) => None,
        Some(raw) => Some(Box::new(resolve_condition(raw)?)),
    };
    reject_unknown_keys("text", &map)?;

    Ok(ConditionConfig::Text(TextConfig {
        text,
        operation,
        comparand,
        ignore_case,
    }))
}

// ========== Comparisons ==========

fn has_period(map: &JsonMap) -> bool {
    map.contains_key("dateTime") && map.contains_key("isInPeriod")
}

fn resolve_period(map: JsonMap) -> Result<ConditionConfig> {
    Ok(ConditionConfig::Period(deserialize::<PeriodConfig>(map)?))
}

fn has_comparison(map: &JsonMap, kind: DataKind) -> bool {
    map.contains_key(kind.key())
        && kind
            .operator_keys()
            .iter()
            .any(|(key, _)| map.contains_key(*key))
}

fn has_date(map: &JsonMap) -> bool {
    has_comparison(map, DataKind::Date)
}

fn has_date_time(map: &JsonMap) -> bool {
    has_comparison(map, DataKind::DateTime)
}

fn has_time(map: &JsonMap) -> bool {
    has_comparison(map, DataKind::Time)
}

fn has_integer(map: &JsonMap) -> bool {
    has_comparison(map, DataKind::Integer)
}

fn has_number(map: &JsonMap) -> bool {
    has_comparison(map, DataKind::Number)
}

fn resolve_date(map: JsonMap) -> Result<ConditionConfig> {
    resolve_comparison(DataKind::Date, map)
}

fn resolve_date_time(map: JsonMap) -> Result<ConditionConfig> {
    resolve_comparison(DataKind::DateTime, map)
}

fn resolve_time(map: JsonMap) -> Result<ConditionConfig> {
    resolve_comparison(DataKind::Time, map)
}

fn resolve_integer(map: JsonMap) -> Result<ConditionConfig> {
    resolve_comparison(DataKind::Integer, map)
}

fn resolve_number(map: JsonMap) -> Result<ConditionConfig> {
    resolve_comparison(DataKind::Number, map)
}

fn resolve_comparison(kind: DataKind, mut map: JsonMap) -> Result<ConditionConfig> {
    let present: Vec<_> = kind
        .operator_keys()
        .iter()
        .filter(|(key, _)| map.contains_key(*key))
        .collect();
    if present.len() > 1 {
        return Err(ParseError::AmbiguousShape {
            target: kind.key().to_string(),
            keys: present.iter().map(|(key, _)| key.to_string()).collect(),
        });
    }
    let (key, operator) = *present[0];

    let first = take_value(&mut map, kind.key())?;
    let second = take_value(&mut map, key)?;
    reject_unknown_keys(kind.key(), &map)?;

    Ok(ConditionConfig::Comparison(ComparisonConfig {
        kind,
        operator,
        first,
        second,
    }))
}

// ========== Data access ==========

fn has_path(map: &JsonMap) -> bool {
    map.contains_key("path")
}

fn has_service(map: &JsonMap) -> bool {
    map.contains_key("service")
}

fn has_now(map: &JsonMap) -> bool {
    single_key(map, "now")
}

fn resolve_path_condition(map: JsonMap) -> Result<ConditionConfig> {
    Ok(ConditionConfig::PathLookup(deserialize::<PathLookupConfig>(map)?))
}

fn resolve_service_condition(map: JsonMap) -> Result<ConditionConfig> {
    Ok(ConditionConfig::Service(deserialize::<ServiceConfig>(map)?))
}

fn resolve_path_value(map: JsonMap) -> Result<ValueConfig> {
    Ok(ValueConfig::Path(deserialize::<PathLookupConfig>(map)?))
}

fn resolve_service_value(map: JsonMap) -> Result<ValueConfig> {
    Ok(ValueConfig::Service(deserialize::<ServiceConfig>(map)?))
}

fn resolve_now(_map: JsonMap) -> Result<ValueConfig> {
    Ok(ValueConfig::Now)
}

// ========== Helpers ==========

/// Remove a value-position key; a `null` value is treated as absent
fn take_value(map: &mut JsonMap, key: &str) -> Result<Option<ValueConfig>> {
    match map.remove(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(raw) => resolve_value(raw).map(Some),
    }
}

fn reject_unknown_keys(target: &str, remaining: &JsonMap) -> Result<()> {
    match remaining.keys().next() {
        Some(key) => Err(ParseError::InvalidShape {
            target: target.to_string(),
            message: format!("unknown field '{}'", key),
        }),
        None => Ok(()),
    }
}
