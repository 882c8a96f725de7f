//! Configuration model
//!
//! Data-only structures populated from authored configuration. Each
//! structure describes one condition or value provider shape and is turned
//! into a provider by the runtime's `Buildable` implementations.
//!
//! Sub-builders that a shape requires are still `Option`s: a key that is
//! present but `null` selects the shape and then fails at build time with a
//! missing-builder error.

use crate::discriminator;
use conval_core::Value;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Any configuration that resolves to a boolean
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionConfig {
    /// Literal shorthand (`true` / `false`)
    Constant(bool),
    And(LogicalConfig),
    Or(LogicalConfig),
    Not(NotConfig),
    Xor(XorConfig),
    Comparison(ComparisonConfig),
    Period(PeriodConfig),
    IpRange(IpRangeConfig),
    ListContains(ListContainsConfig),
    ObjectProperty(ObjectPropertyConfig),
    Text(TextConfig),
    Regex(RegexConfig),
    PathLookup(PathLookupConfig),
    Service(ServiceConfig),
}

impl ConditionConfig {
    /// Name of the shape, used in build errors
    pub fn kind(&self) -> &'static str {
        match self {
            ConditionConfig::Constant(_) => "constant",
            ConditionConfig::And(_) => "and",
            ConditionConfig::Or(_) => "or",
            ConditionConfig::Not(_) => "not",
            ConditionConfig::Xor(_) => "xor",
            ConditionConfig::Comparison(c) => c.kind.comparison_name(),
            ConditionConfig::Period(_) => "dateTimeInPeriod",
            ConditionConfig::IpRange(_) => "ipAddressInRange",
            ConditionConfig::ListContains(_) => "listContainsValue",
            ConditionConfig::ObjectProperty(_) => "objectContainsProperty",
            ConditionConfig::Text(_) => "text",
            ConditionConfig::Regex(_) => "regexMatch",
            ConditionConfig::PathLookup(_) => "pathLookup",
            ConditionConfig::Service(_) => "service",
        }
    }
}

impl<'de> Deserialize<'de> for ConditionConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        discriminator::resolve_condition(raw).map_err(serde::de::Error::custom)
    }
}

/// Configuration for a typed value position
#[derive(Debug, Clone, PartialEq)]
pub enum ValueConfig {
    /// Authored literal, parsed into the target type at build time
    Literal(Value),
    /// Lookup in the data graph
    Path(PathLookupConfig),
    /// Call to an injected service
    Service(ServiceConfig),
    /// Current instant from the context clock
    Now,
}

impl<'de> Deserialize<'de> for ValueConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        discriminator::resolve_value(raw).map_err(serde::de::Error::custom)
    }
}

// ========== Logical combinators ==========

/// Children of an AND / OR combinator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogicalConfig {
    pub conditions: Vec<ConditionConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotConfig {
    pub condition: Option<Box<ConditionConfig>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct XorConfig {
    pub first_condition: Option<Box<ConditionConfig>>,
    pub second_condition: Option<Box<ConditionConfig>>,
}

// ========== Comparisons ==========

/// Orderable data types a comparison can operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Date,
    DateTime,
    Time,
    Integer,
    Number,
}

impl DataKind {
    /// Configuration key naming the compared value
    pub fn key(&self) -> &'static str {
        match self {
            DataKind::Date => "date",
            DataKind::DateTime => "dateTime",
            DataKind::Time => "time",
            DataKind::Integer => "integer",
            DataKind::Number => "number",
        }
    }

    fn comparison_name(&self) -> &'static str {
        match self {
            DataKind::Date => "dateComparison",
            DataKind::DateTime => "dateTimeComparison",
            DataKind::Time => "timeComparison",
            DataKind::Integer => "integerComparison",
            DataKind::Number => "numberComparison",
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DataKind::Date | DataKind::DateTime | DataKind::Time)
    }

    /// Operator keys accepted for this kind
    pub fn operator_keys(&self) -> &'static [(&'static str, ComparisonOperator)] {
        if self.is_temporal() {
            &[
                ("isBefore", ComparisonOperator::LessThan),
                ("isBeforeOrEqualTo", ComparisonOperator::LessThanOrEqual),
                ("isEqualTo", ComparisonOperator::Equal),
                ("isAfter", ComparisonOperator::GreaterThan),
                ("isAfterOrEqualTo", ComparisonOperator::GreaterThanOrEqual),
            ]
        } else {
            &[
                ("isLessThan", ComparisonOperator::LessThan),
                ("isLessThanOrEqualTo", ComparisonOperator::LessThanOrEqual),
                ("isEqualTo", ComparisonOperator::Equal),
                ("isGreaterThan", ComparisonOperator::GreaterThan),
                ("isGreaterThanOrEqualTo", ComparisonOperator::GreaterThanOrEqual),
            ]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    LessThan,
    LessThanOrEqual,
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::LessThan => write!(f, "<"),
            ComparisonOperator::LessThanOrEqual => write!(f, "<="),
            ComparisonOperator::Equal => write!(f, "=="),
            ComparisonOperator::GreaterThan => write!(f, ">"),
            ComparisonOperator::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// `{date|dateTime|time|integer|number, <operator>}`
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    pub kind: DataKind,
    pub operator: ComparisonOperator,
    pub first: Option<ValueConfig>,
    pub second: Option<ValueConfig>,
}

/// `{dateTime, isInPeriod}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PeriodConfig {
    pub date_time: Option<ValueConfig>,
    pub is_in_period: Option<ValueConfig>,
}

// ========== Membership and format checks ==========

/// `{ipAddress, isInRange}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IpRangeConfig {
    pub ip_address: Option<ValueConfig>,
    pub is_in_range: Option<ValueConfig>,
}

/// `{list, value}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListContainsConfig {
    pub list: Option<ValueConfig>,
    pub value: Option<ValueConfig>,
}

/// `{object, propertyName}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectPropertyConfig {
    pub object: Option<ValueConfig>,
    pub property_name: Option<ValueConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOperation {
    Contains,
    StartsWith,
    EndsWith,
    EqualTo,
}

impl TextOperation {
    pub const ALL: [(&'static str, TextOperation); 4] = [
        ("contains", TextOperation::Contains),
        ("startsWith", TextOperation::StartsWith),
        ("endsWith", TextOperation::EndsWith),
        ("isEqualTo", TextOperation::EqualTo),
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TextOperation::Contains => "contains",
            TextOperation::StartsWith => "startsWith",
            TextOperation::EndsWith => "endsWith",
            TextOperation::EqualTo => "isEqualTo",
        }
    }
}

/// `{text, contains|startsWith|endsWith|isEqualTo, ignoreCase?}`
#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub text: Option<ValueConfig>,
    pub operation: TextOperation,
    pub comparand: Option<ValueConfig>,
    pub ignore_case: Option<Box<ConditionConfig>>,
}

/// `{text, regexPattern}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegexConfig {
    pub text: Option<ValueConfig>,
    pub regex_pattern: Option<ValueConfig>,
}

// ========== Data access ==========

/// Path lookup with its fallback policy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PathLookupConfig {
    pub path: String,
    /// Custom object to read from instead of the context data graph
    #[serde(default)]
    pub data_source: Option<Box<ValueConfig>>,
    #[serde(default)]
    pub value_if_not_found: Option<Box<ValueConfig>>,
    #[serde(default)]
    pub raise_error_if_not_found: Option<Box<ConditionConfig>>,
    #[serde(default)]
    pub value_if_null: Option<Box<ValueConfig>>,
    #[serde(default)]
    pub raise_error_if_null: Option<Box<ConditionConfig>>,
    #[serde(default)]
    pub value_if_type_mismatch: Option<Box<ValueConfig>>,
    #[serde(default)]
    pub raise_error_if_type_mismatch: Option<Box<ConditionConfig>>,
    #[serde(default)]
    pub default_value: Option<Box<ValueConfig>>,
}

impl PathLookupConfig {
    /// A lookup with no fallback policy
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data_source: None,
            value_if_not_found: None,
            raise_error_if_not_found: None,
            value_if_null: None,
            raise_error_if_null: None,
            value_if_type_mismatch: None,
            raise_error_if_type_mismatch: None,
            default_value: None,
        }
    }
}

/// `{service, input?}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceConfig {
    pub service: String,
    #[serde(default)]
    pub input: Option<Box<ValueConfig>>,
}
