//! Data types a provider can produce
//!
//! Every provider in the graph is parameterized by a `DataType`. The trait
//! describes how a raw `Value` from the data graph (or from an authored
//! literal) is read as that type. Parsing is lenient in the same way
//! authored configuration is: booleans and numbers may arrive as strings.

use super::interval::Interval;
use super::value::{Map, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt::Debug;

/// A type that can be resolved by a provider
pub trait DataType: Sized + Clone + Debug + Send + Sync + 'static {
    /// Readable type name used in errors
    const NAME: &'static str;

    /// Read a non-null value as this type
    fn from_value(value: &Value) -> Option<Self>;

    /// Derive this type from the current instant, if meaningful
    fn from_instant(_instant: DateTime<Utc>) -> Option<Self> {
        None
    }
}

impl DataType for bool {
    const NAME: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl DataType for String {
    const NAME: &'static str = "text";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }
}

impl DataType for f64 {
    const NAME: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

/// Largest integer every `f64` in the data graph holds exactly (2^53 - 1)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

impl DataType for i64 {
    const NAME: &'static str = "integer";

    /// Numbers beyond +/- 2^53 - 1 may already have been rounded by the data
    /// graph and are rejected; integer strings keep full `i64` precision.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER => Some(*n as i64),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl DataType for NaiveDate {
    const NAME: &'static str = "date";

    fn from_value(value: &Value) -> Option<Self> {
        let s = value.as_str()?.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    }

    fn from_instant(instant: DateTime<Utc>) -> Option<Self> {
        Some(instant.date_naive())
    }
}

impl DataType for DateTime<FixedOffset> {
    const NAME: &'static str = "dateTime";

    fn from_value(value: &Value) -> Option<Self> {
        parse_instant(value.as_str()?)
    }

    fn from_instant(instant: DateTime<Utc>) -> Option<Self> {
        Some(instant.into())
    }
}

impl DataType for NaiveTime {
    const NAME: &'static str = "time";

    fn from_value(value: &Value) -> Option<Self> {
        let s = value.as_str()?.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
    }

    fn from_instant(instant: DateTime<Utc>) -> Option<Self> {
        Some(instant.time())
    }
}

impl DataType for Interval {
    const NAME: &'static str = "period";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let start = parse_instant(map.get("start")?.as_str()?)?;
                let end = parse_instant(map.get("end")?.as_str()?)?;
                Interval::new(start, end)
            }
            Value::String(s) => {
                let (start, end) = s.split_once('/')?;
                Interval::new(parse_instant(start)?, parse_instant(end)?)
            }
            _ => None,
        }
    }
}

impl DataType for Vec<Value> {
    const NAME: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl DataType for Map {
    const NAME: &'static str = "object";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl DataType for Value {
    const NAME: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Parse an absolute instant.
///
/// RFC 3339 is preferred; offset-less timestamps and plain dates are read as UTC.
fn parse_instant(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().into());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().into())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
