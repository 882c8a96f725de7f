//! Path expressions over the data graph
//!
//! Paths use dot notation with optional array indices and an optional
//! `$` root, e.g. `claim.parties[0].name` or `$.policy.holder`.
//!
//! Unlike a plain map lookup, traversal distinguishes a missing value from a
//! present `null`, which the path lookup fallback policy treats differently.

use crate::types::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    segments: Vec<PathSegment>,
}

/// Outcome of walking a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The path exists; the value may be `Value::Null`
    Found(&'a Value),
    NotFound,
}

/// Path syntax error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid path '{path}': {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

impl PathExpression {
    /// Parse a path expression
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let error = |message: &str| PathError {
            path: path.to_string(),
            message: message.to_string(),
        };

        let trimmed = path.trim();
        let body = match trimmed.strip_prefix('$') {
            Some(rest) => rest.strip_prefix('.').unwrap_or(rest),
            None => trimmed,
        };

        let mut segments = Vec::new();
        if body.is_empty() {
            // `$` alone addresses the root
            if trimmed.starts_with('$') {
                return Ok(Self {
                    raw: trimmed.to_string(),
                    segments,
                });
            }
            return Err(error("empty path"));
        }

        for part in body.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };

            if key.is_empty() && rest.is_empty() {
                return Err(error("empty segment"));
            }
            if !key.is_empty() {
                segments.push(PathSegment::Key(key.to_string()));
            }

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| error("unclosed index"))?;
                let index = rest[1..close]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| error("index must be a non-negative integer"))?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(error("unexpected characters after index"));
                }
            }
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk the path from `root`
    pub fn lookup<'a>(&self, root: &'a Value) -> Lookup<'a> {
        let mut current = root;
        for segment in &self.segments {
            let next = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Lookup::NotFound,
            }
        }
        Lookup::Found(current)
    }
}

impl FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_data() -> Value {
        Value::from(json!({
            "name": "Alice",
            "claim": {
                "amount": 1200,
                "approved": null,
                "parties": [
                    {"name": "Bob"},
                    {"name": "Carol"}
                ]
            },
            "matrix": [[1, 2], [3, 4]]
        }))
    }

    #[test]
    fn test_parse_segments() {
        let path = PathExpression::parse("$.claim.parties[1].name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("claim".to_string()),
                PathSegment::Key("parties".to_string()),
                PathSegment::Index(1),
                PathSegment::Key("name".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "$.claim.parties[1].name");
    }

    #[test]
    fn test_parse_errors() {
        assert!(PathExpression::parse("").is_err());
        assert!(PathExpression::parse("claim..amount").is_err());
        assert!(PathExpression::parse("claim.parties[x]").is_err());
        assert!(PathExpression::parse("claim.parties[0").is_err());
        assert!(PathExpression::parse("claim.parties[0]name").is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let error = PathExpression::parse("claim..amount").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid path 'claim..amount': empty segment"
        );
        let source: &dyn std::error::Error = &error;
        assert!(source.source().is_none());
    }

    #[test]
    fn test_lookup_simple_and_nested() {
        let data = create_test_data();

        let name = PathExpression::parse("name").unwrap();
        assert_eq!(name.lookup(&data), Lookup::Found(&Value::from("Alice")));

        let party = PathExpression::parse("claim.parties[1].name").unwrap();
        assert_eq!(party.lookup(&data), Lookup::Found(&Value::from("Carol")));

        let cell = PathExpression::parse("matrix[1][0]").unwrap();
        assert_eq!(cell.lookup(&data), Lookup::Found(&Value::Number(3.0)));
    }

    #[test]
    fn test_lookup_distinguishes_null_from_missing() {
        let data = create_test_data();

        let approved = PathExpression::parse("claim.approved").unwrap();
        assert_eq!(approved.lookup(&data), Lookup::Found(&Value::Null));

        let missing = PathExpression::parse("claim.rejected").unwrap();
        assert_eq!(missing.lookup(&data), Lookup::NotFound);

        let through_null = PathExpression::parse("claim.approved.by").unwrap();
        assert_eq!(through_null.lookup(&data), Lookup::NotFound);

        let out_of_range = PathExpression::parse("claim.parties[5]").unwrap();
        assert_eq!(out_of_range.lookup(&data), Lookup::NotFound);
    }

    #[test]
    fn test_root_path() {
        let data = create_test_data();
        let root = PathExpression::parse("$").unwrap();
        assert_eq!(root.lookup(&data), Lookup::Found(&data));
    }
}
