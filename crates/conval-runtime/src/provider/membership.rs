//! Membership predicates for lists and objects

use super::Predicate;
use conval_core::{deep_equals, Map, ProviderError, Value};
use std::sync::Arc;

/// True when any element of the list is structurally equal to the value
pub fn list_contains() -> Predicate<Vec<Value>, Value> {
    Arc::new(
        |list: &Vec<Value>, value: &Value| -> Result<bool, ProviderError> {
            Ok(list.iter().any(|item| deep_equals(item, value)))
        },
    )
}

/// True when the object has the property as a direct key
pub fn object_contains_property() -> Predicate<Map, String> {
    Arc::new(
        |object: &Map, property: &String| -> Result<bool, ProviderError> {
            Ok(object.contains_key(property))
        },
    )
}
