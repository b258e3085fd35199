//! Helpers for mapping entities onto store hash fields.
//!
//! Entities are persisted as hashes of string fields. These helpers keep the
//! decode paths uniform: every missing or unparsable field becomes a
//! [`RecordError`] naming the field, which services surface as corrupt data
//! rather than a panic.

use std::collections::HashMap;

/// A hash field that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}`: {problem}")]
pub struct RecordError {
    /// Name of the offending hash field.
    pub field: String,
    /// What went wrong while decoding it.
    pub problem: String,
}

impl RecordError {
    fn new(field: &str, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

/// Fetch a required string field.
pub fn require<'a>(
    fields: &'a HashMap<String, String>,
    field: &str,
) -> Result<&'a str, RecordError> {
    fields
        .get(field)
        .map(String::as_str)
        .ok_or_else(|| RecordError::new(field, "missing"))
}

/// Fetch an optional string field, treating the empty string as absent.
pub fn optional(fields: &HashMap<String, String>, field: &str) -> Option<String> {
    fields
        .get(field)
        .filter(|value| !value.is_empty())
        .cloned()
}

/// Fetch a required integer field.
pub fn require_i64(fields: &HashMap<String, String>, field: &str) -> Result<i64, RecordError> {
    require(fields, field)?
        .parse::<i64>()
        .map_err(|err| RecordError::new(field, format!("not an integer: {err}")))
}

/// Fetch an integer field, defaulting to zero when absent.
pub fn i64_or_zero(fields: &HashMap<String, String>, field: &str) -> Result<i64, RecordError> {
    match fields.get(field) {
        None => Ok(0),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|err| RecordError::new(field, format!("not an integer: {err}"))),
    }
}

/// Fetch a required boolean field stored as `"true"` / `"false"`.
pub fn require_bool(fields: &HashMap<String, String>, field: &str) -> Result<bool, RecordError> {
    match require(fields, field)? {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(RecordError::new(field, format!("not a boolean: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let err = require(&fields(&[]), "id").expect_err("missing field");
        assert_eq!(err.field, "id");
    }

    #[test]
    fn optional_treats_empty_as_absent() {
        let map = fields(&[("profileImage", "")]);
        assert_eq!(optional(&map, "profileImage"), None);
    }

    #[test]
    fn booleans_accept_both_spellings() {
        let map = fields(&[("isAdmin", "1"), ("isPublic", "false")]);
        assert!(require_bool(&map, "isAdmin").expect("bool"));
        assert!(!require_bool(&map, "isPublic").expect("bool"));
    }

    #[test]
    fn counters_default_to_zero() {
        assert_eq!(i64_or_zero(&fields(&[]), "clicks").expect("count"), 0);
    }
}
