//! Phone normalization and the tagged per-lead phone result.
//!
//! The lookup provider returns `phone` as a string, an array of strings, or
//! nothing at all. [`normalize_phone`] reduces the first two shapes to a
//! bare digit string; [`PhoneOutcome`] carries the result through the
//! pipeline until it is written to the store, where it is flattened to the
//! column's text representation by [`PhoneOutcome::as_stored`].

use serde::Serialize;

/// Country code removed from the front of a normalized number.
pub const COUNTRY_CODE_PREFIX: &str = "91";

/// Stored text for a lead whose number could not be found.
pub const NOT_FOUND_SENTINEL: &str = "Not Found";

/// Stored text for a lead whose lookup returned an unusable value.
pub const ERROR_SENTINEL: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The raw value (after unwrapping an array) was not a string.
    #[error("expected a phone string, got {0}")]
    NotAString(&'static str),
}

/// Normalize a raw `phone` value into a canonical digit string.
///
/// A non-empty array contributes its first element. Every non-digit is
/// dropped, then a single leading `91` is removed. The result may be empty.
pub fn normalize_phone(raw: &serde_json::Value) -> Result<String, NormalizeError> {
    let value = match raw {
        serde_json::Value::Array(items) if !items.is_empty() => &items[0],
        other => other,
    };

    let text = value
        .as_str()
        .ok_or_else(|| NormalizeError::NotAString(json_type_name(value)))?;

    let digits: String = text.chars().filter(char::is_ascii_digit).collect();

    Ok(match digits.strip_prefix(COUNTRY_CODE_PREFIX) {
        Some(local) => local.to_string(),
        None => digits,
    })
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Coarse classification of a [`PhoneOutcome`], as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneStatus {
    Found,
    NotFound,
    Error,
}

/// Result of enriching a single lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneOutcome {
    /// A canonical, non-empty digit string.
    Found(String),
    /// The provider had no number, failed, or the lead had no profile.
    NotFound,
    /// The provider answered with a value that is not a phone string.
    Error(String),
}

impl PhoneOutcome {
    /// Classify the `phone` value of a successful lookup.
    ///
    /// `None` (absent or null) and a value with no digits left after
    /// normalization both count as not found.
    pub fn from_lookup(raw: Option<&serde_json::Value>) -> Self {
        let Some(raw) = raw.filter(|v| !v.is_null()) else {
            return PhoneOutcome::NotFound;
        };

        match normalize_phone(raw) {
            Ok(digits) if digits.is_empty() => PhoneOutcome::NotFound,
            Ok(digits) => PhoneOutcome::Found(digits),
            Err(e) => PhoneOutcome::Error(e.to_string()),
        }
    }

    pub fn status(&self) -> PhoneStatus {
        match self {
            PhoneOutcome::Found(_) => PhoneStatus::Found,
            PhoneOutcome::NotFound => PhoneStatus::NotFound,
            PhoneOutcome::Error(_) => PhoneStatus::Error,
        }
    }

    /// Text written to the target column.
    pub fn as_stored(&self) -> &str {
        match self {
            PhoneOutcome::Found(digits) => digits,
            PhoneOutcome::NotFound => NOT_FOUND_SENTINEL,
            PhoneOutcome::Error(_) => ERROR_SENTINEL,
        }
    }
}

impl Serialize for PhoneOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_stored())
    }
}
