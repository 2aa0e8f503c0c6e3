//! Target column selection (`enrichment_number`).
//!
//! Each enrichment pass writes into its own column of the `Leads` table so
//! a lead can carry more than one looked-up number.

use serde::Serialize;

use crate::error::CoreError;

/// Message returned to callers when the selector is not recognized.
pub const INVALID_SELECTOR_MESSAGE: &str = "enrichment_number must be 1 or 2.";

/// Column of the `Leads` table that receives the enriched phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnrichmentField {
    /// Selector `1`.
    #[serde(rename = "poc_phonenumber")]
    Primary,
    /// Selector `2`.
    #[serde(rename = "poc_phonenumber_2")]
    Secondary,
}

impl EnrichmentField {
    pub const ALL: [EnrichmentField; 2] = [EnrichmentField::Primary, EnrichmentField::Secondary];

    /// Resolve a numeric selector.
    pub fn from_selector(selector: i64) -> Result<Self, CoreError> {
        match selector {
            1 => Ok(EnrichmentField::Primary),
            2 => Ok(EnrichmentField::Secondary),
            _ => Err(CoreError::Validation(INVALID_SELECTOR_MESSAGE.to_string())),
        }
    }

    /// Resolve the selector exactly as it appeared in a JSON request body.
    ///
    /// Only JSON integers are accepted; `"1"`, `1.0`, `null` and a missing
    /// value are all rejected.
    pub fn from_json(selector: Option<&serde_json::Value>) -> Result<Self, CoreError> {
        selector
            .filter(|v| v.is_i64() || v.is_u64())
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| CoreError::Validation(INVALID_SELECTOR_MESSAGE.to_string()))
            .and_then(Self::from_selector)
    }

    /// The selector value callers use for this field.
    pub fn selector(self) -> i64 {
        match self {
            EnrichmentField::Primary => 1,
            EnrichmentField::Secondary => 2,
        }
    }

    /// Database column name.
    pub fn column(self) -> &'static str {
        match self {
            EnrichmentField::Primary => "poc_phonenumber",
            EnrichmentField::Secondary => "poc_phonenumber_2",
        }
    }
}
