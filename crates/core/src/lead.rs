//! Lead records as submitted by callers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of a row in the `Leads` table.
///
/// Callers send whatever the store uses as its primary key, which in
/// practice is either a BIGINT identity or a UUID / text key. Both shapes
/// are accepted and echoed back unchanged in outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadId {
    Int(i64),
    Text(String),
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadId::Int(id) => write!(f, "{id}"),
            LeadId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for LeadId {
    fn from(id: i64) -> Self {
        LeadId::Int(id)
    }
}

impl From<&str> for LeadId {
    fn from(id: &str) -> Self {
        LeadId::Text(id.to_string())
    }
}

/// A lead awaiting phone enrichment.
///
/// Only the fields the pipeline reads are modelled; anything else in the
/// submitted object is ignored during deserialization. A `poc_linkedin`
/// that is not a string is kept as `None` so the lead is still enriched
/// (as not found) instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default, deserialize_with = "profile_or_none")]
    pub poc_linkedin: Option<String>,
}

fn profile_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(url) => Some(url),
        _ => None,
    })
}

impl Lead {
    pub fn new(id: impl Into<LeadId>, poc_linkedin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            poc_linkedin: Some(poc_linkedin.into()),
        }
    }

    /// The profile reference to look up, if present and non-blank.
    pub fn profile_url(&self) -> Option<&str> {
        self.poc_linkedin
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
