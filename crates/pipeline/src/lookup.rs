//! Phone lookup capability.

use async_trait::async_trait;
use enrich_hatch::{HatchApiError, HatchClient};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Hatch(#[from] HatchApiError),

    /// Failure reported by a non-Hatch implementation.
    #[error("Lookup failed: {0}")]
    Other(String),
}

/// Resolves a profile reference to a raw phone value.
#[async_trait]
pub trait PhoneLookup: Send + Sync {
    /// `Ok(None)` means the provider answered but had no phone.
    async fn find_phone(&self, profile_url: &str) -> Result<Option<serde_json::Value>, LookupError>;
}

#[async_trait]
impl PhoneLookup for HatchClient {
    async fn find_phone(&self, profile_url: &str) -> Result<Option<serde_json::Value>, LookupError> {
        Ok(HatchClient::find_phone(self, profile_url).await?)
    }
}
