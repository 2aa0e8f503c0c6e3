//! HTTP wrapper for `POST /v1/findPhone`.

use serde::{Deserialize, Serialize};

use crate::config::HatchConfig;

/// Header carrying the API credential.
const API_KEY_HEADER: &str = "x-api-key";

/// Errors from the Hatch REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum HatchApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Hatch returned a non-2xx status code.
    #[error("Hatch API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindPhoneRequest<'a> {
    linkedin_url: &'a str,
}

/// Body of a successful `findPhone` response.
///
/// `phone` is left as raw JSON: Hatch answers with a string, an array of
/// strings, or omits the field.
#[derive(Debug, Deserialize)]
pub struct FindPhoneResponse {
    #[serde(default)]
    pub phone: Option<serde_json::Value>,
}

/// HTTP client for the Hatch API.
pub struct HatchClient {
    client: reqwest::Client,
    config: HatchConfig,
}

impl HatchClient {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn new(config: HatchConfig) -> Result<Self, HatchApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: HatchConfig) -> Self {
        Self { client, config }
    }

    /// Look up the phone number attached to a LinkedIn profile.
    ///
    /// Returns the raw `phone` value, or `None` when Hatch answered
    /// successfully without one.
    pub async fn find_phone(
        &self,
        linkedin_url: &str,
    ) -> Result<Option<serde_json::Value>, HatchApiError> {
        let response = self
            .client
            .post(format!("{}/v1/findPhone", self.config.api_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&FindPhoneRequest { linkedin_url })
            .send()
            .await?;

        let body: FindPhoneResponse = Self::parse_response(response).await?;

        tracing::debug!(
            linkedin_url,
            has_phone = body.phone.as_ref().is_some_and(|p| !p.is_null()),
            "Hatch findPhone answered"
        );

        Ok(body.phone.filter(|p| !p.is_null()))
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, HatchApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(HatchApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, HatchApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
