use std::time::Duration;

/// Default base URL of the Hatch API.
pub const DEFAULT_API_URL: &str = "https://api.hatchhq.ai";

/// Default timeout for a single lookup request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Hatch API.
#[derive(Clone)]
pub struct HatchConfig {
    /// Base URL without trailing slash, e.g. `https://api.hatchhq.ai`.
    pub api_url: String,
    /// Value sent in the `x-api-key` header.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HatchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default                  |
    /// |----------------------|--------------------------|
    /// | `HATCH_API_KEY`      | required                 |
    /// | `HATCH_API_URL`      | `https://api.hatchhq.ai` |
    /// | `HATCH_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Self {
        let api_key = std::env::var("HATCH_API_KEY").expect("HATCH_API_KEY must be set");

        let api_url = std::env::var("HATCH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let timeout_secs: u64 = std::env::var("HATCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("HATCH_TIMEOUT_SECS must be a valid u64");

        Self::new(api_key)
            .with_api_url(api_url)
            .with_timeout(Duration::from_secs(timeout_secs))
    }
}

// The API key is a credential; keep it out of logs.
impl std::fmt::Debug for HatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HatchConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
