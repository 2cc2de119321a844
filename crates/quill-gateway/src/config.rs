//! Gateway configuration.

/// Connection settings for the remote story store
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// API key sent as the `x-api-key` header, if the store requires one
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Page size requested from list queries
    pub list_page_size: u32,
}

impl GatewayConfig {
    /// Create a configuration for the given endpoint with defaults
    #[inline]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout_secs: 30,
            list_page_size: 100,
        }
    }

    /// With an API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With a request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With a list page size
    #[inline]
    #[must_use]
    pub fn with_list_page_size(mut self, size: u32) -> Self {
        self.list_page_size = size;
        self
    }
}
