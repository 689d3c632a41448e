//! Client configuration

use std::time::Duration;

/// Default quiescence window for search inputs
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Client configuration for connecting to the admin API
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ADMIN_API_URL | http://localhost:3000/api | API 基础地址 |
/// | ADMIN_API_TOKEN | (none) | Bearer token |
/// | REQUEST_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | SEARCH_DEBOUNCE_MS | 300 | 搜索防抖窗口(毫秒) |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000/api")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Debounce window for search inputs in milliseconds
    pub search_debounce_ms: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ADMIN_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api".into());
        Self {
            token: std::env::var("ADMIN_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            search_debounce_ms: std::env::var("SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
            ..Self::new(base_url)
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the search debounce window
    pub fn with_search_debounce(mut self, millis: u64) -> Self {
        self.search_debounce_ms = millis;
        self
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::from_config(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000/api")
    }
}
