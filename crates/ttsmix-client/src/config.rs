//! Public configuration for the backend client.

use std::time::Duration;

/// Default address of a locally running backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Configuration for the backend client.
///
/// # Example
///
/// ```
/// use ttsmix_client::TtsClientConfig;
/// use std::time::Duration;
///
/// let config = TtsClientConfig::new()
///     .with_base_url("http://tts.internal:5001")
///     .with_timeout(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct TtsClientConfig {
    /// Base URL of the backend
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient GET errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for TtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("ttsmix/", env!("CARGO_PKG_VERSION")).to_string(),
            // Synthesizing a long file takes minutes
            timeout: Duration::from_secs(300),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl TtsClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL.
    ///
    /// Defaults to `http://127.0.0.1:5001`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 300 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for downloads.
    ///
    /// Defaults to 2 retries. POST requests are never retried.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
