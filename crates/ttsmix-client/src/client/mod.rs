//! Backend client for synthesis, noise mixing and downloads.
//!
//! Operations here speak wire types; `port.rs` converts them to core DTOs.

mod downloads;
mod synthesis;

use crate::config::TtsClientConfig;
use crate::error::ClientResult;
use crate::http::{HttpBackend, ReqwestBackend};
use url::Url;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default backend client using the reqwest HTTP backend.
pub type DefaultTtsClient = TtsClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the text-to-speech backend.
///
/// Generic over an HTTP backend so tests can swap in a fake. Use
/// [`DefaultTtsClient`] in production code.
pub struct TtsClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) base_url: Url,
}

impl DefaultTtsClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when the base URL does not parse or the HTTP client cannot be
    /// built.
    pub fn new(config: &TtsClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(config.base_url())?;
        let backend = ReqwestBackend::new(config)?;
        tracing::debug!(base_url = %base_url, "Created backend client");
        Ok(Self { backend, base_url })
    }

    /// Create a new client with default configuration.
    pub fn default_client() -> ClientResult<Self> {
        Self::new(&TtsClientConfig::default())
    }
}

impl<B: HttpBackend> TtsClient<B> {
    /// Create a new client with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(base_url: Url, backend: B) -> Self {
        Self { backend, base_url }
    }

    /// Base URL every endpoint is resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}
