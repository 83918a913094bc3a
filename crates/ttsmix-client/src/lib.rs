#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultTtsClient is meant to be used through the TtsBackendPort trait, not
// its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultTtsClient;

// Configuration
pub use config::{DEFAULT_BASE_URL, TtsClientConfig};

// Errors surfaced while constructing a client
pub use error::ClientError;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
