//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or HTTP types in any signature
//! - Server-side `success=false` answers surface as [`BackendError::Rejected`]
//! - Status reporting is synchronous and must not block

mod backend;
mod error;
mod status;

pub use backend::{
    FixedMixRequest, RandomMixReply, RandomMixRequest, SynthesisReply, SynthesisRequest,
    TtsBackendPort,
};
pub use error::{BackendError, BackendResult};
pub use status::{NoopStatusReporter, StatusKind, StatusMessage, StatusReporter};
