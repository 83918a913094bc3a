//! Cooperative cancellation for a single outbound request.

use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::JobTicket;

/// Why a cancellable request did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError<E> {
    /// The token was signaled before the request settled.
    Cancelled,
    /// The request itself failed.
    Failed(E),
}

impl<E> RequestError<E> {
    /// Whether the request was cancelled.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl<E: fmt::Display> fmt::Display for RequestError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("request cancelled"),
            Self::Failed(e) => e.fmt(f),
        }
    }
}

/// Wraps one network operation with a cancellation token.
///
/// If the token is signaled before the operation settles, the operation's
/// future is dropped (aborting the request) and the result is
/// [`RequestError::Cancelled`]. An operation that fails while the token is
/// already signaled is also reported as cancelled, so transport-level abort
/// errors never masquerade as generic failures. Signaling after the
/// operation settled has no effect.
#[derive(Debug, Clone)]
pub struct CancellableRequest {
    token: CancellationToken,
}

impl CancellableRequest {
    /// Bind a request to a token.
    pub const fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Bind a request to a job's token.
    pub fn for_ticket(ticket: &JobTicket) -> Self {
        Self::new(ticket.token().clone())
    }

    /// Issue the operation and wait for it to settle or be cancelled.
    pub async fn start<F, T, E>(&self, operation: F) -> Result<T, RequestError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        tokio::select! {
            biased;

            () = self.token.cancelled() => Err(RequestError::Cancelled),

            result = operation => match result {
                Ok(value) => Ok(value),
                Err(_) if self.token.is_cancelled() => Err(RequestError::Cancelled),
                Err(e) => Err(RequestError::Failed(e)),
            }
        }
    }
}
