//! Request-scoped execution context.
//!
//! Each inbound call gets its own [`RequestContext`]. The domain service runs
//! every storage and hashing await through [`RequestContext::run`], so a caller
//! can abandon an operation by cancelling the token or letting the deadline pass.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Reason an operation was abandoned before completion.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Correlation id, deadline and cancellation signal for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Create a context with a fresh request id, no deadline and no cancellation.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            deadline: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Replace the generated request id (e.g. with one propagated by the caller).
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Abandon the request once `timeout` has elapsed from now.
    ///
    /// A timeout too large to represent as an instant leaves the deadline unchanged.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Abandon the request at `deadline`. An earlier existing deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Tie the request to an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `future` to completion unless the request is cancelled or its deadline passes first.
    ///
    /// # Errors
    /// * `Cancelled` - The cancellation token fired first
    /// * `DeadlineExceeded` - The deadline passed first
    pub async fn run<F>(&self, future: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        if self.cancellation.is_cancelled() {
            return Err(ContextError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(ContextError::Cancelled),
            _ = expired(self.deadline) => Err(ContextError::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
