//! Computation-scoped cancellation and deadline handling.
//!
//! Every collaborator call made on behalf of one quote or route is raced against the
//! same [`QuoteContext`]. Cancelling the token, or letting the deadline pass, makes
//! the in-flight call resolve to an error immediately; the router then abandons the
//! computation without returning a partial route.

use crate::errors::{ProviderError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation signal and optional deadline shared by one computation.
#[derive(Debug, Clone, Default)]
pub struct QuoteContext {
    cancel: CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl QuoteContext {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::default().timeout(timeout)
    }

    /// Set the deadline to `timeout` from now.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some((Instant::now() + timeout, timeout));
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The token observed by this context. Cancelling a clone cancels the computation.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel the computation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fail fast if the computation was already cancelled or timed out.
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(ProviderError::Cancelled.into());
        }
        if let Some((deadline, timeout)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Self::deadline_error(timeout));
            }
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the computation is cancelled or its deadline
    /// passes first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        match self.deadline {
            Some((deadline, timeout)) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => Err(ProviderError::Cancelled.into()),
                    _ = tokio::time::sleep_until(deadline) => Err(Self::deadline_error(timeout)),
                    result = fut => result,
                }
            }
            None => {
                tokio::select! {
                    _ = self.cancel.cancelled() => Err(ProviderError::Cancelled.into()),
                    result = fut => result,
                }
            }
        }
    }

    fn deadline_error(timeout: Duration) -> crate::errors::RouterError {
        ProviderError::DeadlineExceeded {
            timeout_ms: timeout.as_millis() as u64,
        }
        .into()
    }
}
