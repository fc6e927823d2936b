//! Request-scoped cancellation and deadline for wrapper calls

use std::future::Future;
use std::time::Duration;

use forgeprops_domain::WrapperError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Caller-supplied cancellation and deadline, threaded through every wrapper.
///
/// Dropping the returned futures also cancels in-flight calls; the token and
/// deadline let a caller cancel from elsewhere and get a typed error back.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing token with the caller.
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation, deadline: None }
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));
        self
    }

    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Context whose token is cancelled with this one but can also be
    /// cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self { cancellation: self.cancellation.child_token(), deadline: self.deadline }
    }

    /// Drive `call` until it completes, the token fires or the deadline
    /// passes.
    ///
    /// # Errors
    /// Returns the call's own error, [`WrapperError::Cancelled`] or
    /// [`WrapperError::DeadlineExceeded`].
    pub async fn run<F, T>(&self, call: F) -> Result<T, WrapperError>
    where
        F: Future<Output = Result<T, WrapperError>>,
    {
        if self.is_cancelled() {
            return Err(WrapperError::Cancelled);
        }

        let guarded = async {
            tokio::select! {
                biased;
                () = self.cancellation.cancelled() => Err(WrapperError::Cancelled),
                result = call => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(WrapperError::DeadlineExceeded)),
            None => guarded.await,
        }
    }
}
