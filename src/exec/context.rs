//! Cancellation and deadline carrier for process execution
//!
//! An `ExecContext` bundles a shared cancellation token with an optional
//! monotonic deadline. Clones share the token, so cancelling any clone is
//! observed by every task holding one.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;

/// Caller-supplied cancellation/deadline carrier threaded through an
/// execution. The executor only reads from it.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl ExecContext {
    /// Create a context with no deadline. The execution runs until the
    /// process exits or [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context whose deadline elapses after `timeout`.
    ///
    /// # Errors
    /// * `ExecError::InvalidTimeout` - if `timeout` is zero
    pub fn with_timeout(timeout: Duration) -> Result<Self, ExecError> {
        if timeout.is_zero() {
            return Err(ExecError::InvalidTimeout);
        }
        Ok(Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        })
    }

    /// Derive a context sharing this one's cancellation token with the
    /// deadline narrowed to at most `timeout` from now.
    ///
    /// # Errors
    /// * `ExecError::InvalidTimeout` - if `timeout` is zero
    pub fn narrowed(&self, timeout: Duration) -> Result<Self, ExecError> {
        if timeout.is_zero() {
            return Err(ExecError::InvalidTimeout);
        }
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) => Some(existing.min(candidate)),
            None => Some(candidate),
        };
        Ok(Self {
            cancel: self.cancel.clone(),
            deadline,
        })
    }

    /// Cancel the execution. Observed by all clones of this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The deadline, if one is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve once the context fires, yielding the governing error.
    ///
    /// Cancellation wins over an elapsed deadline when both are observable.
    /// A context with no deadline that is never canceled suspends forever.
    pub(crate) async fn done(&self) -> ExecError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => ExecError::Canceled,
                    _ = tokio::time::sleep_until(deadline) => ExecError::DeadlineExceeded,
                }
            }
            None => {
                self.cancel.cancelled().await;
                ExecError::Canceled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_deadline() {
        let ctx = ExecContext::new();
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_canceled());
    }

    #[test]
    fn test_with_timeout_rejects_zero() {
        let result = ExecContext::with_timeout(Duration::ZERO);
        assert!(matches!(result, Err(ExecError::InvalidTimeout)));
    }

    #[test]
    fn test_narrowed_rejects_zero() {
        let ctx = ExecContext::new();
        assert!(matches!(
            ctx.narrowed(Duration::ZERO),
            Err(ExecError::InvalidTimeout)
        ));
    }

    #[tokio::test]
    async fn test_narrowed_keeps_earlier_deadline() {
        let ctx = ExecContext::with_timeout(Duration::from_secs(1)).unwrap();
        let narrowed = ctx.narrowed(Duration::from_secs(3600)).unwrap();

        // The existing one-second deadline must win over the wider timeout.
        let original = ctx.deadline().unwrap();
        assert!(narrowed.deadline().unwrap() <= original);
    }

    #[tokio::test]
    async fn test_narrowed_sets_deadline_when_absent() {
        let ctx = ExecContext::new();
        let narrowed = ctx.narrowed(Duration::from_secs(5)).unwrap();
        assert!(narrowed.deadline().is_some());
    }

    #[tokio::test]
    async fn test_narrowed_shares_cancellation() {
        let ctx = ExecContext::new();
        let narrowed = ctx.narrowed(Duration::from_secs(60)).unwrap();

        ctx.cancel();
        assert!(narrowed.is_canceled());
    }

    #[tokio::test]
    async fn test_done_reports_cancellation() {
        let ctx = ExecContext::new();
        ctx.cancel();
        assert!(matches!(ctx.done().await, ExecError::Canceled));
    }

    #[tokio::test]
    async fn test_done_reports_deadline() {
        let ctx = ExecContext::with_timeout(Duration::from_millis(20)).unwrap();
        assert!(matches!(ctx.done().await, ExecError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_cancellation_wins_over_elapsed_deadline() {
        let ctx = ExecContext::with_timeout(Duration::from_millis(10)).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        ctx.cancel();
        assert!(matches!(ctx.done().await, ExecError::Canceled));
    }
}
