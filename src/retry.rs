use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::{ClientOptions, FigureEightError, Result};

/// Fixed-delay retry with an attempt ceiling.
///
/// An operation runs at most `retry_limit + 1` times. Failures rejected by
/// `should_retry` are returned unchanged on the spot.
#[derive(Clone, Debug)]
pub(crate) struct RetryPolicy {
    retry_limit: usize,
    retry_timeout: Duration,
    should_retry: fn(&FigureEightError) -> bool,
}

impl RetryPolicy {
    pub(crate) fn new(retry_limit: usize, retry_timeout: Duration) -> Self {
        Self {
            retry_limit,
            retry_timeout,
            should_retry: FigureEightError::is_retryable,
        }
    }

    #[cfg(test)]
    fn with_predicate(mut self, should_retry: fn(&FigureEightError) -> bool) -> Self {
        self.should_retry = should_retry;
        self
    }

    pub(crate) async fn run<F, Fut, T>(&self, operation: &str, mut attempt_fn: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0usize;
        loop {
            let err = match attempt_fn().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !(self.should_retry)(&err) {
                return Err(err);
            }

            retry += 1;
            if retry > self.retry_limit {
                return Err(FigureEightError::RetryLimitExceeded {
                    retry_limit: self.retry_limit,
                    source: Box::new(err),
                });
            }

            #[cfg(feature = "tracing")]
            tracing::warn!(
                "{} attempt {}/{} failed ({}), retrying in {:?}",
                operation,
                retry,
                self.retry_limit + 1,
                err,
                self.retry_timeout
            );
            #[cfg(not(feature = "tracing"))]
            let _ = operation;

            sleep(self.retry_timeout).await;
        }
    }
}

impl From<&ClientOptions> for RetryPolicy {
    fn from(options: &ClientOptions) -> Self {
        Self::new(
            options.retry_limit,
            Duration::from_millis(options.retry_timeout_ms),
        )
    }
}
