//! Bounded retry with a fixed delay between attempts.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// How many times to try an operation, how long to wait in between, and
/// which errors are worth another attempt.
pub struct RetryPolicy<E> {
    pub max_attempts: u32,
    pub delay: Duration,
    pub is_retryable: fn(&E) -> bool,
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for RetryPolicy<E> {}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The error was not retryable; returned on first occurrence.
    Terminal(E),
    /// Every attempt failed with a retryable error. Carries the last one.
    Exhausted { attempts: u32, last: E },
}

impl<E: fmt::Display> RetryPolicy<E> {
    /// Run `op` until it succeeds, fails terminally, or runs out of attempts.
    ///
    /// `op` receives the 1-based attempt number. The delay is a sleep on the
    /// current task only. A `max_attempts` of zero is treated as one.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !(self.is_retryable)(&e) => return Err(RetryError::Terminal(e)),
                Err(e) if attempt >= max_attempts => {
                    return Err(RetryError::Exhausted { attempts: attempt, last: e });
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
