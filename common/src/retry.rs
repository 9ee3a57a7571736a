use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::sleep;

/// Retry a fallible async operation a fixed number of times with a fixed
/// delay between attempts.
///
/// Call sites that consume a status flag internally should prefer
/// [`RetryPolicy::retry_or`], which degrades to a safe fallback instead of
/// surfacing the error.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        assert!(max_attempts >= 1);

        Self {
            max_attempts,
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds or `max_attempts` is exhausted.
    /// Returns the first success, or the error from the final attempt.
    pub async fn retry<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt >= self.max_attempts {
                        return Err(e);
                    }

                    tracing::warn!(
                        "Attempt {}/{} failed: {}, retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        self.delay
                    );

                    sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// As [`RetryPolicy::retry`], but when every attempt fails the error is
    /// logged and `fallback` is returned instead.
    pub async fn retry_or<F, Fut, T, E>(&self, op: F, fallback: T) -> T
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        match self.retry(op).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(
                    "All {} attempts failed: {}, using fallback value",
                    self.max_attempts,
                    e
                );

                fallback
            }
        }
    }
}
