//! Timeout and retry policy for network calls
//!
//! Read-only contract calls and explorer requests are retried with
//! exponential backoff when they fail transiently. Each attempt is bounded by
//! `attempt_timeout`. Transaction submissions are not routed through here.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::confirmation::ConfirmationConfig;
use crate::error::BridgeError;

/// Retry configuration for network calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential growth
    pub backoff_multiplier: f64,
    /// Upper bound for a single attempt
    pub attempt_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            attempt_timeout: Duration::from_secs(15),
        }
    }
}

impl RetryConfig {
    /// No retries, only the per-attempt timeout
    pub fn no_retry(attempt_timeout: Duration) -> Self {
        Self {
            max_retries: 0,
            attempt_timeout,
            ..Default::default()
        }
    }

    /// Calculate backoff duration for a given attempt (0-indexed)
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_secs =
            self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        let capped = backoff_secs.min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Check if we should retry based on attempt count
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Timeout and retry settings for one client operation
///
/// Reads go through [`with_retry`]. Submissions are bounded by
/// `submit_timeout` but never retried, since a resent transaction could
/// execute twice.
#[derive(Debug, Clone)]
pub struct CallPolicy {
    pub read: RetryConfig,
    /// Bound on handing a transaction to the node
    pub submit_timeout: Duration,
    pub confirmation: ConfirmationConfig,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            read: RetryConfig::default(),
            submit_timeout: Duration::from_secs(30),
            confirmation: ConfirmationConfig::default(),
        }
    }
}

/// Run `operation` once, failing with [`BridgeError::Timeout`] if it takes too long
pub async fn with_timeout<T, Fut>(
    operation: &str,
    timeout: Duration,
    future: Fut,
) -> Result<T, BridgeError>
where
    Fut: Future<Output = Result<T, BridgeError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(BridgeError::Timeout {
            operation: operation.to_string(),
            after: timeout,
        }),
    }
}

/// Execute with retry logic
///
/// Only transient errors (network failures, timeouts) are retried; anything
/// else is returned immediately.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    mut call: F,
) -> Result<T, BridgeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BridgeError>>,
{
    let mut attempt = 0u32;

    loop {
        match with_timeout(operation, config.attempt_timeout, call()).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && config.should_retry(attempt) => {
                let backoff = config.backoff_for_attempt(attempt);
                warn!(
                    operation = operation,
                    attempt = attempt + 1,
                    max = config.max_retries,
                    ?backoff,
                    error = %e,
                    "Retrying after backoff"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => {
                debug!(operation = operation, attempt = attempt + 1, error = %e, "Giving up");
                return Err(e);
            }
        }
    }
}
