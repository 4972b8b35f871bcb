//! Retry support for optimistic concurrency conflicts.
//!
//! Aurora DSQL rejects conflicting transactions with vendor error codes
//! `OC000` and `OC001`; statements hitting those are safe to retry.
//! Anything else propagates unchanged.

use std::future::Future;

/// Vendor error codes that indicate a retryable lock/conflict condition.
pub const RETRYABLE_ERROR_CODES: &[&str] = &["OC000", "OC001"];

/// Whether an error message carries one of the retryable vendor codes.
pub fn is_retryable(message: &str) -> bool {
    RETRYABLE_ERROR_CODES
        .iter()
        .any(|code| message.contains(code))
}

/// Bound on retry attempts. `None` retries until the statement succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryPolicy {
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    /// Retry until success.
    pub fn unlimited() -> Self {
        Self { max_retries: None }
    }

    pub fn max_retries(max: u32) -> Self {
        Self {
            max_retries: Some(max),
        }
    }
}

/// Run `op`, retrying on errors `classify` marks retryable.
///
/// When the policy bound is exhausted the last error is returned.
pub async fn retry_when<T, E, F, Fut, C>(policy: RetryPolicy, classify: C, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
{
    let mut attempts = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !classify(&err) {
                    return Err(err);
                }
                attempts += 1;
                if let Some(max) = policy.max_retries {
                    if attempts > max {
                        return Err(err);
                    }
                }
                tracing::warn!(attempts, "retrying statement after concurrency conflict");
            }
        }
    }
}

/// Run `op`, retrying when the error's display text carries a retryable
/// vendor code.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_when(policy, |err| is_retryable(&err.to_string()), op).await
}
