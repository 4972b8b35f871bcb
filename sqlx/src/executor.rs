//! Retry-aware statement execution on sqlx pools.

use std::future::Future;
use std::pin::Pin;

use sqlx::PgPool;

use aurora_dsql_core::retry::{retry, RetryPolicy};

use crate::EngineResult;

/// Extension trait executing statements with conflict retries.
pub trait DsqlExecutor {
    /// Execute `sql`, retrying while the error carries one of the
    /// retryable vendor codes. Returns the affected row count.
    fn execute_with_retry<'a>(
        &'a self,
        sql: &'a str,
        policy: RetryPolicy,
    ) -> Pin<Box<dyn Future<Output = EngineResult<u64>> + Send + 'a>>;
}

impl DsqlExecutor for PgPool {
    fn execute_with_retry<'a>(
        &'a self,
        sql: &'a str,
        policy: RetryPolicy,
    ) -> Pin<Box<dyn Future<Output = EngineResult<u64>> + Send + 'a>> {
        Box::pin(async move {
            let done = retry(policy, || sqlx::query(sql).execute(self)).await?;
            Ok(done.rows_affected())
        })
    }
}
