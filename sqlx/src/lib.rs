//! sqlx backend for Aurora DSQL.
//!
//! Builds a [`sqlx::PgPool`] against a DSQL cluster with IAM token
//! authentication, and layers the dialect's retry and reflection
//! behavior on top.
//!
//! ```no_run
//! use aurora_dsql_core::config::EngineOptions;
//! use aurora_dsql_sqlx::{create_dsql_pool, DsqlExecutor};
//! use aurora_dsql_core::retry::RetryPolicy;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = EngineOptions::new("test.dsql.us-east-1.on.aws", "admin")
//!     .region("us-east-1");
//! let pool = create_dsql_pool(&options).await?;
//! pool.execute_with_retry(
//!     "CREATE TABLE IF NOT EXISTS abc (id UUID NOT NULL)",
//!     RetryPolicy::max_retries(3),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

use aurora_dsql_core::error::DsqlError;
use thiserror::Error;

pub mod engine;
pub mod executor;
pub mod reflect;

pub use engine::{create_dsql_pool, create_dsql_pool_with, ping, server_version_num};
pub use executor::DsqlExecutor;
pub use reflect::fetch_columns;

/// Error type for the sqlx backend.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] DsqlError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Result type alias for the sqlx backend.
pub type EngineResult<T> = Result<T, EngineError>;
