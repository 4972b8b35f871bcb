//! tokio-postgres backend for Aurora DSQL.
//!
//! Unlike the pooled sqlx backend this one signs a fresh IAM token on
//! every connection attempt, so long-lived processes never dial with an
//! expired token. TLS is negotiated directly by default (DSQL supports
//! it and it saves a round trip).

use aurora_dsql_core::error::DsqlError;
use thiserror::Error;

pub mod engine;
pub mod reflect;

pub use engine::{connect, connect_with, execute_with_retry, ping, server_version_num};
pub use reflect::fetch_columns;

/// Error type for the tokio-postgres backend.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] DsqlError),

    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the tokio-postgres backend.
pub type EngineResult<T> = Result<T, EngineError>;
