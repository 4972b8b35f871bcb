//! Error types for the Aurora DSQL adapter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DsqlError {
    /// The dialect name is not registered.
    #[error("Unknown dialect: '{0}'. Expected: postgres or auroradsql")]
    UnknownDialect(String),

    /// The driver name is not one of the supported wire backends.
    #[error("Unsupported driver: '{0}'. Expected: sqlx or postgres")]
    UnsupportedDriver(String),

    /// An index method failed the `USING` phrase validation.
    #[error("Invalid index method: '{0}'")]
    InvalidIndexMethod(String),

    /// The requested DDL cannot be rendered for the target dialect.
    #[error("{feature} is not supported by the {dialect} dialect")]
    Unsupported {
        dialect: &'static str,
        feature: String,
    },

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DsqlError {
    /// Create an unsupported-feature error for the given dialect.
    pub fn unsupported(dialect: &'static str, feature: impl Into<String>) -> Self {
        Self::Unsupported {
            dialect,
            feature: feature.into(),
        }
    }
}

/// Result type alias for adapter operations.
pub type DsqlResult<T> = Result<T, DsqlError>;
