//! Dialect selection and capability flags.
//!
//! Aurora DSQL speaks the PostgreSQL wire protocol but omits a handful of
//! PostgreSQL features. The `Dialect` enum carries those differences as
//! capability flags so that DDL rendering and reflection stay data-driven
//! instead of branching on the dialect everywhere.

use crate::error::{DsqlError, DsqlResult};

/// Feature flags consulted by SQL generation and reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Sequences (and therefore SERIAL/BIGSERIAL columns) exist.
    pub supports_sequences: bool,
    /// Constraints may be added through ALTER TABLE after creation.
    /// Gates foreign-key emission.
    pub supports_alter_constraints: bool,
    /// Native enum types (CREATE TYPE ... AS ENUM) exist.
    pub supports_native_enum: bool,
    /// CREATE INDEX takes the ASYNC keyword. When set, every rendered
    /// CREATE INDEX carries it.
    pub create_index_async: bool,
    /// CREATE INDEX CONCURRENTLY is accepted.
    pub create_index_concurrently: bool,
    /// DROP INDEX CONCURRENTLY is accepted.
    pub drop_index_concurrently: bool,
}

const POSTGRES: Capabilities = Capabilities {
    supports_sequences: true,
    supports_alter_constraints: true,
    supports_native_enum: true,
    create_index_async: false,
    create_index_concurrently: true,
    drop_index_concurrently: true,
};

const AURORA_DSQL: Capabilities = Capabilities {
    supports_sequences: false,
    supports_alter_constraints: false,
    supports_native_enum: false,
    create_index_async: true,
    create_index_concurrently: false,
    drop_index_concurrently: false,
};

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    Postgres,
    #[default]
    AuroraDsql,
}

impl Dialect {
    /// Look up a dialect by registered name.
    ///
    /// Driver-qualified names (`auroradsql+sqlx`, `auroradsql+postgres`)
    /// resolve to the same dialect as their base name.
    pub fn from_name(name: &str) -> DsqlResult<Self> {
        let base = name.split_once('+').map_or(name, |(dialect, _)| dialect);
        match base {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "auroradsql" | "aurora_dsql" => Ok(Self::AuroraDsql),
            other => Err(DsqlError::UnknownDialect(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::AuroraDsql => "auroradsql",
        }
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        match self {
            Self::Postgres => &POSTGRES,
            Self::AuroraDsql => &AURORA_DSQL,
        }
    }

    pub fn default_schema_name(&self) -> &'static str {
        "public"
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
