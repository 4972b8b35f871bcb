//! Aurora DSQL dialect core.
//!
//! Everything the wire-driver backends share: the dialect capability
//! model, DDL rendering (including `CREATE INDEX ASYNC`), the catalog
//! reflection queries, retry classification for optimistic concurrency
//! conflicts, and engine configuration.
//!
//! ```
//! use aurora_dsql_core::ddl::build_create_index;
//! use aurora_dsql_core::schema::Index;
//! use aurora_dsql_core::Dialect;
//!
//! let idx = Index::new("idx_owner_city", "owner").column("city");
//! let sql = build_create_index(&idx, Dialect::AuroraDsql).unwrap();
//! assert_eq!(sql, "CREATE INDEX ASYNC idx_owner_city ON owner (city)");
//! ```

pub mod config;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod reflect;
pub mod retry;
pub mod schema;

pub use dialect::Dialect;
pub use error::{DsqlError, DsqlResult};

pub mod prelude {
    pub use crate::config::{Driver, EngineOptions, SslMode};
    pub use crate::ddl::{build_create_index, build_create_table, build_drop_index, build_drop_table};
    pub use crate::dialect::{Capabilities, Dialect};
    pub use crate::error::{DsqlError, DsqlResult};
    pub use crate::reflect::{ObjectKind, ObjectScope, ReflectedColumn, Reflection};
    pub use crate::retry::{is_retryable, retry, RetryPolicy};
    pub use crate::schema::{Column, ColumnType, Index, IndexElement, Table};
}
