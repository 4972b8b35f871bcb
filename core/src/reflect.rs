//! Catalog reflection queries.
//!
//! Builds the SQL used to discover table columns at runtime. Aurora DSQL
//! does not ship `json_build_object`, `pg_sequence` or
//! `pg_get_serial_sequence`, so the stock PostgreSQL identity subquery is
//! replaced with a NULL projection and the default expression stays a
//! plain scalar subquery over `pg_attrdef`.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use serde::Serialize;

use crate::dialect::Dialect;

/// Server version at which `pg_attribute.attgenerated` exists.
const GENERATED_MIN_VERSION: u32 = 120_000;

/// Rendered query texts kept per argument tuple.
const QUERY_CACHE_CAPACITY: usize = 16;

/// Which relation kinds a reflection call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Tables,
    Views,
    MaterializedViews,
    ForeignTables,
    Any,
}

impl ObjectKind {
    fn relkinds(self) -> &'static [&'static str] {
        match self {
            Self::Tables => &["r", "p"],
            Self::Views => &["v"],
            Self::MaterializedViews => &["m"],
            Self::ForeignTables => &["f"],
            Self::Any => &["r", "p", "v", "m", "f"],
        }
    }
}

/// Which persistence scope a reflection call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectScope {
    /// Permanent and unlogged relations.
    Default,
    Temporary,
    Any,
}

/// One row of the columns query.
///
/// `name` and friends are optional because tables with no user columns
/// still surface through the outer join.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectedColumn {
    pub name: Option<String>,
    pub format_type: Option<String>,
    pub default: Option<String>,
    pub not_null: Option<bool>,
    pub table_name: String,
    pub comment: Option<String>,
    pub generated: Option<String>,
    /// Always None: identity columns do not exist without sequences, and
    /// the stock reflection path for them needs `json_build_object`.
    pub identity_options: Option<String>,
}

type QueryKey = (Option<String>, bool, ObjectScope, ObjectKind);

/// Reflection query factory for one dialect/server pair.
///
/// Query texts are memoized per argument tuple; rendering is cheap but
/// reflection runs on every metadata lookup, so the cache keeps the hot
/// path allocation-free.
pub struct Reflection {
    dialect: Dialect,
    server_version_num: u32,
    cache: Mutex<LruCache<QueryKey, Arc<String>>>,
}

impl Reflection {
    pub fn new(dialect: Dialect, server_version_num: u32) -> Self {
        Self {
            dialect,
            server_version_num,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(QUERY_CACHE_CAPACITY).unwrap(),
            )),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The SQL text reflecting columns of the targeted relations.
    ///
    /// Bind parameters, in order: `$1` is the schema name when `schema`
    /// is given; the next parameter is a text array of relation names
    /// when `has_filter_names` is set.
    pub fn columns_query(
        &self,
        schema: Option<&str>,
        has_filter_names: bool,
        scope: ObjectScope,
        kind: ObjectKind,
    ) -> Arc<String> {
        let key = (schema.map(str::to_string), has_filter_names, scope, kind);
        let mut cache = self.cache.lock().expect("reflection cache poisoned");
        if let Some(sql) = cache.get(&key) {
            return Arc::clone(sql);
        }
        let sql = Arc::new(self.render_columns_query(schema, has_filter_names, scope, kind));
        cache.put(key, Arc::clone(&sql));
        sql
    }

    fn render_columns_query(
        &self,
        schema: Option<&str>,
        has_filter_names: bool,
        scope: ObjectScope,
        kind: ObjectKind,
    ) -> String {
        // attgenerated only exists from v12 on.
        let generated = if self.server_version_num >= GENERATED_MIN_VERSION {
            "a.attgenerated::text AS generated"
        } else {
            "NULL::text AS generated"
        };

        let mut sql = format!(
            "SELECT a.attname::text AS name, \
             pg_catalog.format_type(a.atttypid, a.atttypmod) AS format_type, \
             (SELECT pg_catalog.pg_get_expr(d.adbin, d.adrelid) \
             FROM pg_catalog.pg_attrdef d \
             WHERE d.adrelid = a.attrelid AND d.adnum = a.attnum \
             AND a.atthasdef) AS \"default\", \
             a.attnotnull AS not_null, \
             c.relname::text AS table_name, \
             dsc.description AS comment, \
             {generated}, \
             NULL::text AS identity_options \
             FROM pg_catalog.pg_class c \
             JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
             LEFT JOIN pg_catalog.pg_attribute a \
             ON c.oid = a.attrelid AND a.attnum > 0 AND NOT a.attisdropped \
             LEFT JOIN pg_catalog.pg_description dsc \
             ON dsc.objoid = a.attrelid AND dsc.objsubid = a.attnum"
        );

        let relkinds: Vec<String> = kind
            .relkinds()
            .iter()
            .map(|k| format!("'{}'", k))
            .collect();
        sql.push_str(&format!(
            " WHERE c.relkind = ANY (ARRAY[{}])",
            relkinds.join(", ")
        ));

        match scope {
            ObjectScope::Default => sql.push_str(" AND c.relpersistence != 't'"),
            ObjectScope::Temporary => sql.push_str(" AND c.relpersistence = 't'"),
            ObjectScope::Any => {}
        }

        let mut bind = 1;
        if schema.is_some() {
            sql.push_str(&format!(" AND n.nspname = ${bind}"));
            bind += 1;
        } else {
            sql.push_str(
                " AND n.nspname NOT IN ('pg_catalog', 'information_schema', 'pg_toast')",
            );
        }

        if has_filter_names {
            sql.push_str(&format!(" AND c.relname = ANY(${bind})"));
        }

        sql.push_str(" ORDER BY c.relname, a.attnum");
        sql
    }
}
