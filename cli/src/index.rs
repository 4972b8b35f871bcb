//! CREATE INDEX rendering from CLI flags.

use anyhow::{anyhow, Result};

use aurora_dsql_core::ddl::build_create_index;
use aurora_dsql_core::schema::Index;
use aurora_dsql_core::Dialect;

/// Flag inputs for one index.
pub struct IndexArgs {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub expressions: Vec<String>,
    pub unique: bool,
    pub if_not_exists: bool,
    pub using: Option<String>,
    /// `key=opclass` pairs.
    pub ops: Vec<String>,
    pub include: Vec<String>,
    pub nulls_not_distinct: Option<bool>,
    /// `parameter=value` pairs for the WITH clause.
    pub with: Vec<String>,
    pub tablespace: Option<String>,
    pub predicate: Option<String>,
}

fn split_pair(pair: &str, flag: &str) -> Result<(String, String)> {
    pair.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| anyhow!("--{} expects key=value, got '{}'", flag, pair))
}

/// Build the index descriptor and render it for the dialect.
pub fn render_index(args: &IndexArgs, dialect: Dialect) -> Result<String> {
    if args.columns.is_empty() && args.expressions.is_empty() {
        return Err(anyhow!("an index needs at least one --column or --expression"));
    }

    let mut index = Index::new(&args.name, &args.table);
    for col in &args.columns {
        index = index.column(col);
    }
    for expr in &args.expressions {
        index = index.expression(expr);
    }
    if args.unique {
        index = index.unique();
    }
    if args.if_not_exists {
        index = index.if_not_exists();
    }
    if let Some(using) = &args.using {
        index = index.using(using);
    }
    for pair in &args.ops {
        let (key, opclass) = split_pair(pair, "op")?;
        index = index.op(key, opclass);
    }
    for col in &args.include {
        index = index.include(col);
    }
    if let Some(flag) = args.nulls_not_distinct {
        index = index.nulls_not_distinct(flag);
    }
    for pair in &args.with {
        let (parameter, value) = split_pair(pair, "with")?;
        index = index.with(parameter, value);
    }
    if let Some(tablespace) = &args.tablespace {
        index = index.tablespace(tablespace);
    }
    if let Some(predicate) = &args.predicate {
        index = index.predicate(predicate);
    }

    Ok(build_create_index(&index, dialect)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> IndexArgs {
        IndexArgs {
            name: "test_idx1".into(),
            table: "testtbl".into(),
            columns: vec!["data".into()],
            expressions: Vec::new(),
            unique: false,
            if_not_exists: false,
            using: None,
            ops: vec!["data=text_pattern_ops".into()],
            include: Vec::new(),
            nulls_not_distinct: None,
            with: Vec::new(),
            tablespace: None,
            predicate: None,
        }
    }

    #[test]
    fn test_render_index() {
        let sql = render_index(&args(), Dialect::AuroraDsql).unwrap();
        assert_eq!(
            sql,
            "CREATE INDEX ASYNC test_idx1 ON testtbl (data text_pattern_ops)"
        );
    }

    #[test]
    fn test_bad_op_pair() {
        let mut bad = args();
        bad.ops = vec!["data".into()];
        assert!(render_index(&bad, Dialect::AuroraDsql).is_err());
    }

    #[test]
    fn test_no_elements() {
        let mut bad = args();
        bad.columns.clear();
        assert!(render_index(&bad, Dialect::AuroraDsql).is_err());
    }
}
