//! DDL rendering.
//!
//! Turns [`crate::schema`] descriptors into CREATE/DROP statements for a
//! target dialect. The interesting differences from stock PostgreSQL all
//! live here: Aurora DSQL builds indexes asynchronously (`CREATE INDEX
//! ASYNC`), has no sequences, no native enums, and no ALTER-based
//! constraint support.

use crate::dialect::Dialect;
use crate::error::{DsqlError, DsqlResult};
use crate::schema::{ColumnType, Index, IndexElement, Table, TableConstraint};

/// SQL reserved words that must be quoted when used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "order", "group", "user", "table", "select", "from", "where", "join", "left", "right",
    "inner", "outer", "on", "and", "or", "not", "null", "true", "false", "limit", "offset",
    "as", "in", "is", "like", "between", "having", "union", "all", "distinct", "case", "when",
    "then", "else", "end", "create", "alter", "drop", "insert", "update", "delete", "index",
    "key", "primary", "foreign", "references", "default", "constraint", "check", "using",
    "with", "tablespace", "include", "asc", "desc",
];

/// Quote an identifier if it's a reserved word or contains special chars.
pub fn quote_identifier(name: &str) -> String {
    let lower = name.to_lowercase();
    let needs_quoting = RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '_')
        || name.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false);

    if needs_quoting {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Validate an index method for the USING clause.
///
/// Lowercases the phrase and rejects anything outside `[a-z0-9_]`, so a
/// hostile method name can never splice extra SQL into the statement.
fn validate_index_method(method: &str) -> DsqlResult<String> {
    let lowered = method.to_lowercase();
    if lowered.is_empty()
        || !lowered
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(DsqlError::InvalidIndexMethod(method.to_string()));
    }
    Ok(lowered)
}

/// Render one index element, appending its operator class when one is
/// mapped for the element's key.
fn render_element(element: &IndexElement, index: &Index) -> String {
    let mut text = match element {
        IndexElement::Column(name) => quote_identifier(name),
        IndexElement::Expression { sql, .. } => format!("({})", sql),
    };
    if let Some(opclass) = element.key().and_then(|key| index.ops.get(key)) {
        text.push(' ');
        text.push_str(opclass);
    }
    text
}

/// Generate CREATE INDEX SQL.
///
/// Clause order follows PostgreSQL: UNIQUE, the dialect's build-mode
/// keyword (ASYNC or CONCURRENTLY), IF NOT EXISTS, name, table, USING,
/// elements, INCLUDE, NULLS [NOT] DISTINCT, WITH, TABLESPACE, WHERE.
pub fn build_create_index(index: &Index, dialect: Dialect) -> DsqlResult<String> {
    let caps = dialect.capabilities();

    let mut sql = String::from("CREATE ");
    if index.unique {
        sql.push_str("UNIQUE ");
    }
    sql.push_str("INDEX ");

    // ASYNC is a property of the dialect, not of the index: every index
    // on Aurora DSQL is built asynchronously.
    if caps.create_index_async {
        sql.push_str("ASYNC ");
    }
    // CONCURRENTLY is opt-in per index and dropped on dialects that do
    // not accept it.
    if index.concurrently && caps.create_index_concurrently {
        sql.push_str("CONCURRENTLY ");
    }
    if index.if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }

    // Index names are never schema-qualified.
    sql.push_str(&format!(
        "{} ON {} ",
        quote_identifier(&index.name),
        quote_identifier(&index.table)
    ));

    if let Some(using) = &index.using {
        sql.push_str(&format!("USING {} ", validate_index_method(using)?));
    }

    let elements: Vec<String> = index
        .elements
        .iter()
        .map(|element| render_element(element, index))
        .collect();
    sql.push_str(&format!("({})", elements.join(", ")));

    if !index.include.is_empty() {
        let cols: Vec<String> = index.include.iter().map(|c| quote_identifier(c)).collect();
        sql.push_str(&format!(" INCLUDE ({})", cols.join(", ")));
    }

    match index.nulls_not_distinct {
        Some(true) => sql.push_str(" NULLS NOT DISTINCT"),
        Some(false) => sql.push_str(" NULLS DISTINCT"),
        None => {}
    }

    if !index.with.is_empty() {
        let params: Vec<String> = index
            .with
            .iter()
            .map(|(parameter, value)| format!("{} = {}", parameter, value))
            .collect();
        sql.push_str(&format!(" WITH ({})", params.join(", ")));
    }

    if let Some(tablespace) = &index.tablespace {
        sql.push_str(&format!(" TABLESPACE {}", quote_identifier(tablespace)));
    }

    if let Some(predicate) = &index.predicate {
        sql.push_str(" WHERE ");
        sql.push_str(predicate);
    }

    Ok(sql)
}

/// Generate DROP INDEX SQL.
pub fn build_drop_index(index: &Index, dialect: Dialect, if_exists: bool) -> String {
    let mut sql = String::from("DROP INDEX ");
    if index.concurrently && dialect.capabilities().drop_index_concurrently {
        sql.push_str("CONCURRENTLY ");
    }
    if if_exists {
        sql.push_str("IF EXISTS ");
    }
    sql.push_str(&quote_identifier(&index.name));
    sql
}

/// Map a column type to its SQL rendering for the target dialect.
fn render_type(data_type: &ColumnType, dialect: Dialect) -> DsqlResult<String> {
    let caps = dialect.capabilities();
    let text = match data_type {
        ColumnType::Uuid => "UUID".to_string(),
        ColumnType::Text => "TEXT".to_string(),
        ColumnType::Varchar(len) => format!("VARCHAR({})", len),
        ColumnType::Int => "INT".to_string(),
        ColumnType::BigInt => "BIGINT".to_string(),
        ColumnType::Serial | ColumnType::BigSerial => {
            if !caps.supports_sequences {
                return Err(DsqlError::unsupported(
                    dialect.name(),
                    "SERIAL columns (no sequences)",
                ));
            }
            if matches!(data_type, ColumnType::Serial) {
                "SERIAL".to_string()
            } else {
                "BIGSERIAL".to_string()
            }
        }
        ColumnType::Boolean => "BOOLEAN".to_string(),
        ColumnType::Decimal => "DECIMAL".to_string(),
        ColumnType::DoublePrecision => "DOUBLE PRECISION".to_string(),
        ColumnType::Timestamp => "TIMESTAMP".to_string(),
        ColumnType::TimestampTz => "TIMESTAMPTZ".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Jsonb => "JSONB".to_string(),
        ColumnType::Bytea => "BYTEA".to_string(),
        ColumnType::Enum { name, .. } => {
            if caps.supports_native_enum {
                quote_identifier(name)
            } else {
                // No native enums: the labels become a CHECK constraint.
                "TEXT".to_string()
            }
        }
    };
    Ok(text)
}

/// Map well-known default shorthands to their SQL equivalents.
fn render_default(val: &str) -> &str {
    match val {
        "uuid()" => "gen_random_uuid()",
        "now()" => "NOW()",
        other => other,
    }
}

/// Generate CREATE TABLE SQL.
pub fn build_create_table(table: &Table, dialect: Dialect) -> DsqlResult<String> {
    let caps = dialect.capabilities();
    let mut sql = String::from("CREATE TABLE ");
    sql.push_str(&quote_identifier(&table.name));
    sql.push_str(" (\n");

    let mut defs = Vec::new();
    for col in &table.columns {
        let mut line = format!(
            "    {} {}",
            quote_identifier(&col.name),
            render_type(&col.data_type, dialect)?
        );

        if !col.nullable {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = &col.default {
            line.push_str(" DEFAULT ");
            line.push_str(render_default(default));
        }
        if col.primary_key {
            line.push_str(" PRIMARY KEY");
        }
        if col.unique {
            line.push_str(" UNIQUE");
        }
        if let Some(target) = &col.references {
            // Without ALTER-based constraint support there is no way to
            // attach the constraint later either; it is omitted.
            if caps.supports_alter_constraints {
                line.push_str(" REFERENCES ");
                line.push_str(target);
            }
        }
        if let ColumnType::Enum { labels, .. } = &col.data_type {
            if !caps.supports_native_enum {
                let quoted: Vec<String> = labels
                    .iter()
                    .map(|label| format!("'{}'", label.replace('\'', "''")))
                    .collect();
                line.push_str(&format!(
                    " CHECK ({} IN ({}))",
                    quote_identifier(&col.name),
                    quoted.join(", ")
                ));
            }
        }
        defs.push(line);
    }

    for constraint in &table.constraints {
        let (keyword, cols) = match constraint {
            TableConstraint::PrimaryKey(cols) => ("PRIMARY KEY", cols),
            TableConstraint::Unique(cols) => ("UNIQUE", cols),
        };
        let col_list: Vec<String> = cols.iter().map(|c| quote_identifier(c)).collect();
        defs.push(format!("    {} ({})", keyword, col_list.join(", ")));
    }

    sql.push_str(&defs.join(",\n"));
    sql.push_str("\n)");
    Ok(sql)
}

/// Generate DROP TABLE SQL.
pub fn build_drop_table(table: &Table) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(&table.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType, Index, Table};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "users");
        assert_eq!(quote_identifier("order"), "\"order\"");
        assert_eq!(quote_identifier("Mixed"), "\"Mixed\"");
        assert_eq!(quote_identifier("has space"), "\"has space\"");
        assert_eq!(quote_identifier("evil\"name"), "\"evil\"\"name\"");
    }

    #[test]
    fn test_create_index_async() {
        let idx = Index::new("test_idx1", "testtbl").column("data");
        assert_eq!(
            build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
            "CREATE INDEX ASYNC test_idx1 ON testtbl (data)"
        );
    }

    #[test]
    fn test_create_index_no_async_on_postgres() {
        let idx = Index::new("test_idx1", "testtbl").column("data");
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE INDEX test_idx1 ON testtbl (data)"
        );
    }

    #[test]
    fn test_create_index_unique() {
        let idx = Index::new("test_idx3", "test_tbl").column("data3").unique();
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE UNIQUE INDEX test_idx3 ON test_tbl (data3)"
        );
    }

    #[test]
    fn test_create_index_if_not_exists() {
        let idx = Index::new("test_idx1", "testtbl")
            .column("data")
            .if_not_exists();
        assert_eq!(
            build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
            "CREATE INDEX ASYNC IF NOT EXISTS test_idx1 ON testtbl (data)"
        );
    }

    #[test]
    fn test_create_index_using() {
        let idx = Index::new("test_idx1", "testtbl")
            .column("data")
            .using("GIN");
        assert_eq!(
            build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
            "CREATE INDEX ASYNC test_idx1 ON testtbl USING gin (data)"
        );
    }

    #[test]
    fn test_create_index_invalid_method() {
        let idx = Index::new("test_idx1", "testtbl")
            .column("data")
            .using("gin; DROP TABLE x");
        assert!(build_create_index(&idx, Dialect::AuroraDsql).is_err());
    }

    #[test]
    fn test_create_index_concurrently_only_on_postgres() {
        let idx = Index::new("test_idx1", "testtbl")
            .column("data")
            .concurrently();
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE INDEX CONCURRENTLY test_idx1 ON testtbl (data)"
        );
        // Dropped on DSQL, which builds asynchronously instead.
        assert_eq!(
            build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
            "CREATE INDEX ASYNC test_idx1 ON testtbl (data)"
        );
    }

    #[test]
    fn test_create_index_expr_gets_parens() {
        let idx = Index::new("test_idx1", "testtbl").expression("data + 5");
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE INDEX test_idx1 ON testtbl ((data + 5))"
        );
    }

    #[test]
    fn test_create_index_labeled_expression_ops() {
        // Unlabeled expressions never pick up an operator class...
        let idx = Index::new("test_idx2", "testtbl")
            .column("d1")
            .expression("d2 > 5")
            .op("d1", "x1")
            .op("d2", "x2");
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE INDEX test_idx2 ON testtbl (d1 x1, (d2 > 5))"
        );

        // ...but labeled ones do.
        let idx = Index::new("test_idx2", "testtbl")
            .column("d1")
            .labeled_expression("g", "d2 > 5")
            .op("d1", "x1")
            .op("g", "x2");
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE INDEX test_idx2 ON testtbl (d1 x1, (d2 > 5) x2)"
        );
    }

    #[test]
    fn test_create_index_include() {
        let idx = Index::new("foo", "test").column("x").include("y");
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE INDEX foo ON test (x) INCLUDE (y)"
        );
    }

    #[test]
    fn test_create_index_nulls_distinct() {
        let idx = Index::new("test_idx1", "test_tbl")
            .column("data")
            .unique()
            .nulls_not_distinct(true);
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE UNIQUE INDEX test_idx1 ON test_tbl (data) NULLS NOT DISTINCT"
        );

        let idx = Index::new("test_idx2", "test_tbl")
            .column("data2")
            .unique()
            .nulls_not_distinct(false);
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE UNIQUE INDEX test_idx2 ON test_tbl (data2) NULLS DISTINCT"
        );
    }

    #[test]
    fn test_create_index_with_and_tablespace() {
        let idx = Index::new("idx", "t")
            .column("c")
            .with("fillfactor", "70")
            .tablespace("fast");
        assert_eq!(
            build_create_index(&idx, Dialect::Postgres).unwrap(),
            "CREATE INDEX idx ON t (c) WITH (fillfactor = 70) TABLESPACE fast"
        );
    }

    #[test]
    fn test_create_index_where() {
        let idx = Index::new("idx", "t").column("c").predicate("c > 5");
        assert_eq!(
            build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
            "CREATE INDEX ASYNC idx ON t (c) WHERE c > 5"
        );
    }

    #[test]
    fn test_drop_index() {
        let idx = Index::new("test_idx1", "testtbl").column("data").concurrently();
        assert_eq!(
            build_drop_index(&idx, Dialect::Postgres, false),
            "DROP INDEX CONCURRENTLY test_idx1"
        );
        assert_eq!(
            build_drop_index(&idx, Dialect::AuroraDsql, false),
            "DROP INDEX test_idx1"
        );
        assert_eq!(
            build_drop_index(&idx, Dialect::AuroraDsql, true),
            "DROP INDEX IF EXISTS test_idx1"
        );
    }

    #[test]
    fn test_create_table_basic() {
        let table = Table::new("owner")
            .column(
                Column::new("id", ColumnType::Uuid)
                    .primary_key()
                    .default("gen_random_uuid()"),
            )
            .column(Column::new("name", ColumnType::Varchar(30)).not_null())
            .column(Column::new("telephone", ColumnType::Varchar(20)));
        let sql = build_create_table(&table, Dialect::AuroraDsql).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE owner (\n    id UUID NOT NULL DEFAULT gen_random_uuid() PRIMARY KEY,\n    name VARCHAR(30) NOT NULL,\n    telephone VARCHAR(20)\n)"
        );
    }

    #[test]
    fn test_create_table_serial_rejected_on_dsql() {
        let table = Table::new("t").column(Column::new("id", ColumnType::Serial).primary_key());
        let err = build_create_table(&table, Dialect::AuroraDsql).unwrap_err();
        assert!(err.to_string().contains("SERIAL"));
        assert!(build_create_table(&table, Dialect::Postgres).is_ok());
    }

    #[test]
    fn test_create_table_enum_becomes_check_on_dsql() {
        let table = Table::new("pet").column(Column::new(
            "species",
            ColumnType::Enum {
                name: "species".into(),
                labels: vec!["dog".into(), "cat".into()],
            },
        ));
        let sql = build_create_table(&table, Dialect::AuroraDsql).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE pet (\n    species TEXT CHECK (species IN ('dog', 'cat'))\n)"
        );

        let sql = build_create_table(&table, Dialect::Postgres).unwrap();
        assert_eq!(sql, "CREATE TABLE pet (\n    species species\n)");
    }

    #[test]
    fn test_create_table_references_omitted_on_dsql() {
        let table = Table::new("pet")
            .column(Column::new("owner_id", ColumnType::Uuid).references("owner(id)"));
        let sql = build_create_table(&table, Dialect::AuroraDsql).unwrap();
        assert!(!sql.contains("REFERENCES"));

        let sql = build_create_table(&table, Dialect::Postgres).unwrap();
        assert!(sql.contains("REFERENCES owner(id)"));
    }

    #[test]
    fn test_drop_table() {
        let table = Table::new("abc");
        assert_eq!(build_drop_table(&table), "DROP TABLE IF EXISTS abc");
    }
}
