//! Index-rendering contract tests for the Aurora DSQL dialect.

use aurora_dsql_core::ddl::{build_create_index, build_drop_index};
use aurora_dsql_core::schema::Index;
use aurora_dsql_core::Dialect;
use pretty_assertions::assert_eq;

#[test]
fn create_index_with_ops() {
    let idx = Index::new("test_idx1", "testtbl")
        .column("data")
        .op("data", "text_pattern_ops");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx1 ON testtbl (data text_pattern_ops)"
    );

    let idx2 = Index::new("test_idx2", "testtbl")
        .column("data")
        .column("data2")
        .op("data", "text_pattern_ops")
        .op("data2", "int4_ops");
    assert_eq!(
        build_create_index(&idx2, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx2 ON testtbl (data text_pattern_ops, data2 int4_ops)"
    );
}

#[test]
fn create_index_with_labeled_ops() {
    let idx = Index::new("test_idx1", "testtbl")
        .labeled_expression("data_lower", "lower(data)")
        .op("data_lower", "text_pattern_ops");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx1 ON testtbl ((lower(data)) text_pattern_ops)"
    );

    let idx2 = Index::new("test_idx2", "testtbl")
        .labeled_expression("bar", "xyz(data) + data2")
        .labeled_expression("foo", "data2")
        .op("bar", "text_pattern_ops")
        .op("foo", "int4_ops");
    assert_eq!(
        build_create_index(&idx2, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx2 ON testtbl ((xyz(data) + data2) text_pattern_ops, (data2) int4_ops)"
    );
}

#[test]
fn create_index_with_text_or_composite() {
    let idx = Index::new("test_idx2", "testtbl")
        .column("d1")
        .expression("y")
        .column("d2")
        .op("d1", "x1")
        .op("d2", "x2");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx2 ON testtbl (d1 x1, (y), d2 x2)"
    );

    // An unlabeled comparison expression does not pick up the "d2" op.
    let idx = Index::new("test_idx2", "testtbl")
        .column("d1")
        .expression("d2 > 5")
        .expression("q")
        .op("d1", "x1")
        .op("d2", "x2");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx2 ON testtbl (d1 x1, (d2 > 5), (q))"
    );

    // Labeling makes it work.
    let idx = Index::new("test_idx2", "testtbl")
        .column("d1")
        .labeled_expression("g", "d2 > 5")
        .expression("q")
        .op("d1", "x1")
        .op("g", "x2");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx2 ON testtbl (d1 x1, (d2 > 5) x2, (q))"
    );
}

#[test]
fn create_index_expr_gets_parens() {
    let idx = Index::new("test_idx1", "testtbl").expression("5 / (x + y)");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx1 ON testtbl ((5 / (x + y)))"
    );
}

#[test]
fn create_index_literals() {
    let idx = Index::new("test_idx1", "testtbl").expression("data + 5");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx1 ON testtbl ((data + 5))"
    );
}

#[test]
fn create_unique_index_with_nulls_distinct() {
    let idx = Index::new("test_idx1", "test_tbl")
        .column("data")
        .unique()
        .nulls_not_distinct(true);
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE UNIQUE INDEX ASYNC test_idx1 ON test_tbl (data) NULLS NOT DISTINCT"
    );

    let idx2 = Index::new("test_idx2", "test_tbl")
        .column("data2")
        .unique()
        .nulls_not_distinct(false);
    assert_eq!(
        build_create_index(&idx2, Dialect::AuroraDsql).unwrap(),
        "CREATE UNIQUE INDEX ASYNC test_idx2 ON test_tbl (data2) NULLS DISTINCT"
    );

    let idx3 = Index::new("test_idx3", "test_tbl").column("data3").unique();
    assert_eq!(
        build_create_index(&idx3, Dialect::AuroraDsql).unwrap(),
        "CREATE UNIQUE INDEX ASYNC test_idx3 ON test_tbl (data3)"
    );
}

#[test]
fn async_only_when_dialect_supports_it() {
    let idx = Index::new("test_idx1", "testtbl").column("data");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx1 ON testtbl (data)"
    );
    assert_eq!(
        build_create_index(&idx, Dialect::Postgres).unwrap(),
        "CREATE INDEX test_idx1 ON testtbl (data)"
    );
}

#[test]
fn create_index_concurrently() {
    let idx = Index::new("test_idx1", "testtbl").column("data").concurrently();
    assert_eq!(
        build_create_index(&idx, Dialect::Postgres).unwrap(),
        "CREATE INDEX CONCURRENTLY test_idx1 ON testtbl (data)"
    );
    // DSQL builds asynchronously instead; CONCURRENTLY is dropped.
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC test_idx1 ON testtbl (data)"
    );
}

#[test]
fn drop_index_concurrently() {
    let idx = Index::new("test_idx1", "testtbl").column("data").concurrently();
    assert_eq!(
        build_drop_index(&idx, Dialect::Postgres, false),
        "DROP INDEX CONCURRENTLY test_idx1"
    );
    assert_eq!(
        build_drop_index(&idx, Dialect::AuroraDsql, false),
        "DROP INDEX test_idx1"
    );
}

#[test]
fn index_extra_include() {
    let idx = Index::new("foo", "test").column("x").include("y");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC foo ON test (x) INCLUDE (y)"
    );
}

#[test]
fn create_index_where_clause() {
    let idx = Index::new("idx_active", "users")
        .column("email")
        .predicate("active = true");
    assert_eq!(
        build_create_index(&idx, Dialect::AuroraDsql).unwrap(),
        "CREATE INDEX ASYNC idx_active ON users (email) WHERE active = true"
    );
}
