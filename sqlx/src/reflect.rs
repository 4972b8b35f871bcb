//! Column reflection over a sqlx pool.

use sqlx::{PgPool, Row};

use aurora_dsql_core::reflect::{ObjectKind, ObjectScope, ReflectedColumn, Reflection};

use crate::EngineResult;

/// Reflect columns of the targeted relations.
///
/// `filter_names` narrows the result to the named relations; `schema`
/// narrows to one schema, otherwise all non-system schemas are scanned.
pub async fn fetch_columns(
    pool: &PgPool,
    reflection: &Reflection,
    schema: Option<&str>,
    filter_names: Option<&[String]>,
    scope: ObjectScope,
    kind: ObjectKind,
) -> EngineResult<Vec<ReflectedColumn>> {
    let sql = reflection.columns_query(schema, filter_names.is_some(), scope, kind);

    let mut query = sqlx::query(sql.as_str());
    if let Some(schema) = schema {
        query = query.bind(schema);
    }
    if let Some(names) = filter_names {
        query = query.bind(names);
    }

    let rows = query.fetch_all(pool).await?;
    let columns = rows
        .iter()
        .map(|row| {
            Ok(ReflectedColumn {
                name: row.try_get("name")?,
                format_type: row.try_get("format_type")?,
                default: row.try_get("default")?,
                not_null: row.try_get("not_null")?,
                table_name: row.try_get("table_name")?,
                comment: row.try_get("comment")?,
                generated: row.try_get("generated")?,
                identity_options: row.try_get("identity_options")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;
    Ok(columns)
}
