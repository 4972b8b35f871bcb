//! Column reflection over a tokio-postgres client.

use tokio_postgres::types::ToSql;
use tokio_postgres::Client;

use aurora_dsql_core::reflect::{ObjectKind, ObjectScope, ReflectedColumn, Reflection};

use crate::EngineResult;

/// Reflect columns of the targeted relations.
pub async fn fetch_columns(
    client: &Client,
    reflection: &Reflection,
    schema: Option<&str>,
    filter_names: Option<&[String]>,
    scope: ObjectScope,
    kind: ObjectKind,
) -> EngineResult<Vec<ReflectedColumn>> {
    let sql = reflection.columns_query(schema, filter_names.is_some(), scope, kind);

    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
    if let Some(schema) = &schema {
        params.push(schema);
    }
    if let Some(names) = &filter_names {
        params.push(names);
    }

    let rows = client.query(sql.as_str(), &params).await?;
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
        .collect::<Result<Vec<_>, tokio_postgres::Error>>()?;
    Ok(columns)
}
