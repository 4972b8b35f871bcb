//! Column reflection output.

use anyhow::Result;
use colored::*;

use aurora_dsql_core::reflect::ReflectedColumn;

/// Output format for reflection results.
#[derive(Clone)]
pub enum OutputFormat {
    Sql,
    Json,
    Pretty,
}

/// Print the reflection query text without running it.
pub fn print_query(sql: &str) {
    println!("{};", sql);
}

/// Print reflected columns in the chosen format.
pub fn print_columns(columns: &[ReflectedColumn], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(columns)?);
        }
        OutputFormat::Sql | OutputFormat::Pretty => {
            print_pretty(columns);
        }
    }
    Ok(())
}

fn print_pretty(columns: &[ReflectedColumn]) {
    let mut current_table: Option<&str> = None;
    for col in columns {
        if current_table != Some(col.table_name.as_str()) {
            current_table = Some(col.table_name.as_str());
            println!("{}", col.table_name.cyan().bold());
        }
        let Some(name) = &col.name else {
            println!("  {}", "(no user columns)".dimmed());
            continue;
        };
        let mut line = format!(
            "  {} {}",
            name.yellow(),
            col.format_type.as_deref().unwrap_or("?")
        );
        if col.not_null == Some(true) {
            line.push_str(&format!(" {}", "not null".white()));
        }
        if let Some(default) = &col.default {
            line.push_str(&format!(" default {}", default.dimmed()));
        }
        if let Some(generated) = &col.generated {
            if !generated.is_empty() {
                line.push_str(&format!(" generated {}", generated.dimmed()));
            }
        }
        println!("{}", line);
        if let Some(comment) = &col.comment {
            println!("    {}", comment.dimmed());
        }
    }
    if columns.is_empty() {
        println!("{}", "No columns found.".yellow());
    }
}
