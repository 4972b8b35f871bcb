//! dsql — Aurora DSQL dialect toolkit
//!
//! # Usage
//!
//! ```bash
//! # Render a CREATE INDEX statement
//! dsql index --name idx_owner_city --table owner --column city
//!
//! # Reflect table columns (reads CLUSTER_ENDPOINT/CLUSTER_USER/REGION/DRIVER)
//! dsql columns owner pet
//!
//! # Check connectivity
//! dsql ping
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use tracing_subscriber::EnvFilter;

use aurora_dsql_cli::columns::{print_columns, print_query, OutputFormat};
use aurora_dsql_cli::index::{render_index, IndexArgs};
use aurora_dsql_core::config::{Driver, EngineOptions};
use aurora_dsql_core::reflect::{ObjectKind, ObjectScope, Reflection};
use aurora_dsql_core::Dialect;

/// Assumed wire version when rendering reflection SQL offline.
const DEFAULT_SERVER_VERSION_NUM: u32 = 160_000;

#[derive(Parser)]
#[command(name = "dsql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aurora DSQL dialect toolkit", long_about = None)]
#[command(after_help = "EXAMPLES:
    dsql index --name idx --table owner --column city   # Render CREATE INDEX ASYNC
    dsql columns --schema public owner pet              # Reflect columns
    dsql columns --format sql                           # Print the reflection query
    dsql ping                                           # Check connectivity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum CliFormat {
    Sql,
    Json,
    Pretty,
}

impl From<CliFormat> for OutputFormat {
    fn from(val: CliFormat) -> Self {
        match val {
            CliFormat::Sql => OutputFormat::Sql,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Pretty => OutputFormat::Pretty,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CliKind {
    Tables,
    Views,
    MaterializedViews,
    ForeignTables,
    Any,
}

impl From<CliKind> for ObjectKind {
    fn from(val: CliKind) -> Self {
        match val {
            CliKind::Tables => ObjectKind::Tables,
            CliKind::Views => ObjectKind::Views,
            CliKind::MaterializedViews => ObjectKind::MaterializedViews,
            CliKind::ForeignTables => ObjectKind::ForeignTables,
            CliKind::Any => ObjectKind::Any,
        }
    }
}

#[derive(Args)]
struct ConnArgs {
    /// Cluster endpoint, or a bare cluster id combined with --region
    #[arg(long, env = "CLUSTER_ENDPOINT")]
    endpoint: Option<String>,

    /// Database user
    #[arg(long, env = "CLUSTER_USER")]
    user: Option<String>,

    /// AWS region for token signing and cluster-id expansion
    #[arg(long, env = "REGION")]
    region: Option<String>,

    /// Wire-driver backend: sqlx or postgres
    #[arg(long, env = "DRIVER", default_value = "sqlx")]
    driver: String,

    #[arg(long, default_value = "postgres")]
    database: String,

    /// AWS profile for credential resolution
    #[arg(long)]
    profile: Option<String>,

    /// Root certificate for TLS verification
    #[arg(long)]
    ssl_root_cert: Option<PathBuf>,

    /// Session search path (for non-admin users)
    #[arg(long)]
    search_path: Option<String>,
}

impl ConnArgs {
    fn engine_options(&self) -> Result<EngineOptions> {
        let endpoint = self.endpoint.clone().ok_or_else(|| {
            anyhow!("CLUSTER_ENDPOINT environment variable is not set (or pass --endpoint)")
        })?;
        let user = self.user.clone().ok_or_else(|| {
            anyhow!("CLUSTER_USER environment variable is not set (or pass --user)")
        })?;

        let mut options = EngineOptions::new(endpoint, user)
            .database(self.database.as_str())
            .driver(Driver::from_name(&self.driver)?);
        if let Some(region) = &self.region {
            options = options.region(region.as_str());
        }
        if let Some(profile) = &self.profile {
            options = options.profile(profile.as_str());
        }
        if let Some(cert) = &self.ssl_root_cert {
            options = options.ssl_root_cert(cert);
        }
        if let Some(schema) = &self.search_path {
            options = options.search_path(schema.as_str());
        }
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and run SELECT 1
    Ping {
        #[command(flatten)]
        conn: ConnArgs,
    },

    /// Reflect table columns through the catalog query
    Columns {
        #[command(flatten)]
        conn: ConnArgs,

        /// Restrict to these relations
        tables: Vec<String>,

        /// Restrict to one schema
        #[arg(long)]
        schema: Option<String>,

        #[arg(short, long, value_enum, default_value = "pretty")]
        format: CliFormat,

        #[arg(long, value_enum, default_value = "tables")]
        kind: CliKind,
    },

    /// Render a CREATE INDEX statement
    Index {
        #[arg(long)]
        name: String,

        #[arg(long)]
        table: String,

        /// Indexed column (repeatable)
        #[arg(long = "column")]
        columns: Vec<String>,

        /// Indexed expression (repeatable)
        #[arg(long = "expression")]
        expressions: Vec<String>,

        #[arg(long)]
        unique: bool,

        #[arg(long)]
        if_not_exists: bool,

        /// Index method for the USING clause
        #[arg(long)]
        using: Option<String>,

        /// Operator class as key=opclass (repeatable)
        #[arg(long = "op")]
        ops: Vec<String>,

        /// Non-key column for the INCLUDE clause (repeatable)
        #[arg(long = "include")]
        include: Vec<String>,

        #[arg(long)]
        nulls_not_distinct: Option<bool>,

        /// Storage parameter as parameter=value (repeatable)
        #[arg(long = "with")]
        with: Vec<String>,

        #[arg(long)]
        tablespace: Option<String>,

        /// Partial-index predicate
        #[arg(long = "where")]
        predicate: Option<String>,

        /// Target dialect
        #[arg(long, default_value = "auroradsql")]
        dialect: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ping { conn } => run_ping(&conn).await,
        Commands::Columns {
            conn,
            tables,
            schema,
            format,
            kind,
        } => {
            run_columns(
                &conn,
                &tables,
                schema.as_deref(),
                kind.into(),
                &format.into(),
            )
            .await
        }
        Commands::Index {
            name,
            table,
            columns,
            expressions,
            unique,
            if_not_exists,
            using,
            ops,
            include,
            nulls_not_distinct,
            with,
            tablespace,
            predicate,
            dialect,
        } => {
            let args = IndexArgs {
                name,
                table,
                columns,
                expressions,
                unique,
                if_not_exists,
                using,
                ops,
                include,
                nulls_not_distinct,
                with,
                tablespace,
                predicate,
            };
            let sql = render_index(&args, Dialect::from_name(&dialect)?)?;
            println!("{};", sql);
            Ok(())
        }
    }
}

async fn run_ping(conn: &ConnArgs) -> Result<()> {
    let options = conn.engine_options()?;
    match options.driver {
        Driver::Sqlx => {
            let pool = aurora_dsql_sqlx::create_dsql_pool(&options).await?;
            aurora_dsql_sqlx::ping(&pool).await?;
        }
        Driver::TokioPostgres => {
            let client = aurora_dsql_postgres::connect(&options).await?;
            aurora_dsql_postgres::ping(&client).await?;
        }
    }
    println!("{}", "✓ Connection OK".green().bold());
    Ok(())
}

async fn run_columns(
    conn: &ConnArgs,
    tables: &[String],
    schema: Option<&str>,
    kind: ObjectKind,
    format: &OutputFormat,
) -> Result<()> {
    // The sql format renders the query offline; no connection needed.
    if matches!(format, OutputFormat::Sql) {
        let reflection = Reflection::new(Dialect::AuroraDsql, DEFAULT_SERVER_VERSION_NUM);
        let sql = reflection.columns_query(schema, !tables.is_empty(), ObjectScope::Default, kind);
        print_query(&sql);
        return Ok(());
    }

    let options = conn.engine_options()?;
    let filter = (!tables.is_empty()).then_some(tables);
    let columns = match options.driver {
        Driver::Sqlx => {
            let pool = aurora_dsql_sqlx::create_dsql_pool(&options).await?;
            let version = aurora_dsql_sqlx::server_version_num(&pool).await?;
            let reflection = Reflection::new(Dialect::AuroraDsql, version);
            aurora_dsql_sqlx::fetch_columns(
                &pool,
                &reflection,
                schema,
                filter,
                ObjectScope::Default,
                kind,
            )
            .await?
        }
        Driver::TokioPostgres => {
            let client = aurora_dsql_postgres::connect(&options).await?;
            let version = aurora_dsql_postgres::server_version_num(&client).await?;
            let reflection = Reflection::new(Dialect::AuroraDsql, version);
            aurora_dsql_postgres::fetch_columns(
                &client,
                &reflection,
                schema,
                filter,
                ObjectScope::Default,
                kind,
            )
            .await?
        }
    };
    print_columns(&columns, format)
}
