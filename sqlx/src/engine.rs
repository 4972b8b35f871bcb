//! Engine builder on the sqlx PostgreSQL driver.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Executor, PgPool};

use aurora_dsql_auth::{AuthTokenProvider, AwsTokenProvider};
use aurora_dsql_core::config::{EngineOptions, SslMode};
use aurora_dsql_core::ddl::quote_identifier;
use aurora_dsql_core::error::DsqlError;

use crate::EngineResult;

pub(crate) fn connect_options(options: &EngineOptions, token: &str) -> PgConnectOptions {
    let mut connect = PgConnectOptions::new()
        .host(&options.endpoint())
        .port(options.port)
        .username(&options.user)
        .password(token)
        .database(&options.database)
        .application_name(&options.application_name)
        .ssl_mode(match options.ssl_mode {
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyFull => PgSslMode::VerifyFull,
        });
    if let Some(cert) = &options.ssl_root_cert {
        connect = connect.ssl_root_cert(cert);
    }
    connect
}

/// Build a connection pool against a DSQL cluster, signing the auth
/// token with the default AWS provider.
pub async fn create_dsql_pool(options: &EngineOptions) -> EngineResult<PgPool> {
    create_dsql_pool_with(options, &AwsTokenProvider::new()).await
}

/// Build a connection pool with an explicit token provider.
///
/// The token is signed once when the pool is built and used as the
/// password for every pooled connection; keep `token_duration_secs`
/// above the pool's expected connection churn.
pub async fn create_dsql_pool_with(
    options: &EngineOptions,
    tokens: &dyn AuthTokenProvider,
) -> EngineResult<PgPool> {
    let token = tokens.auth_token(options).await?;
    let connect = connect_options(options, &token);

    let mut pool_options = PgPoolOptions::new()
        .min_connections(options.pool_size)
        .max_connections(options.max_connections());

    if let Some(schema) = options.search_path.clone() {
        pool_options = pool_options.after_connect(move |conn, _meta| {
            let stmt = format!("SET SESSION search_path = {}", quote_identifier(&schema));
            Box::pin(async move {
                conn.execute(stmt.as_str()).await?;
                Ok(())
            })
        });
    }

    let pool = pool_options.connect_with(connect).await?;
    tracing::info!(
        host = %options.endpoint(),
        user = %options.user,
        max_connections = options.max_connections(),
        "created Aurora DSQL connection pool"
    );
    Ok(pool)
}

/// Connectivity check: `SELECT 1` through the pool.
pub async fn ping(pool: &PgPool) -> EngineResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// The server's `server_version_num`, as fed to
/// [`aurora_dsql_core::reflect::Reflection::new`].
pub async fn server_version_num(pool: &PgPool) -> EngineResult<u32> {
    let row: (String,) = sqlx::query_as("SELECT current_setting('server_version_num')")
        .fetch_one(pool)
        .await?;
    row.0
        .parse()
        .map_err(|_| DsqlError::InvalidValue(format!("server_version_num: {}", row.0)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_dsql_core::config::Driver;

    #[test]
    fn test_connect_options_mapping() {
        let options = EngineOptions::new("test.dsql.us-east-1.on.aws", "admin");
        let connect = connect_options(&options, "token");
        assert_eq!(connect.get_host(), "test.dsql.us-east-1.on.aws");
        assert_eq!(connect.get_port(), 5432);
        assert_eq!(connect.get_username(), "admin");
        assert_eq!(connect.get_database(), Some("postgres"));
    }

    #[test]
    fn test_cluster_id_expands_with_region() {
        let options = EngineOptions::new("abcd1234", "admin").region("us-east-1");
        let connect = connect_options(&options, "token");
        assert_eq!(connect.get_host(), "abcd1234.dsql.us-east-1.on.aws");
    }

    #[test]
    fn test_default_pool_sizing() {
        let options = EngineOptions::new("h", "admin");
        assert_eq!(options.max_connections(), 15);
        assert_eq!(options.driver, Driver::Sqlx);
    }
}
