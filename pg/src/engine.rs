//! Connection setup on the tokio-postgres driver.

use native_tls::{Certificate, TlsConnector};
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::config::{SslMode as PgSslMode, SslNegotiation};
use tokio_postgres::Client;

use aurora_dsql_auth::{AuthTokenProvider, AwsTokenProvider};
use aurora_dsql_core::config::{EngineOptions, SslMode};
use aurora_dsql_core::ddl::quote_identifier;
use aurora_dsql_core::retry::{retry_when, RetryPolicy, RETRYABLE_ERROR_CODES};

use crate::EngineResult;

pub(crate) fn pg_config(options: &EngineOptions, token: &str) -> tokio_postgres::Config {
    let mut config = tokio_postgres::Config::new();
    config
        .host(&options.endpoint())
        .port(options.port)
        .user(&options.user)
        .password(token)
        .dbname(&options.database)
        .application_name(&options.application_name)
        // Hostname verification happens in the TLS connector; Require
        // plus native-tls gives verify-full semantics.
        .ssl_mode(match options.ssl_mode {
            SslMode::Require | SslMode::VerifyFull => PgSslMode::Require,
        });
    if options.direct_tls {
        config.ssl_negotiation(SslNegotiation::Direct);
    }
    config
}

fn tls_connector(options: &EngineOptions) -> EngineResult<MakeTlsConnector> {
    let mut builder = TlsConnector::builder();
    if let Some(path) = &options.ssl_root_cert {
        let pem = std::fs::read(path)?;
        builder.add_root_certificate(Certificate::from_pem(&pem)?);
    }
    Ok(MakeTlsConnector::new(builder.build()?))
}

/// Connect to a DSQL cluster, signing the auth token with the default
/// AWS provider.
pub async fn connect(options: &EngineOptions) -> EngineResult<Client> {
    connect_with(options, &AwsTokenProvider::new()).await
}

/// Connect with an explicit token provider. A fresh token is signed for
/// every call.
pub async fn connect_with(
    options: &EngineOptions,
    tokens: &dyn AuthTokenProvider,
) -> EngineResult<Client> {
    let token = tokens.auth_token(options).await?;
    let config = pg_config(options, &token);
    let tls = tls_connector(options)?;

    let (client, connection) = config.connect(tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "connection task ended with error");
        }
    });

    if let Some(schema) = &options.search_path {
        let stmt = format!("SET SESSION search_path = {}", quote_identifier(schema));
        client.execute(stmt.as_str(), &[]).await?;
    }

    tracing::info!(
        host = %options.endpoint(),
        user = %options.user,
        "opened Aurora DSQL connection"
    );
    Ok(client)
}

/// Connectivity check: `SELECT 1`.
pub async fn ping(client: &Client) -> EngineResult<()> {
    client.query_one("SELECT 1", &[]).await?;
    Ok(())
}

/// The server's `server_version_num`, as fed to
/// [`aurora_dsql_core::reflect::Reflection::new`].
pub async fn server_version_num(client: &Client) -> EngineResult<u32> {
    let row = client
        .query_one("SELECT current_setting('server_version_num')", &[])
        .await?;
    let text: String = row.try_get(0)?;
    text.parse().map_err(|_| {
        aurora_dsql_core::error::DsqlError::InvalidValue(format!("server_version_num: {text}"))
            .into()
    })
}

/// Whether an error is an optimistic concurrency conflict.
///
/// DSQL surfaces the vendor code as the SQLSTATE; the message text is
/// checked too for errors relayed without a code.
fn is_retryable_pg(err: &tokio_postgres::Error) -> bool {
    if let Some(db) = err.as_db_error() {
        return RETRYABLE_ERROR_CODES.contains(&db.code().code())
            || aurora_dsql_core::retry::is_retryable(db.message());
    }
    aurora_dsql_core::retry::is_retryable(&err.to_string())
}

/// Execute `sql`, retrying on concurrency conflicts within the policy
/// bound. Returns the affected row count.
pub async fn execute_with_retry(
    client: &Client,
    sql: &str,
    policy: RetryPolicy,
) -> EngineResult<u64> {
    Ok(retry_when(policy, is_retryable_pg, || client.execute(sql, &[])).await?)
}
