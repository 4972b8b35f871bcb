//! IAM auth-token providers for Aurora DSQL.
//!
//! DSQL has no passwords: connections authenticate with a short-lived
//! token signed from IAM credentials. The engine builders take any
//! [`AuthTokenProvider`]; the default one wraps the AWS SDK's token
//! generator, and [`StaticTokenProvider`] serves tests and environments
//! where a token is issued out of band.

use async_trait::async_trait;

use aurora_dsql_core::config::EngineOptions;
use aurora_dsql_core::error::{DsqlError, DsqlResult};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_dsql::auth_token::{AuthTokenGenerator, Config};

/// Source of connection passwords for the engine builders.
#[async_trait]
pub trait AuthTokenProvider: Send + Sync {
    /// Produce a token usable as the connection password for `options`.
    async fn auth_token(&self, options: &EngineOptions) -> DsqlResult<String>;
}

/// Token provider backed by the AWS SDK.
///
/// Credentials resolve through the default provider chain, narrowed by
/// the options' profile/region, or replaced wholesale by an explicit
/// provider handed to [`AwsTokenProvider::with_credentials`].
#[derive(Default)]
pub struct AwsTokenProvider {
    credentials: Option<SharedCredentialsProvider>,
}

impl AwsTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: SharedCredentialsProvider) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }
}

#[async_trait]
impl AuthTokenProvider for AwsTokenProvider {
    async fn auth_token(&self, options: &EngineOptions) -> DsqlResult<String> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(credentials) = &self.credentials {
            loader = loader.credentials_provider(credentials.clone());
        }
        let sdk_config = loader.load().await;

        let mut builder = Config::builder()
            .hostname(options.endpoint())
            .expires_in(options.token_duration_secs);
        if let Some(region) = &options.region {
            builder = builder.region(Region::new(region.clone()));
        }
        let config = builder
            .build()
            .map_err(|e| DsqlError::Config(e.to_string()))?;
        let generator = AuthTokenGenerator::new(config);

        // The admin user gets the admin-scoped token, everyone else the
        // standard one.
        let token = if options.is_admin() {
            generator.db_connect_admin_auth_token(&sdk_config).await
        } else {
            generator.db_connect_auth_token(&sdk_config).await
        }
        .map_err(|e| DsqlError::Auth(e.to_string()))?;

        tracing::debug!(
            user = %options.user,
            host = %options.endpoint(),
            expires_in = options.token_duration_secs,
            "generated IAM auth token"
        );
        Ok(token.to_string())
    }
}

/// Fixed-token provider for tests and out-of-band token issuance.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthTokenProvider for StaticTokenProvider {
    async fn auth_token(&self, _options: &EngineOptions) -> DsqlResult<String> {
        Ok(self.token.clone())
    }
}
