//! Engine configuration shared by the wire-driver backends.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DsqlError, DsqlResult};

/// User name that receives admin auth tokens.
pub const ADMIN_USER: &str = "admin";

/// Default database name on a DSQL cluster.
pub const DEFAULT_DATABASE: &str = "postgres";

/// Default auth-token lifetime in seconds.
pub const DEFAULT_TOKEN_DURATION_SECS: u64 = 900;

/// The supported wire-driver backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Driver {
    #[default]
    Sqlx,
    TokioPostgres,
}

impl Driver {
    pub fn from_name(name: &str) -> DsqlResult<Self> {
        match name {
            "sqlx" => Ok(Self::Sqlx),
            "postgres" | "tokio-postgres" | "tokio_postgres" => Ok(Self::TokioPostgres),
            other => Err(DsqlError::UnsupportedDriver(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqlx => "sqlx",
            Self::TokioPostgres => "postgres",
        }
    }
}

/// TLS verification level. DSQL clusters always require TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SslMode {
    Require,
    #[default]
    VerifyFull,
}

/// Connection options for the engine builders.
///
/// `host` may be a full cluster endpoint or a bare cluster id; a bare id
/// plus `region` expands to `<id>.dsql.<region>.on.aws`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOptions {
    pub host: String,
    pub user: String,
    pub database: String,
    pub port: u16,
    pub driver: Driver,
    /// Connections kept open across the pool's lifetime.
    pub pool_size: u32,
    /// Additional connections allowed under burst load.
    pub max_overflow: u32,
    pub ssl_mode: SslMode,
    pub ssl_root_cert: Option<PathBuf>,
    /// Negotiate TLS directly instead of via the protocol handshake.
    /// Only the tokio-postgres backend has the knob.
    pub direct_tls: bool,
    pub application_name: String,
    /// Session search path set on connect; used with non-admin users
    /// whose objects live outside `public`.
    pub search_path: Option<String>,
    /// AWS profile for credential resolution.
    pub profile: Option<String>,
    pub region: Option<String>,
    pub token_duration_secs: u64,
}

impl EngineOptions {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            database: DEFAULT_DATABASE.to_string(),
            port: 5432,
            driver: Driver::default(),
            pool_size: 5,
            max_overflow: 10,
            ssl_mode: SslMode::default(),
            ssl_root_cert: None,
            direct_tls: true,
            application_name: "aurora-dsql".to_string(),
            search_path: None,
            profile: None,
            region: None,
            token_duration_secs: DEFAULT_TOKEN_DURATION_SECS,
        }
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn driver(mut self, driver: Driver) -> Self {
        self.driver = driver;
        self
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size;
        self
    }

    pub fn max_overflow(mut self, overflow: u32) -> Self {
        self.max_overflow = overflow;
        self
    }

    pub fn ssl_mode(mut self, mode: SslMode) -> Self {
        self.ssl_mode = mode;
        self
    }

    pub fn ssl_root_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssl_root_cert = Some(path.into());
        self
    }

    pub fn direct_tls(mut self, enabled: bool) -> Self {
        self.direct_tls = enabled;
        self
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    pub fn search_path(mut self, schema: impl Into<String>) -> Self {
        self.search_path = Some(schema.into());
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn token_duration_secs(mut self, secs: u64) -> Self {
        self.token_duration_secs = secs;
        self
    }

    /// The endpoint to dial, expanding a bare cluster id when a region
    /// is known.
    pub fn endpoint(&self) -> String {
        if self.host.contains('.') {
            return self.host.clone();
        }
        match &self.region {
            Some(region) => format!("{}.dsql.{}.on.aws", self.host, region),
            None => self.host.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user == ADMIN_USER
    }

    /// Upper bound on pooled connections: the persistent pool plus the
    /// overflow allowance.
    pub fn max_connections(&self) -> u32 {
        self.pool_size + self.max_overflow
    }
}
