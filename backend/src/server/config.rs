//! Environment-driven application settings and the server configuration object.
//!
//! Settings are read once at startup through [`mockable::Env`] so parsing is
//! unit-testable. Missing required values and unparsable values are fatal;
//! only the JWT secret length check is relaxed in debug builds.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use mockable::Env;
use todo_backend::middleware::RateLimitConfig;
use todo_backend::outbound::persistence::DbPool;
use tracing::warn;
use zeroize::Zeroizing;

const PG_USER_ENV: &str = "PG_USER";
const PG_PASSWORD_ENV: &str = "PG_PASSWORD";
const PG_DB_ENV: &str = "PG_DB";
const PG_HOST_ENV: &str = "PG_HOST";
const PG_PORT_ENV: &str = "PG_PORT";
const JWT_SECRET_ENV: &str = "JWT_SECRET";
const BIND_ADDR_ENV: &str = "BIND_ADDR";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECS";
const RATE_LIMIT_GLOBAL_ENV: &str = "RATE_LIMIT_GLOBAL";
const RATE_LIMIT_AUTH_ENV: &str = "RATE_LIMIT_AUTH";
const RATE_LIMIT_WINDOW_ENV: &str = "RATE_LIMIT_WINDOW_SECS";

const DEFAULT_PG_HOST: &str = "localhost";
const DEFAULT_PG_PORT: u16 = 5432;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub(crate) const JWT_SECRET_MIN_LEN: usize = 32;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const PORT_EXPECTED: &str = "a TCP port between 1 and 65535";
const ADDR_EXPECTED: &str = "a socket address such as 0.0.0.0:8080";
const POSITIVE_EXPECTED: &str = "a positive integer";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate short secrets and default to insecure cookies.
    Debug,
    /// Release builds enforce secret length and secure cookies by default.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The signing secret is too short for release builds.
    #[error("JWT_SECRET too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
}

/// PostgreSQL connection settings.
#[derive(Clone)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: Zeroizing<String>,
    pub name: String,
    pub host: String,
    pub port: u16,
}

fn quote_conninfo(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

impl DatabaseSettings {
    /// Key/value connection string understood by libpq and tokio-postgres.
    ///
    /// Values are quoted so passwords may contain spaces or URL delimiters.
    pub fn connection_string(&self) -> Zeroizing<String> {
        Zeroizing::new(format!(
            "host={} port={} user={} password={} dbname={}",
            quote_conninfo(&self.host),
            self.port,
            quote_conninfo(&self.user),
            quote_conninfo(&self.password),
            quote_conninfo(&self.name),
        ))
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Application settings parsed from the environment.
pub struct AppSettings {
    pub database: DatabaseSettings,
    pub jwt_secret: Zeroizing<Vec<u8>>,
    pub bind_addr: SocketAddr,
    pub cookie_secure: bool,
    pub request_timeout: Duration,
    pub rate_limit: RateLimitConfig,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database", &self.database)
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("cookie_secure", &self.cookie_secure)
            .field("request_timeout", &self.request_timeout)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl AppSettings {
    /// Parse settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing required variables, unparsable
    /// values, or a short JWT secret in release builds.
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        let database = DatabaseSettings {
            user: required(env, PG_USER_ENV)?,
            password: Zeroizing::new(required(env, PG_PASSWORD_ENV)?),
            name: required(env, PG_DB_ENV)?,
            host: optional(env, PG_HOST_ENV).unwrap_or_else(|| DEFAULT_PG_HOST.to_owned()),
            port: parse_or(env, PG_PORT_ENV, DEFAULT_PG_PORT, PORT_EXPECTED)
                .and_then(|port| non_zero(PG_PORT_ENV, port, PORT_EXPECTED))?,
        };

        let jwt_secret = jwt_secret_from_env(env, mode)?;

        let default_addr = SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|_| {
            ConfigError::InvalidEnv {
                name: BIND_ADDR_ENV,
                value: DEFAULT_BIND_ADDR.to_owned(),
                expected: ADDR_EXPECTED,
            }
        })?;
        let bind_addr = parse_or(env, BIND_ADDR_ENV, default_addr, ADDR_EXPECTED)?;

        let cookie_secure = cookie_secure_from_env(env, mode)?;

        let timeout_secs = positive(env, REQUEST_TIMEOUT_ENV, DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            global_limit: positive(env, RATE_LIMIT_GLOBAL_ENV, defaults.global_limit)?,
            auth_limit: positive(env, RATE_LIMIT_AUTH_ENV, defaults.auth_limit)?,
            window: Duration::from_secs(positive(
                env,
                RATE_LIMIT_WINDOW_ENV,
                defaults.window.as_secs(),
            )?),
        };

        Ok(Self {
            database,
            jwt_secret,
            bind_addr,
            cookie_secure,
            request_timeout: Duration::from_secs(timeout_secs),
            rate_limit,
        })
    }
}

fn optional<E: Env>(env: &E, name: &'static str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn required<E: Env>(env: &E, name: &'static str) -> Result<String, ConfigError> {
    optional(env, name).ok_or(ConfigError::MissingEnv { name })
}

fn parse_or<E: Env, T: FromStr>(
    env: &E,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match optional(env, name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                name,
                value,
                expected,
            }),
        None => Ok(default),
    }
}

fn non_zero<T>(name: &'static str, value: T, expected: &'static str) -> Result<T, ConfigError>
where
    T: Default + PartialEq + ToString,
{
    if value == T::default() {
        return Err(ConfigError::InvalidEnv {
            name,
            value: value.to_string(),
            expected,
        });
    }
    Ok(value)
}

fn positive<E: Env, T>(env: &E, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialEq + ToString,
{
    let value = parse_or(env, name, default, POSITIVE_EXPECTED)?;
    non_zero(name, value, POSITIVE_EXPECTED)
}

fn jwt_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
    let secret = Zeroizing::new(required(env, JWT_SECRET_ENV)?.into_bytes());
    if secret.len() < JWT_SECRET_MIN_LEN {
        if mode.is_debug() {
            warn!(
                length = secret.len(),
                min_len = JWT_SECRET_MIN_LEN,
                "JWT_SECRET shorter than recommended; accepted in debug builds only"
            );
        } else {
            return Err(ConfigError::SecretTooShort {
                length: secret.len(),
                min_len: JWT_SECRET_MIN_LEN,
            });
        }
    }
    Ok(secret)
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, ConfigError> {
    match optional(env, COOKIE_SECURE_ENV) {
        Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
        None => {
            let secure = !mode.is_debug();
            if !secure {
                warn!("SESSION_COOKIE_SECURE not set; session cookie will not be marked Secure");
            }
            Ok(secure)
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) request_timeout: Duration,
    pub(crate) rate_limit: RateLimitConfig,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from parsed settings.
    #[must_use]
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            cookie_secure: settings.cookie_secure,
            bind_addr: settings.bind_addr,
            request_timeout: settings.request_timeout,
            rate_limit: settings.rate_limit,
            db_pool: None,
        }
    }

    /// Attach the database connection pool used by the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
