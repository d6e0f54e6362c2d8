use std::{fmt, fs::read_to_string, net::IpAddr, str::FromStr, time::Duration};

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to read secret file {path}: {source}")]
    Secret {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
    pub database: DatabaseConfig,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection string; when set it wins over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.name)
                .username(&self.user)
                .password(&self.password)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = match lookup("DB_PASSWORD_FILE") {
            Some(path) => read_to_string(&path)
                .map(|s| s.trim().to_string())
                .map_err(|source| ConfigError::Secret { path, source })?,
            None => try_load(&lookup, "DB_PASSWORD", "changeme")?,
        };

        let timeout_secs: u64 = try_load(&lookup, "REQUEST_TIMEOUT_SECS", "30")?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "5000")?,
            request_timeout: Duration::from_secs(timeout_secs),
            database: DatabaseConfig {
                url: lookup("DATABASE_URL"),
                host: try_load(&lookup, "DB_HOST", "db")?,
                port: try_load(&lookup, "DB_PORT", "5432")?,
                name: try_load(&lookup, "DB_NAME", "userdb")?,
                user: try_load(&lookup, "DB_USER", "appuser")?,
                password,
                max_connections: try_load(&lookup, "DB_MAX_CONNECTIONS", "10")?,
                acquire_timeout_secs: try_load(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", "5")?,
            },
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
