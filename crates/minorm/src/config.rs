use std::env;

use minorm_core::storage::{BackendKind, DatabaseConfig, ServerConfig};

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_BACKEND: {0}")]
    InvalidBackend(String),

    #[error("DATABASE_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Database to connect to.
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATABASE_BACKEND` - `sqlite`, `mysql` or `postgres` (default: sqlite)
    /// - `SQLITE_PATH` - SQLite database path (default: "./data.db")
    /// - `DATABASE_HOST` - Server host (default: "localhost")
    /// - `DATABASE_PORT` - Server port (default: 3306 for MySQL, 5432 for PostgreSQL)
    /// - `DATABASE_USER` - Server user (default: "root" for MySQL, "postgres" for PostgreSQL)
    /// - `DATABASE_PASSWORD` - Server password (default: "pass")
    /// - `DATABASE_NAME` - Database name (default: "testdb")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup("DATABASE_BACKEND") {
            Some(value) => value
                .parse::<BackendKind>()
                .map_err(ConfigError::InvalidBackend)?,
            None => BackendKind::Sqlite,
        };

        let database = match kind {
            BackendKind::Sqlite => DatabaseConfig::Sqlite {
                path: lookup("SQLITE_PATH").unwrap_or_else(|| "./data.db".to_string()),
            },
            BackendKind::MySql => DatabaseConfig::MySql(server_config(&lookup, 3306, "root")?),
            BackendKind::Postgres => {
                DatabaseConfig::Postgres(server_config(&lookup, 5432, "postgres")?)
            }
        };

        Ok(Self { database })
    }
}

fn server_config<F>(
    lookup: &F,
    default_port: u16,
    default_user: &str,
) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let port = match lookup("DATABASE_PORT") {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(value))?,
        None => default_port,
    };

    Ok(ServerConfig {
        host: lookup("DATABASE_HOST").unwrap_or_else(|| "localhost".to_string()),
        port,
        user: lookup("DATABASE_USER").unwrap_or_else(|| default_user.to_string()),
        password: lookup("DATABASE_PASSWORD").unwrap_or_else(|| "pass".to_string()),
        database: lookup("DATABASE_NAME").unwrap_or_else(|| "testdb".to_string()),
    })
}
