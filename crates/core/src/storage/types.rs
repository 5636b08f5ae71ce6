use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single fetched row: column name to scalar value.
///
/// After relation loading a row also carries one key per related table,
/// holding an array of rows or a single row (or `null`).
pub type Row = Map<String, Value>;

/// The database engines a connection can be opened against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Embedded single-file store.
    Sqlite,
    /// Client-server engine reached over the MySQL protocol.
    MySql,
    /// Client-server engine reached over the PostgreSQL protocol.
    Postgres,
}

impl BackendKind {
    /// Column definition for the auto-generated identity field.
    ///
    /// Auto-increment syntax is the one piece of DDL that differs between
    /// engines, so it is owned here rather than by the statement builders.
    pub fn identity_column(self) -> &'static str {
        match self {
            BackendKind::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
            BackendKind::MySql => "id BIGINT PRIMARY KEY AUTO_INCREMENT",
            BackendKind::Postgres => "id BIGSERIAL PRIMARY KEY",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::MySql => "mysql",
            BackendKind::Postgres => "postgres",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(BackendKind::Sqlite),
            "mysql" => Ok(BackendKind::MySql),
            "postgres" | "postgresql" | "pg" => Ok(BackendKind::Postgres),
            other => Err(format!("Unknown database backend: {other}")),
        }
    }
}

/// Connection settings for a client-server engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Which database to connect to, and how.
///
/// Built once at process start and handed to the backend connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// SQLite file path. `:memory:` opens a private in-memory database.
    Sqlite { path: String },
    MySql(ServerConfig),
    Postgres(ServerConfig),
}

impl DatabaseConfig {
    pub fn kind(&self) -> BackendKind {
        match self {
            DatabaseConfig::Sqlite { .. } => BackendKind::Sqlite,
            DatabaseConfig::MySql(_) => BackendKind::MySql,
            DatabaseConfig::Postgres(_) => BackendKind::Postgres,
        }
    }

    /// In-memory SQLite, mostly useful in tests.
    pub fn sqlite_in_memory() -> Self {
        DatabaseConfig::Sqlite {
            path: ":memory:".to_string(),
        }
    }
}

/// Outcome of an INSERT, UPDATE or DELETE statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResult {
    /// Identity assigned by the engine, when the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inserted_id: Option<i64>,
    /// Number of rows the statement touched.
    pub affected_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str_accepts_aliases() {
        assert_eq!("sqlite".parse::<BackendKind>(), Ok(BackendKind::Sqlite));
        assert_eq!("MySQL".parse::<BackendKind>(), Ok(BackendKind::MySql));
        assert_eq!("postgres".parse::<BackendKind>(), Ok(BackendKind::Postgres));
        assert_eq!(
            " PostgreSQL ".parse::<BackendKind>(),
            Ok(BackendKind::Postgres)
        );
    }

    #[test]
    fn test_backend_kind_from_str_rejects_unknown() {
        let err = "oracle".parse::<BackendKind>().unwrap_err();
        assert_eq!(err, "Unknown database backend: oracle");
    }

    #[test]
    fn test_identity_column_per_backend() {
        assert!(BackendKind::Sqlite.identity_column().contains("AUTOINCREMENT"));
        assert!(BackendKind::MySql.identity_column().contains("AUTO_INCREMENT"));
        assert!(BackendKind::Postgres.identity_column().contains("BIGSERIAL"));
        for kind in [BackendKind::Sqlite, BackendKind::MySql, BackendKind::Postgres] {
            assert!(kind.identity_column().starts_with("id "));
        }
    }

    #[test]
    fn test_database_config_kind() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "pass".to_string(),
            database: "testdb".to_string(),
        };

        assert_eq!(DatabaseConfig::sqlite_in_memory().kind(), BackendKind::Sqlite);
        assert_eq!(
            DatabaseConfig::MySql(server.clone()).kind(),
            BackendKind::MySql
        );
        assert_eq!(DatabaseConfig::Postgres(server).kind(), BackendKind::Postgres);
    }

    #[test]
    fn test_mutate_result_serializes_camel_case() {
        let result = MutateResult {
            inserted_id: Some(7),
            affected_count: 1,
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json, serde_json::json!({"insertedId": 7, "affectedCount": 1}));
    }

    #[test]
    fn test_mutate_result_omits_missing_inserted_id() {
        let result = MutateResult {
            inserted_id: None,
            affected_count: 0,
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json, serde_json::json!({"affectedCount": 0}));
    }
}
