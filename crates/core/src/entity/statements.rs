//! SQL statement builders.
//!
//! Pure functions that render the handful of statements the mapper and the
//! relation loader issue. Only basic DML with `?` placeholders is produced,
//! which every supported engine accepts as-is.

use crate::storage::{BackendKind, OrmError, Result};

/// Name of the identity column every mapped table carries.
pub const IDENTITY_FIELD: &str = "id";

/// Checks that `name` can be spliced into statement text as an identifier.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(OrmError::InvalidData(format!(
            "'{name}' is not a valid column or table name"
        )))
    }
}

pub fn create_table(kind: BackendKind, table: &str, fields: &[String]) -> String {
    let columns = fields
        .iter()
        .map(|field| {
            if field == IDENTITY_FIELD {
                kind.identity_column().to_string()
            } else {
                format!("{field} TEXT")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {table} ({columns})")
}

pub fn insert(table: &str, keys: &[&str]) -> String {
    let placeholders = vec!["?"; keys.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        keys.join(", ")
    )
}

pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {table}")
}

pub fn select_by_id(table: &str) -> String {
    format!("SELECT * FROM {table} WHERE {IDENTITY_FIELD} = ?")
}

pub fn update_by_id(table: &str, keys: &[&str]) -> String {
    let assignments = keys
        .iter()
        .map(|key| format!("{key} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {table} SET {assignments} WHERE {IDENTITY_FIELD} = ?")
}

pub fn delete_by_id(table: &str) -> String {
    format!("DELETE FROM {table} WHERE {IDENTITY_FIELD} = ?")
}

pub fn select_by_foreign_key(table: &str, foreign_key: &str) -> String {
    format!("SELECT * FROM {table} WHERE {foreign_key} = ?")
}

/// Rows of `target` linked through `pivot_table` to a given source identity.
///
/// Pivot columns are text and identities are integers, so the identity is
/// cast to text for the join. `CHAR(n)` is the one spelling the CAST of
/// every supported engine accepts.
pub fn select_through_pivot(
    target: &str,
    pivot_table: &str,
    local_key: &str,
    foreign_key: &str,
) -> String {
    format!(
        "SELECT {target}.* FROM {target} \
         JOIN {pivot_table} \
         ON {pivot_table}.{foreign_key} = CAST({target}.{IDENTITY_FIELD} AS CHAR(20)) \
         WHERE {pivot_table}.{local_key} = ?"
    )
}
