//! SQLite value conversions.
//!
//! Pure functions for converting between JSON values and SQLite values.
//! These are testable in isolation without database access.

use minorm_core::storage::Row;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Number, Value};

/// Convert a JSON argument to a bindable SQLite value.
///
/// Arrays and objects are bound as their JSON text.
pub fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Convert a borrowed SQLite column value to JSON.
///
/// Non-finite reals become `null`, blobs become arrays of bytes and text
/// that is not valid UTF-8 is replaced lossily.
pub fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
    }
}

/// Convert a SQLite row to a [`Row`], keyed by the statement's column names.
pub fn row_to_record(row: &rusqlite::Row<'_>, columns: &[String]) -> rusqlite::Result<Row> {
    let mut record = Row::new();
    for (index, column) in columns.iter().enumerate() {
        record.insert(column.clone(), sql_to_json(row.get_ref(index)?));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_sql_scalars() {
        assert_eq!(json_to_sql(&Value::Null), SqlValue::Null);
        assert_eq!(json_to_sql(&json!(true)), SqlValue::Integer(1));
        assert_eq!(json_to_sql(&json!(42)), SqlValue::Integer(42));
        assert_eq!(json_to_sql(&json!(1.5)), SqlValue::Real(1.5));
        assert_eq!(json_to_sql(&json!("Ann")), SqlValue::Text("Ann".to_string()));
    }

    #[test]
    fn test_json_to_sql_nested_values_become_text() {
        assert_eq!(
            json_to_sql(&json!({"a": 1})),
            SqlValue::Text("{\"a\":1}".to_string())
        );
        assert_eq!(json_to_sql(&json!([1, 2])), SqlValue::Text("[1,2]".to_string()));
    }

    #[test]
    fn test_sql_to_json() {
        assert_eq!(sql_to_json(ValueRef::Null), Value::Null);
        assert_eq!(sql_to_json(ValueRef::Integer(7)), json!(7));
        assert_eq!(sql_to_json(ValueRef::Real(2.5)), json!(2.5));
        assert_eq!(sql_to_json(ValueRef::Real(f64::NAN)), Value::Null);
        assert_eq!(sql_to_json(ValueRef::Text(b"hello")), json!("hello"));
        assert_eq!(sql_to_json(ValueRef::Blob(&[1, 2])), json!([1, 2]));
    }
}
