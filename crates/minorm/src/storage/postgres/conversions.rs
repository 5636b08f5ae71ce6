//! PostgreSQL value conversions.
//!
//! PostgreSQL checks parameter and column types strictly, so integer widths
//! are tried one by one when decoding.

use minorm_core::storage::{OrmError, Result, Row};
use serde_json::{Number, Value};
use sqlx::postgres::{PgArguments, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{Column, Row as _, TypeInfo};

/// Binds every argument in order, each by its natural type.
pub fn bind_args<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    args: &'q [Value],
) -> Query<'q, Postgres, PgArguments> {
    for arg in args {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64()),
            },
            Value::String(s) => query.bind(s.as_str()),
            other => query.bind(other.to_string()),
        };
    }
    query
}

fn decode_column(row: &PgRow, index: usize) -> Result<Value> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<i16>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
        return Ok(v
            .and_then(|f| Number::from_f64(f64::from(f)))
            .map(Value::Number)
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map(Value::String).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map(Value::Bool).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }

    let column = &row.columns()[index];
    Err(OrmError::InvalidData(format!(
        "Unsupported PostgreSQL column type {} for column {}",
        column.type_info().name(),
        column.name()
    )))
}

/// Convert a PostgreSQL row to a [`Row`] keyed by column name.
pub fn row_to_record(row: &PgRow) -> Result<Row> {
    let mut record = Row::new();
    for column in row.columns() {
        record.insert(
            column.name().to_string(),
            decode_column(row, column.ordinal())?,
        );
    }
    Ok(record)
}
