//! Checked-out database connections.
//!
//! A `Connection` owns one pooled connection for as long as it lives and
//! returns it to the engine when dropped, whichever way the caller exits.

use super::{ColumnInfo, DataFrame, Row, Value};
use crate::error::{KakapoError, Result};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{Decimal, JsonValue, Uuid};
use sqlx::{
    Column as SqlxColumn, Decode, Executor, Postgres, Row as SqlxRow, Statement, Type, TypeInfo,
    ValueRef,
};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// A connection checked out of a `DatabaseInfo` engine.
pub struct Connection {
    inner: PoolConnection<Postgres>,
    query_timeout: Duration,
}

impl Connection {
    pub(crate) fn new(inner: PoolConnection<Postgres>, query_timeout: Duration) -> Self {
        Self {
            inner,
            query_timeout,
        }
    }

    /// Runs a statement and collects every returned row into a frame.
    pub async fn query(&mut self, sql: &str) -> Result<DataFrame> {
        let start = Instant::now();

        let query_timeout = self.query_timeout;
        let inner = &mut *self.inner;

        let (result, columns) = timeout(query_timeout, async {
            let result = sqlx::query(sql)
                .fetch_all(&mut *inner)
                .await
                .map_err(|e| KakapoError::query(format_query_error(e)))?;

            let columns: Vec<ColumnInfo> = match result.first() {
                Some(first_row) => column_info(first_row.columns()),
                // No rows to read metadata from; ask the server for the statement shape
                None => fetch_column_metadata(inner, sql).await,
            };
            Ok::<_, KakapoError>((result, columns))
        })
        .await
        .map_err(|_| {
            KakapoError::query(format!(
                "Query timed out after {} seconds",
                query_timeout.as_secs()
            ))
        })??;

        let execution_time = start.elapsed();

        let rows: Vec<Row> = result.iter().map(convert_row).collect();
        debug!("Query returned {} rows in {:?}", rows.len(), execution_time);

        Ok(DataFrame::with_data(columns, rows).with_execution_time(execution_time))
    }

    /// Runs a statement that returns no rows, reporting rows affected.
    pub async fn execute(&mut self, sql: &str) -> Result<u64> {
        let result = timeout(self.query_timeout, (&mut *self.inner).execute(sql))
            .await
            .map_err(|_| {
                KakapoError::query(format!(
                    "Statement timed out after {} seconds",
                    self.query_timeout.as_secs()
                ))
            })?
            .map_err(|e| KakapoError::query(format_query_error(e)))?;

        Ok(result.rows_affected())
    }

    /// Direct access to the underlying sqlx connection.
    pub fn as_raw(&mut self) -> &mut PgConnection {
        &mut self.inner
    }

    /// Returns the connection to the engine now rather than at end of scope.
    pub fn release(self) {}
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("Releasing connection");
    }
}

/// Quotes an identifier for use in generated SQL.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

async fn fetch_column_metadata(conn: &mut PgConnection, sql: &str) -> Vec<ColumnInfo> {
    // Best effort: statements that cannot be prepared get no columns
    match conn.prepare(sql).await {
        Ok(statement) => column_info(statement.columns()),
        Err(e) => {
            debug!("Could not describe statement: {e}");
            Vec::new()
        }
    }
}

fn column_info<C: SqlxColumn>(columns: &[C]) -> Vec<ColumnInfo> {
    columns
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect()
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a PgRow to our Value type.
///
/// Exact numerics, temporal types, UUIDs and JSON come back as their
/// PostgreSQL text form. Types without a decoder fall back to the raw
/// value, so a non-NULL cell never reads as NULL.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    match type_name.to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => decode(row, index, type_name, Value::Bool),
        "INT2" | "SMALLINT" => decode(row, index, type_name, |v: i16| Value::Int(v as i64)),
        "INT4" | "INT" | "INTEGER" => decode(row, index, type_name, |v: i32| Value::Int(v as i64)),
        "INT8" | "BIGINT" => decode(row, index, type_name, Value::Int),
        "FLOAT4" | "REAL" => decode(row, index, type_name, |v: f32| Value::Float(v as f64)),
        "FLOAT8" | "DOUBLE PRECISION" => decode(row, index, type_name, Value::Float),
        "BYTEA" => decode(row, index, type_name, Value::Bytes),
        "NUMERIC" => decode(row, index, type_name, |v: Decimal| Value::String(v.to_string())),
        "DATE" => decode(row, index, type_name, |v: NaiveDate| Value::String(v.to_string())),
        "TIME" => decode(row, index, type_name, |v: NaiveTime| Value::String(v.to_string())),
        "TIMESTAMP" => decode(row, index, type_name, |v: NaiveDateTime| {
            Value::String(v.to_string())
        }),
        "TIMESTAMPTZ" => decode(row, index, type_name, |v: DateTime<Utc>| {
            Value::String(v.to_rfc3339())
        }),
        "UUID" => decode(row, index, type_name, |v: Uuid| Value::String(v.to_string())),
        "JSON" | "JSONB" => decode(row, index, type_name, |v: JsonValue| {
            Value::String(v.to_string())
        }),
        _ => decode(row, index, type_name, Value::String),
    }
}

/// Decodes a non-NULL cell as `T`, falling back to the raw value on mismatch.
fn decode<'r, T, F>(row: &'r PgRow, index: usize, type_name: &str, into: F) -> Value
where
    T: Decode<'r, Postgres> + Type<Postgres>,
    F: FnOnce(T) -> Value,
{
    match row.try_get::<T, _>(index) {
        Ok(value) => into(value),
        Err(e) => {
            debug!("Column {index} ({type_name}) has no typed decoder: {e}");
            raw_value(row, index)
        }
    }
}

/// Reads a cell without type checking. Text-like values (enum labels,
/// citext and the like) come back as strings, anything else as bytes.
fn raw_value(row: &PgRow, index: usize) -> Value {
    match row.try_get_unchecked::<Vec<u8>, _>(index) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) if !text.chars().any(char::is_control) => Value::String(text),
            Ok(text) => Value::Bytes(text.into_bytes()),
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        Err(_) => Value::Null,
    }
}

/// Formats a query error, adding server-side details when present.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = format!("ERROR: {}", db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        let details = [
            ("DETAIL", pg_error.detail()),
            ("HINT", pg_error.hint()),
            ("TABLE", pg_error.table()),
            ("COLUMN", pg_error.column()),
            ("CONSTRAINT", pg_error.constraint()),
        ];
        for (label, value) in details {
            if let Some(value) = value {
                result.push_str(&format!("\n  {label}: {value}"));
            }
        }
    }

    result
}
