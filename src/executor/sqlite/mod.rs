//! `SQLite` Execution Capability
//!
//! This module implements the [`QueryExecutor`] trait for `SQLite` databases.
//!
//! # Features
//! - File-based databases (`/path/to/company.db`)
//! - Parameterized statement execution with positional binding
//! - JSON-safe value conversion (BLOB data is Base64-encoded)
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - Connections are opened, used, and closed within each call
//! - `PRAGMA foreign_keys = ON` is set on every connection so the schema's
//!   referential constraints are actually enforced
//! - Constraint rejections map to `ConstraintViolation`; everything else at
//!   execution time maps to `QueryFailed`

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use std::path::PathBuf;

use crate::error::{OrgError, Result};
use crate::executor::{QueryExecutor, QueryOutcome, Row, SqlValue};

/// `SQLite` implementation of the query execution capability
///
/// Holds only the database file path; a fresh connection is opened per call.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    file: PathBuf,
}

impl SqliteExecutor {
    /// Create an executor for the given database file
    ///
    /// The file is created on first write if it does not exist.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    /// Path of the underlying database file
    #[must_use]
    pub fn file(&self) -> &PathBuf {
        &self.file
    }
}

impl QueryExecutor for SqliteExecutor {
    async fn execute(&self, statement: &str, params: &[SqlValue]) -> Result<QueryOutcome> {
        let conn = open_connection(&self.file)?;
        run_statement(&conn, statement, params)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Self::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Open a connection with foreign-key enforcement on
fn open_connection(file: &PathBuf) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;

    let conn = Connection::open_with_flags(file, flags).map_err(|e| {
        OrgError::connection_failed(format!("Failed to open SQLite database: {e}"))
    })?;

    conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(|e| {
        OrgError::connection_failed(format!("Failed to enable foreign keys: {e}"))
    })?;

    Ok(conn)
}

/// Prepare, bind, and run one statement
fn run_statement(conn: &Connection, statement: &str, params: &[SqlValue]) -> Result<QueryOutcome> {
    let mut stmt = conn
        .prepare(statement)
        .map_err(|e| OrgError::query_failed(format!("Failed to prepare statement: {e}")))?;

    // Column names must be collected before the statement is borrowed by query()
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();

    // A statement with no result columns is DML (INSERT, UPDATE, DELETE, DDL)
    if column_names.is_empty() {
        let affected = stmt.execute(params_from_iter(params.iter())).map_err(map_sqlite_error)?;
        return Ok(QueryOutcome {
            columns: column_names,
            rows: Vec::new(),
            rows_affected: Some(affected as u64),
        });
    }

    let mut rows_data: Vec<Row> = Vec::new();
    let mut rows = stmt.query(params_from_iter(params.iter())).map_err(map_sqlite_error)?;

    while let Some(row) = rows
        .next()
        .map_err(|e| OrgError::query_failed(format!("Failed to fetch row: {e}")))?
    {
        let mut mapped = Row::with_capacity(column_names.len());
        for (idx, name) in column_names.iter().enumerate() {
            let value = sqlite_value_to_json(row, idx)
                .map_err(|e| OrgError::query_failed(format!("Failed to read column {name}: {e}")))?;
            mapped.insert(name.clone(), value);
        }
        rows_data.push(mapped);
    }

    Ok(QueryOutcome { columns: column_names, rows: rows_data, rows_affected: None })
}

/// Map a `rusqlite` failure to the crate error taxonomy
fn map_sqlite_error(err: rusqlite::Error) -> OrgError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            OrgError::constraint(err.to_string())
        }
        _ => OrgError::query_failed(err.to_string()),
    }
}

/// Convert a `SQLite` value to a JSON value
fn sqlite_value_to_json(
    row: &rusqlite::Row,
    idx: usize,
) -> std::result::Result<serde_json::Value, rusqlite::Error> {
    let value_ref = row.get_ref(idx)?;

    Ok(match value_ref {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number), // Handle NaN/Infinity as null
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            serde_json::Value::String(text.to_string())
        }
        ValueRef::Blob(b) => {
            // Encode BLOB as Base64 for JSON safety
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(b);
            serde_json::Value::String(encoded)
        }
    })
}
