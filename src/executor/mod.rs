//! Query Execution Capability
//!
//! This module defines the single capability the directory mapper depends on:
//! executing one parameterized SQL statement and returning its rows.
//!
//! # Stateless Design
//! Implementations open, use, and close their connection within each
//! `execute` call. No persistent connection is maintained and no state is
//! shared between calls.
//!
//! # Injection
//! The mapper ([`crate::directory::OrgDirectory`]) is generic over this
//! trait. The capability is constructed explicitly by the caller and passed
//! in; there is no module-global connection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::Result;

pub mod sqlite;

/// A scalar bound to a statement placeholder
///
/// Parameters are always bound positionally, never spliced into SQL text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// 64-bit integer
    Integer(i64),
    /// Double-precision float
    Real(f64),
    /// UTF-8 text
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// A result row: column name mapped to a JSON-safe scalar
pub type Row = HashMap<String, serde_json::Value>;

/// Result of executing one statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Column names in the result set (empty for DML statements)
    pub columns: Vec<String>,

    /// Result rows
    pub rows: Vec<Row>,

    /// Number of rows affected (for INSERT/UPDATE/DELETE, None for SELECT)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

impl QueryOutcome {
    /// Rows affected by a mutation, zero when storage reported nothing
    #[must_use]
    pub fn affected(&self) -> u64 {
        self.rows_affected.unwrap_or(0)
    }
}

/// Query execution capability
///
/// Exactly one round trip per call: the statement is prepared, parameters
/// are bound, and either the result set or the affected-row count is
/// returned. Errors from storage propagate verbatim; this layer never
/// retries, reconnects, or swallows a failure.
pub trait QueryExecutor {
    /// Execute one parameterized statement
    fn execute(
        &self,
        statement: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<QueryOutcome>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_conversions() {
        assert_eq!(SqlValue::from(42_i64), SqlValue::Integer(42));
        assert_eq!(SqlValue::from(90000.0_f64), SqlValue::Real(90000.0));
        assert_eq!(SqlValue::from("Ada"), SqlValue::Text("Ada".to_string()));
        assert_eq!(SqlValue::from("Ada".to_string()), SqlValue::Text("Ada".to_string()));
    }

    #[test]
    fn test_sql_value_display() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::Integer(7).to_string(), "7");
        assert_eq!(SqlValue::Text("Sales".into()).to_string(), "Sales");
    }

    #[test]
    fn test_outcome_affected_defaults_to_zero() {
        let outcome = QueryOutcome { columns: vec![], rows: vec![], rows_affected: None };
        assert_eq!(outcome.affected(), 0);

        let outcome = QueryOutcome { columns: vec![], rows: vec![], rows_affected: Some(3) };
        assert_eq!(outcome.affected(), 3);
    }
}
