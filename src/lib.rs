//! orgctl - Interactive Org-Chart Directory CLI
//!
//! orgctl manages an employee/department/role directory backed by a
//! relational schema: departments own roles, roles are held by employees,
//! and employees link to their manager through a nullable self-reference.
//! A menu-driven terminal front end collects names and selections and the
//! directory mapper turns them into parameterized SQL.
//!
//! # Core Principles
//! - Names resolve to surrogate ids in exactly one place, with an explicit
//!   exactly-one cardinality policy (no silent picks)
//! - The mapper depends on a single injected execution capability and is
//!   otherwise stateless
//! - Zero rows from a filtered read is an empty result, not an error
//! - Every storage failure surfaces verbatim; nothing is caught and
//!   swallowed below the prompt loop
//!
//! # Module Organization
//! - [`error`] - Error types and stable error codes
//! - [`executor`] - Query execution capability and the SQLite implementation
//! - [`directory`] - The org-directory mapper and its row shapes
//! - [`schema`] - DDL bootstrap for the three tables
//! - [`config`] - Database location resolution
//! - [`output`] - Terminal table rendering
//! - [`prompt`] - Interactive menu loop

pub mod config;
pub mod directory;
pub mod error;
pub mod executor;
pub mod output;
pub mod prompt;
pub mod schema;

// Re-export commonly used types for convenience
pub use directory::{DepartmentRow, EmployeeRow, OrgDirectory, RoleRow};
pub use error::{OrgError, Result};
pub use executor::{sqlite::SqliteExecutor, QueryExecutor, QueryOutcome, SqlValue};
