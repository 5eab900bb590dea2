//! Directory Schema Bootstrap
//!
//! DDL for the three directory tables and an idempotent bootstrap entry
//! point. Cascade policy for dependent rows lives entirely in these
//! referential constraints; the mapper never cascades on its own.

use crate::error::Result;
use crate::executor::QueryExecutor;

/// Department table: surrogate id, unique human-entered name
const CREATE_DEPARTMENT: &str = "\
CREATE TABLE IF NOT EXISTS department (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE
)";

/// Role table: every role belongs to exactly one department
const CREATE_ROLE: &str = "\
CREATE TABLE IF NOT EXISTS role (
    id             INTEGER PRIMARY KEY,
    title          TEXT NOT NULL,
    salary         REAL NOT NULL CHECK (salary >= 0),
    department_id  INTEGER NOT NULL REFERENCES department(id)
)";

/// Employee table: required role, nullable self-referential manager
const CREATE_EMPLOYEE: &str = "\
CREATE TABLE IF NOT EXISTS employee (
    id          INTEGER PRIMARY KEY,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    role_id     INTEGER NOT NULL REFERENCES role(id),
    manager_id  INTEGER REFERENCES employee(id)
)";

/// Create the directory tables if they do not exist
///
/// Safe to run on every start; existing tables and data are untouched.
pub async fn ensure_schema<E: QueryExecutor>(executor: &E) -> Result<()> {
    for ddl in [CREATE_DEPARTMENT, CREATE_ROLE, CREATE_EMPLOYEE] {
        executor.execute(ddl, &[]).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::sqlite::SqliteExecutor;
    use crate::executor::SqlValue;

    fn temp_db(tag: &str) -> std::path::PathBuf {
        let temp_file = std::env::temp_dir().join(format!("orgctl_schema_{tag}.db"));
        let _ = std::fs::remove_file(&temp_file);
        temp_file
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let file = temp_db("idempotent");
        let exec = SqliteExecutor::new(&file);

        ensure_schema(&exec).await.unwrap();
        exec.execute("INSERT INTO department (name) VALUES (?)", &[SqlValue::from("Sales")])
            .await
            .unwrap();

        // A second bootstrap must not disturb existing data
        ensure_schema(&exec).await.unwrap();
        let outcome = exec.execute("SELECT name FROM department", &[]).await.unwrap();
        assert_eq!(outcome.rows.len(), 1);

        let _ = std::fs::remove_file(&file);
    }

    #[tokio::test]
    async fn test_salary_check_rejects_negative() {
        let file = temp_db("salary_check");
        let exec = SqliteExecutor::new(&file);
        ensure_schema(&exec).await.unwrap();

        exec.execute("INSERT INTO department (name) VALUES (?)", &[SqlValue::from("Sales")])
            .await
            .unwrap();
        let err = exec
            .execute(
                "INSERT INTO role (title, salary, department_id) VALUES (?, ?, 1)",
                &[SqlValue::from("Rep"), SqlValue::Real(-1.0)],
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "CONSTRAINT_VIOLATION");

        let _ = std::fs::remove_file(&file);
    }
}
