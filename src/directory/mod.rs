//! Org Directory Mapper
//!
//! [`OrgDirectory`] translates high-level directory operations into
//! parameterized SQL against the three-table schema (department, role,
//! employee) and translates result rows into the typed shapes below.
//!
//! # Design
//! - The mapper owns all SQL text and parameter construction. Callers never
//!   see SQL.
//! - Every human-entered name or title crosses exactly one resolution
//!   boundary ([`resolve`]) before it is used as a foreign key. The lone
//!   exception is the department reference in [`OrgDirectory::add_role`],
//!   which resolves inside the INSERT so the operation is atomic with
//!   respect to concurrent department creation.
//! - Mutations return the storage acknowledgment (rows affected). Reads
//!   returning zero rows are empty results, never errors.
//! - The mapper is stateless apart from the injected execution capability,
//!   performs no local recovery, and surfaces the first error verbatim.

use serde::{Deserialize, Serialize};

use crate::error::{OrgError, Result};
use crate::executor::{QueryExecutor, Row, SqlValue};

pub mod resolve;

pub use resolve::split_display_name;

/// A department row: `id`, `name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRow {
    pub id: i64,
    pub name: String,
}

/// A role joined to its department: `role_id`, `job_title`, `salary`, `department`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRow {
    pub role_id: i64,
    pub job_title: String,
    pub salary: f64,
    pub department: String,
}

/// An employee joined to role, department, and manager display name
///
/// The joined columns are optional because the employee listing uses outer
/// joins: an employee whose role or department no longer resolves still
/// appears, and `manager` is `None` at the top of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub manager: Option<String>,
}

impl EmployeeRow {
    /// The `"first last"` rendering used everywhere a human refers to an employee
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Employee listing with role, department, salary, and manager display name.
/// Outer joins keep employees visible when the manager (or, for malformed
/// data, the role) is absent. Ordered by id for deterministic output.
const SELECT_ALL_EMPLOYEES: &str = "\
SELECT employee.id, employee.first_name, employee.last_name,
       role.title, department.name AS department, role.salary,
       manager.first_name || ' ' || manager.last_name AS manager
FROM employee
LEFT JOIN role ON employee.role_id = role.id
LEFT JOIN department ON role.department_id = department.id
LEFT JOIN employee AS manager ON employee.manager_id = manager.id
ORDER BY employee.id";

/// Direct reports of one manager, same row shape as the full listing
const SELECT_EMPLOYEES_BY_MANAGER: &str = "\
SELECT employee.id, employee.first_name, employee.last_name,
       role.title, department.name AS department, role.salary,
       manager.first_name || ' ' || manager.last_name AS manager
FROM employee
LEFT JOIN role ON employee.role_id = role.id
LEFT JOIN department ON role.department_id = department.id
LEFT JOIN employee AS manager ON employee.manager_id = manager.id
WHERE employee.manager_id = ?1
ORDER BY employee.id";

/// Employees of one department, joined through role. The department join is
/// inner so the name filter is exact.
const SELECT_EMPLOYEES_BY_DEPARTMENT: &str = "\
SELECT employee.id, employee.first_name, employee.last_name,
       role.title, department.name AS department, role.salary,
       manager.first_name || ' ' || manager.last_name AS manager
FROM employee
LEFT JOIN role ON employee.role_id = role.id
JOIN department ON role.department_id = department.id
LEFT JOIN employee AS manager ON employee.manager_id = manager.id
WHERE department.name = ?1
ORDER BY employee.id";

/// Roles joined to their owning department. Inner join: a role whose
/// department does not resolve is invisible rather than an error.
const SELECT_ALL_ROLES: &str = "\
SELECT role.id AS role_id, role.title AS job_title, role.salary,
       department.name AS department
FROM role
JOIN department ON role.department_id = department.id";

/// Role insert resolving the department inside the statement. A name that
/// does not resolve leaves `department_id` NULL and the insert fails closed.
const INSERT_ROLE: &str = "\
INSERT INTO role (title, salary, department_id)
VALUES (?1, ?2, (SELECT id FROM department WHERE name = ?3))";

/// The name-resolving CRUD mapper over the org-chart schema
///
/// Generic over the injected [`QueryExecutor`] capability; holds nothing
/// else. One outstanding query per invocation, no caching, no retries.
pub struct OrgDirectory<E: QueryExecutor> {
    executor: E,
}

impl<E: QueryExecutor> OrgDirectory<E> {
    /// Create a directory over the given execution capability
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    // ------------------------------------------------------------------
    // Lookup / listing operations
    // ------------------------------------------------------------------

    /// All department names, for selection lists
    pub async fn list_department_names(&self) -> Result<Vec<String>> {
        let outcome = self.executor.execute("SELECT name FROM department", &[]).await?;
        outcome.rows.iter().map(|row| req_str(row, "name")).collect()
    }

    /// All role titles, for selection lists
    pub async fn list_role_titles(&self) -> Result<Vec<String>> {
        let outcome = self.executor.execute("SELECT title FROM role", &[]).await?;
        outcome.rows.iter().map(|row| req_str(row, "title")).collect()
    }

    /// All employees rendered as `"first last"`, for selection lists
    pub async fn list_employee_display_names(&self) -> Result<Vec<String>> {
        let outcome = self
            .executor
            .execute("SELECT first_name || ' ' || last_name AS name FROM employee", &[])
            .await?;
        outcome.rows.iter().map(|row| req_str(row, "name")).collect()
    }

    /// Every department row
    pub async fn all_departments(&self) -> Result<Vec<DepartmentRow>> {
        let outcome = self.executor.execute("SELECT id, name FROM department", &[]).await?;
        outcome.rows.iter().map(department_from_row).collect()
    }

    /// Every role joined to its department name
    pub async fn all_roles(&self) -> Result<Vec<RoleRow>> {
        let outcome = self.executor.execute(SELECT_ALL_ROLES, &[]).await?;
        outcome.rows.iter().map(role_from_row).collect()
    }

    /// Every employee with role, department, salary, and manager display name
    pub async fn all_employees(&self) -> Result<Vec<EmployeeRow>> {
        let outcome = self.executor.execute(SELECT_ALL_EMPLOYEES, &[]).await?;
        outcome.rows.iter().map(employee_from_row).collect()
    }

    /// Direct reports of the named manager, ordered by employee id
    ///
    /// Zero employees matching the display name is an empty result, not an
    /// error. Two or more matches is a [`ResolutionFailure`]: picking one
    /// silently would report another manager's team.
    ///
    /// [`ResolutionFailure`]: OrgError::ResolutionFailure
    pub async fn employees_by_manager(&self, manager_display: &str) -> Result<Vec<EmployeeRow>> {
        let (first, last) = split_display_name(manager_display)?;
        let candidates = self.employee_candidates(&first, &last, None).await?;

        let manager_id = match candidates.len() {
            0 => return Ok(Vec::new()),
            1 => candidates[0],
            n => return Err(OrgError::resolution("employee", manager_display, n)),
        };

        let outcome = self
            .executor
            .execute(SELECT_EMPLOYEES_BY_MANAGER, &[SqlValue::Integer(manager_id)])
            .await?;
        outcome.rows.iter().map(employee_from_row).collect()
    }

    /// Employees belonging to the named department, ordered by employee id
    pub async fn employees_by_department(&self, department_name: &str) -> Result<Vec<EmployeeRow>> {
        let outcome = self
            .executor
            .execute(SELECT_EMPLOYEES_BY_DEPARTMENT, &[SqlValue::from(department_name)])
            .await?;
        outcome.rows.iter().map(employee_from_row).collect()
    }

    /// Sum of role salaries for the named department
    ///
    /// A department with no roles (or an unknown department) sums to NULL at
    /// storage; that is returned as zero.
    pub async fn department_budget(&self, department_name: &str) -> Result<f64> {
        let outcome = self
            .executor
            .execute(
                "SELECT SUM(role.salary) AS total_budget
                 FROM role
                 JOIN department ON role.department_id = department.id
                 WHERE department.name = ?1",
                &[SqlValue::from(department_name)],
            )
            .await?;

        Ok(outcome
            .rows
            .first()
            .and_then(|row| row.get("total_budget"))
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0))
    }

    // ------------------------------------------------------------------
    // Mutation operations
    // ------------------------------------------------------------------

    /// Insert a new department
    ///
    /// A duplicate name is rejected by the storage uniqueness constraint and
    /// surfaces as [`OrgError::ConstraintViolation`].
    pub async fn add_department(&self, name: &str) -> Result<u64> {
        let outcome = self
            .executor
            .execute("INSERT INTO department (name) VALUES (?1)", &[SqlValue::from(name)])
            .await?;
        Ok(outcome.affected())
    }

    /// Insert a new role under the named department
    ///
    /// The department resolves via subquery inside the INSERT, closing the
    /// window between lookup and use. `department.name` is unique, so the
    /// only resolution failure mode is zero matches, which storage reports
    /// as a NOT NULL rejection on `role.department_id`.
    pub async fn add_role(&self, title: &str, salary: f64, department_name: &str) -> Result<u64> {
        let params =
            [SqlValue::from(title), SqlValue::Real(salary), SqlValue::from(department_name)];

        match self.executor.execute(INSERT_ROLE, &params).await {
            Ok(outcome) => Ok(outcome.affected()),
            Err(OrgError::ConstraintViolation(detail))
                if detail.contains("role.department_id") =>
            {
                Err(OrgError::resolution("department", department_name, 0))
            }
            Err(err) => Err(err),
        }
    }

    /// Insert a new employee reporting to the named manager
    ///
    /// The role title and manager display name must each resolve to exactly
    /// one row; otherwise nothing is inserted.
    pub async fn add_employee(
        &self,
        first_name: &str,
        last_name: &str,
        role_title: &str,
        manager_display: &str,
    ) -> Result<u64> {
        resolve::ensure_name_token(first_name)?;
        resolve::ensure_name_token(last_name)?;
        let role_id = self.resolve_role(role_title).await?;
        let manager_id = self.resolve_employee(manager_display, None).await?;

        let outcome = self
            .executor
            .execute(
                "INSERT INTO employee (first_name, last_name, role_id, manager_id)
                 VALUES (?1, ?2, ?3, ?4)",
                &[
                    SqlValue::from(first_name),
                    SqlValue::from(last_name),
                    SqlValue::Integer(role_id),
                    SqlValue::Integer(manager_id),
                ],
            )
            .await?;
        Ok(outcome.affected())
    }

    /// Insert an employee with no manager (top of a branch)
    ///
    /// The explicit "no manager" operation; never attempts manager
    /// resolution.
    pub async fn add_top_level_employee(
        &self,
        first_name: &str,
        last_name: &str,
        role_title: &str,
    ) -> Result<u64> {
        resolve::ensure_name_token(first_name)?;
        resolve::ensure_name_token(last_name)?;
        let role_id = self.resolve_role(role_title).await?;

        let outcome = self
            .executor
            .execute(
                "INSERT INTO employee (first_name, last_name, role_id, manager_id)
                 VALUES (?1, ?2, ?3, NULL)",
                &[
                    SqlValue::from(first_name),
                    SqlValue::from(last_name),
                    SqlValue::Integer(role_id),
                ],
            )
            .await?;
        Ok(outcome.affected())
    }

    /// Delete the department with the given name
    ///
    /// No cardinality pre-check; dependent-row policy is storage's.
    pub async fn remove_department(&self, name: &str) -> Result<u64> {
        let outcome = self
            .executor
            .execute("DELETE FROM department WHERE name = ?1", &[SqlValue::from(name)])
            .await?;
        Ok(outcome.affected())
    }

    /// Delete the role with the given title
    pub async fn remove_role(&self, title: &str) -> Result<u64> {
        let outcome = self
            .executor
            .execute("DELETE FROM role WHERE title = ?1", &[SqlValue::from(title)])
            .await?;
        Ok(outcome.affected())
    }

    /// Delete the employee matching display name and role title
    ///
    /// The role title disambiguates employees sharing a first and last name.
    pub async fn remove_employee(&self, display_name: &str, role_title: &str) -> Result<u64> {
        let id = self.resolve_employee(display_name, Some(role_title)).await?;
        self.delete_employee_by_id(id).await
    }

    /// Delete the employee matching display name alone
    ///
    /// The explicit unqualified variant: fails with
    /// [`OrgError::ResolutionFailure`] when the name is ambiguous.
    pub async fn remove_employee_by_name(&self, display_name: &str) -> Result<u64> {
        let id = self.resolve_employee(display_name, None).await?;
        self.delete_employee_by_id(id).await
    }

    /// Move an employee to a new role under a new manager, in one statement
    pub async fn update_employee_role_and_manager(
        &self,
        employee_display: &str,
        new_role_title: &str,
        new_manager_display: &str,
    ) -> Result<u64> {
        let employee_id = self.resolve_employee(employee_display, None).await?;
        let role_id = self.resolve_role(new_role_title).await?;
        let manager_id = self.resolve_employee(new_manager_display, None).await?;

        let outcome = self
            .executor
            .execute(
                "UPDATE employee SET role_id = ?1, manager_id = ?2 WHERE id = ?3",
                &[
                    SqlValue::Integer(role_id),
                    SqlValue::Integer(manager_id),
                    SqlValue::Integer(employee_id),
                ],
            )
            .await?;
        Ok(outcome.affected())
    }

    /// Move an employee to a role with no manager above it
    ///
    /// Sets the new role and explicitly nulls `manager_id`.
    pub async fn promote_to_manager_role(
        &self,
        employee_display: &str,
        new_role_title: &str,
    ) -> Result<u64> {
        let employee_id = self.resolve_employee(employee_display, None).await?;
        let role_id = self.resolve_role(new_role_title).await?;

        let outcome = self
            .executor
            .execute(
                "UPDATE employee SET role_id = ?1, manager_id = NULL WHERE id = ?2",
                &[SqlValue::Integer(role_id), SqlValue::Integer(employee_id)],
            )
            .await?;
        Ok(outcome.affected())
    }

    /// Change only an employee's manager, both sides role-qualified
    pub async fn reassign_manager(
        &self,
        employee_display: &str,
        employee_role_title: &str,
        new_manager_display: &str,
        new_manager_role_title: &str,
    ) -> Result<u64> {
        let employee_id =
            self.resolve_employee(employee_display, Some(employee_role_title)).await?;
        let manager_id =
            self.resolve_employee(new_manager_display, Some(new_manager_role_title)).await?;

        let outcome = self
            .executor
            .execute(
                "UPDATE employee SET manager_id = ?1 WHERE id = ?2",
                &[SqlValue::Integer(manager_id), SqlValue::Integer(employee_id)],
            )
            .await?;
        Ok(outcome.affected())
    }

    async fn delete_employee_by_id(&self, id: i64) -> Result<u64> {
        let outcome = self
            .executor
            .execute("DELETE FROM employee WHERE id = ?1", &[SqlValue::Integer(id)])
            .await?;
        Ok(outcome.affected())
    }
}

// ----------------------------------------------------------------------
// Row translation
// ----------------------------------------------------------------------

fn department_from_row(row: &Row) -> Result<DepartmentRow> {
    Ok(DepartmentRow { id: req_i64(row, "id")?, name: req_str(row, "name")? })
}

fn role_from_row(row: &Row) -> Result<RoleRow> {
    Ok(RoleRow {
        role_id: req_i64(row, "role_id")?,
        job_title: req_str(row, "job_title")?,
        salary: req_f64(row, "salary")?,
        department: req_str(row, "department")?,
    })
}

fn employee_from_row(row: &Row) -> Result<EmployeeRow> {
    Ok(EmployeeRow {
        id: req_i64(row, "id")?,
        first_name: req_str(row, "first_name")?,
        last_name: req_str(row, "last_name")?,
        title: opt_str(row, "title"),
        department: opt_str(row, "department"),
        salary: opt_f64(row, "salary"),
        manager: opt_str(row, "manager"),
    })
}

fn req_i64(row: &Row, column: &str) -> Result<i64> {
    row.get(column)
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| OrgError::query_failed(format!("Result row missing integer column {column}")))
}

fn req_f64(row: &Row, column: &str) -> Result<f64> {
    row.get(column)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| OrgError::query_failed(format!("Result row missing numeric column {column}")))
}

fn req_str(row: &Row, column: &str) -> Result<String> {
    row.get(column)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OrgError::query_failed(format!("Result row missing text column {column}")))
}

fn opt_str(row: &Row, column: &str) -> Option<String> {
    row.get(column).and_then(serde_json::Value::as_str).map(str::to_string)
}

fn opt_f64(row: &Row, column: &str) -> Option<f64> {
    row.get(column).and_then(serde_json::Value::as_f64)
}
