//! Terminal Table Output
//!
//! This module owns the presentation contract for read operations: each row
//! shape renders as a width-aligned plain-text table with a fixed column
//! set. Joined NULLs (an employee with no manager) render as empty cells.
//!
//! Rendering returns plain strings; styling (bold headers) is applied only
//! at print time so the rendered text stays assertable.

use console::{measure_text_width, style};

use crate::directory::{DepartmentRow, EmployeeRow, RoleRow};

/// Gap between columns
const COLUMN_GAP: &str = "  ";

/// A width-aligned text table
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column headers
    pub fn new(headers: &[&str]) -> Self {
        Self { headers: headers.iter().map(|h| (*h).to_string()).collect(), rows: Vec::new() }
    }

    /// Append one row; short rows are padded with empty cells
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    /// Whether the table has any data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as plain text: header line, dash rule, data rows
    #[must_use]
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        out.push_str(&render_line(&self.headers, &widths));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&render_line(&rule, &widths));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&render_line(row, &widths));
        }
        out
    }

    /// Print the table to stdout with a styled header line
    pub fn print(&self) {
        let rendered = self.render();
        let mut lines = rendered.lines();
        if let Some(header) = lines.next() {
            println!("{}", style(header).bold());
        }
        for line in lines {
            println!("{line}");
        }
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(measure_text_width(cell));
            }
        }
        widths
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join(COLUMN_GAP).trim_end().to_string()
}

/// Salaries render with two decimal places everywhere
#[must_use]
pub fn format_salary(salary: f64) -> String {
    format!("{salary:.2}")
}

/// Department listing: `id`, `name`
#[must_use]
pub fn departments_table(departments: &[DepartmentRow]) -> Table {
    let mut table = Table::new(&["id", "name"]);
    for department in departments {
        table.push_row(vec![department.id.to_string(), department.name.clone()]);
    }
    table
}

/// Role listing: `role_id`, `job_title`, `salary`, `department`
#[must_use]
pub fn roles_table(roles: &[RoleRow]) -> Table {
    let mut table = Table::new(&["role_id", "job_title", "salary", "department"]);
    for role in roles {
        table.push_row(vec![
            role.role_id.to_string(),
            role.job_title.clone(),
            format_salary(role.salary),
            role.department.clone(),
        ]);
    }
    table
}

/// Employee listing: `id`, `first_name`, `last_name`, `title`, `department`,
/// `salary`, `manager`
#[must_use]
pub fn employees_table(employees: &[EmployeeRow]) -> Table {
    let mut table = Table::new(&[
        "id",
        "first_name",
        "last_name",
        "title",
        "department",
        "salary",
        "manager",
    ]);
    for employee in employees {
        table.push_row(vec![
            employee.id.to_string(),
            employee.first_name.clone(),
            employee.last_name.clone(),
            employee.title.clone().unwrap_or_default(),
            employee.department.clone().unwrap_or_default(),
            employee.salary.map(format_salary).unwrap_or_default(),
            employee.manager.clone().unwrap_or_default(),
        ]);
    }
    table
}

/// One-line budget summary for a department
#[must_use]
pub fn budget_line(department_name: &str, total: f64) -> String {
    format!("Total utilized budget for {department_name}: {}", format_salary(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(&["id", "name"]);
        table.push_row(vec!["1".to_string(), "Sales".to_string()]);
        table.push_row(vec!["2".to_string(), "Engineering".to_string()]);

        let expected = "\
id  name
--  -----------
1   Sales
2   Engineering";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_employees_table_renders_null_manager_empty() {
        let employees = vec![crate::directory::EmployeeRow {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            title: Some("Engineer".to_string()),
            department: Some("Engineering".to_string()),
            salary: Some(90000.0),
            manager: None,
        }];

        let rendered = employees_table(&employees).render();
        let last_line = rendered.lines().last().unwrap();
        assert!(last_line.contains("Ada"));
        assert!(last_line.contains("90000.00"));
        // No manager cell content; trailing padding is trimmed
        assert!(last_line.trim_end().ends_with("90000.00"));
    }

    #[test]
    fn test_roles_table_columns() {
        let roles = vec![crate::directory::RoleRow {
            role_id: 3,
            job_title: "Engineer".to_string(),
            salary: 90000.0,
            department: "Engineering".to_string(),
        }];

        let rendered = roles_table(&roles).render();
        assert!(rendered.starts_with("role_id  job_title  salary    department"));
        assert!(rendered.contains("Engineer"));
    }

    #[test]
    fn test_empty_table() {
        let table = departments_table(&[]);
        assert!(table.is_empty());
        assert_eq!(table.render(), "id  name\n--  ----");
    }

    #[test]
    fn test_budget_line() {
        assert_eq!(
            budget_line("Engineering", 90000.0),
            "Total utilized budget for Engineering: 90000.00"
        );
    }
}
