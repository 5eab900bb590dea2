//! Interactive Menu Loop
//!
//! The terminal front end: a menu of directory actions, free-text prompts
//! for new values, and selection lists populated live from the database so
//! the user picks existing departments, roles, and employees instead of
//! retyping them.
//!
//! Operation failures (constraint rejections, resolution failures) are
//! printed to stderr and return the user to the menu; only a broken
//! terminal ends the loop early.

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::directory::OrgDirectory;
use crate::error::{OrgError, Result};
use crate::executor::QueryExecutor;
use crate::output;

/// Selection-list entry for "this employee has no manager"
const NO_MANAGER: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    ViewEmployeesByManager,
    ViewEmployeesByDepartment,
    ViewDepartmentBudget,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
    RemoveDepartment,
    RemoveRole,
    RemoveEmployee,
    Quit,
}

impl MenuAction {
    const ALL: [Self; 15] = [
        Self::ViewDepartments,
        Self::ViewRoles,
        Self::ViewEmployees,
        Self::ViewEmployeesByManager,
        Self::ViewEmployeesByDepartment,
        Self::ViewDepartmentBudget,
        Self::AddDepartment,
        Self::AddRole,
        Self::AddEmployee,
        Self::UpdateEmployeeRole,
        Self::UpdateEmployeeManager,
        Self::RemoveDepartment,
        Self::RemoveRole,
        Self::RemoveEmployee,
        Self::Quit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::ViewDepartments => "View All Departments",
            Self::ViewRoles => "View All Roles",
            Self::ViewEmployees => "View All Employees",
            Self::ViewEmployeesByManager => "View Employees by Manager",
            Self::ViewEmployeesByDepartment => "View Employees by Department",
            Self::ViewDepartmentBudget => "View Department Budget",
            Self::AddDepartment => "Add a Department",
            Self::AddRole => "Add a Role",
            Self::AddEmployee => "Add an Employee",
            Self::UpdateEmployeeRole => "Update an Employee Role",
            Self::UpdateEmployeeManager => "Update an Employee's Manager",
            Self::RemoveDepartment => "Remove a Department",
            Self::RemoveRole => "Remove a Role",
            Self::RemoveEmployee => "Remove an Employee",
            Self::Quit => "Quit",
        }
    }
}

/// Run the menu loop until the user quits
pub async fn run<E: QueryExecutor>(directory: &OrgDirectory<E>) -> Result<()> {
    println!("{}", style("orgctl - employee directory").bold().cyan());

    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;
        let action = MenuAction::ALL[choice];

        if action == MenuAction::Quit {
            return Ok(());
        }

        if let Err(err) = dispatch(directory, action).await {
            // A dead terminal cannot be survived; everything else returns
            // the user to the menu
            if matches!(err, OrgError::PromptFailed(_)) {
                return Err(err);
            }
            eprintln!("{}", style(err.message()).red());
        }
    }
}

async fn dispatch<E: QueryExecutor>(directory: &OrgDirectory<E>, action: MenuAction) -> Result<()> {
    match action {
        MenuAction::ViewDepartments => {
            print_table(output::departments_table(&directory.all_departments().await?));
        }
        MenuAction::ViewRoles => {
            print_table(output::roles_table(&directory.all_roles().await?));
        }
        MenuAction::ViewEmployees => {
            print_table(output::employees_table(&directory.all_employees().await?));
        }
        MenuAction::ViewEmployeesByManager => {
            let Some(manager) = pick_employee(directory, "Select the manager:").await? else {
                return Ok(());
            };
            print_table(output::employees_table(
                &directory.employees_by_manager(&manager).await?,
            ));
        }
        MenuAction::ViewEmployeesByDepartment => {
            let Some(department) =
                pick_department(directory, "Please select the department:").await?
            else {
                return Ok(());
            };
            print_table(output::employees_table(
                &directory.employees_by_department(&department).await?,
            ));
        }
        MenuAction::ViewDepartmentBudget => {
            let Some(department) =
                pick_department(directory, "Please select the department:").await?
            else {
                return Ok(());
            };
            let total = directory.department_budget(&department).await?;
            println!("{}", output::budget_line(&department, total));
        }
        MenuAction::AddDepartment => {
            let name = input_nonblank("Please enter the Department's Name:")?;
            directory.add_department(&name).await?;
            println!("Added department {name}.");
        }
        MenuAction::AddRole => {
            let title = input_nonblank("Please enter the role's Job Title:")?;
            let salary = input_salary("Please enter the role's salary:")?;
            let Some(department) =
                pick_department(directory, "Please select the department the role belongs to:")
                    .await?
            else {
                return Ok(());
            };
            directory.add_role(&title, salary, &department).await?;
            println!("Added role {title} under {department}.");
        }
        MenuAction::AddEmployee => {
            let first = input_name("Please enter the employee's First Name:")?;
            let last = input_name("Please enter the employee's Last Name:")?;
            let Some(role) = pick_role(directory, "Please select the employee's role:").await?
            else {
                return Ok(());
            };
            match pick_manager(directory).await? {
                Some(manager) => {
                    directory.add_employee(&first, &last, &role, &manager).await?;
                }
                None => {
                    directory.add_top_level_employee(&first, &last, &role).await?;
                }
            }
            println!("Added employee {first} {last}.");
        }
        MenuAction::UpdateEmployeeRole => {
            let Some(employee) =
                pick_employee(directory, "Select the employee you wish to update:").await?
            else {
                return Ok(());
            };
            let Some(role) =
                pick_role(directory, "Please select the new role of the employee:").await?
            else {
                return Ok(());
            };
            match pick_manager(directory).await? {
                Some(manager) => {
                    directory.update_employee_role_and_manager(&employee, &role, &manager).await?;
                }
                None => {
                    directory.promote_to_manager_role(&employee, &role).await?;
                }
            }
            println!("Updated {employee}.");
        }
        MenuAction::UpdateEmployeeManager => {
            let Some(employee) =
                pick_employee(directory, "Select the employee you wish to update:").await?
            else {
                return Ok(());
            };
            let Some(employee_role) =
                pick_role(directory, "Select the employee's current job title:").await?
            else {
                return Ok(());
            };
            let Some(manager) = pick_employee(directory, "Select the new manager:").await? else {
                return Ok(());
            };
            let Some(manager_role) =
                pick_role(directory, "Select the new manager's job title:").await?
            else {
                return Ok(());
            };
            directory.reassign_manager(&employee, &employee_role, &manager, &manager_role).await?;
            println!("Updated {employee}'s manager.");
        }
        MenuAction::RemoveDepartment => {
            let Some(department) =
                pick_department(directory, "Please select the department to remove:").await?
            else {
                return Ok(());
            };
            directory.remove_department(&department).await?;
            println!("Removed department {department}.");
        }
        MenuAction::RemoveRole => {
            let Some(role) = pick_role(directory, "Please select the role to remove:").await?
            else {
                return Ok(());
            };
            directory.remove_role(&role).await?;
            println!("Removed role {role}.");
        }
        MenuAction::RemoveEmployee => {
            let Some(employee) =
                pick_employee(directory, "Select the employee you wish to remove:").await?
            else {
                return Ok(());
            };
            let Some(role) = pick_role(directory, "Select the employee's job title:").await?
            else {
                return Ok(());
            };
            directory.remove_employee(&employee, &role).await?;
            println!("Removed {employee}.");
        }
        MenuAction::Quit => unreachable!("Quit is handled by the menu loop"),
    }
    Ok(())
}

fn print_table(table: output::Table) {
    if table.is_empty() {
        println!("Nothing to display.");
    } else {
        table.print();
    }
}

/// Pick a department from the live list; `None` when there are none yet
async fn pick_department<E: QueryExecutor>(
    directory: &OrgDirectory<E>,
    prompt: &str,
) -> Result<Option<String>> {
    let names = directory.list_department_names().await?;
    if names.is_empty() {
        println!("No departments yet. Add a department first.");
        return Ok(None);
    }
    select_from(prompt, &names).map(Some)
}

/// Pick a role title from the live list; `None` when there are none yet
async fn pick_role<E: QueryExecutor>(
    directory: &OrgDirectory<E>,
    prompt: &str,
) -> Result<Option<String>> {
    let titles = directory.list_role_titles().await?;
    if titles.is_empty() {
        println!("No roles yet. Add a role first.");
        return Ok(None);
    }
    select_from(prompt, &titles).map(Some)
}

/// Pick an employee display name from the live list; `None` when empty
async fn pick_employee<E: QueryExecutor>(
    directory: &OrgDirectory<E>,
    prompt: &str,
) -> Result<Option<String>> {
    let names = directory.list_employee_display_names().await?;
    if names.is_empty() {
        println!("No employees yet. Add an employee first.");
        return Ok(None);
    }
    select_from(prompt, &names).map(Some)
}

/// Pick a manager, with a `none` entry for top-of-hierarchy employees
///
/// `None` means the user chose `none`, routing the caller to the
/// no-manager operation.
async fn pick_manager<E: QueryExecutor>(directory: &OrgDirectory<E>) -> Result<Option<String>> {
    let mut choices = vec![NO_MANAGER.to_string()];
    choices.extend(directory.list_employee_display_names().await?);

    let picked = select_from("Please select the employee's manager:", &choices)?;
    if picked == NO_MANAGER {
        Ok(None)
    } else {
        Ok(Some(picked))
    }
}

fn select_from(prompt: &str, items: &[String]) -> Result<String> {
    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(items[idx].clone())
}

fn input_nonblank(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("Field cannot be blank")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// A name component: non-blank and space-free, so display names round-trip
fn input_name(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            let trimmed = input.trim();
            if trimmed.is_empty() {
                Err("Field cannot be blank")
            } else if trimmed.contains(' ') {
                Err("Input should not contain any spaces. If the name contains a space, please use a hyphen '-' instead")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn input_salary(prompt: &str) -> Result<f64> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            match input.trim().parse::<f64>() {
                Ok(v) if v >= 0.0 => Ok(()),
                Ok(_) => Err("Salary must be non-negative"),
                Err(_) => Err("Input must be a valid number"),
            }
        })
        .interact_text()?;
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| OrgError::invalid_input("Salary must be a valid number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_are_unique() {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        let mut deduped = labels.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(labels.len(), deduped.len());
    }

    #[test]
    fn test_quit_is_last_menu_entry() {
        assert_eq!(*MenuAction::ALL.last().unwrap(), MenuAction::Quit);
    }
}
