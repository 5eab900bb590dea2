//! Name Resolution
//!
//! Everywhere a human refers to an employee it is by display name
//! (`"first last"`) and everywhere a role is referenced it is by title.
//! This module is the single place those strings become surrogate ids.
//!
//! # Resolution Rule
//! A display name splits on the *first* space into `(first, rest)`; `rest`
//! is the full last-name remainder. Callers normalize multi-word last names
//! with a non-space separator (a hyphen) before they get here; no
//! normalization happens in this layer.
//!
//! # Cardinality Policy
//! Resolution requires exactly one match. Zero or many matches fail closed
//! with [`OrgError::ResolutionFailure`] carrying the match count; nothing is
//! ever picked silently. Employee resolution comes in a role-qualified and
//! an unqualified form and the caller chooses which policy it wants.

use crate::error::{OrgError, Result};
use crate::executor::{QueryExecutor, SqlValue};

use super::OrgDirectory;

/// Split a display name on its first space into `(first, last)`
///
/// Both parts must be non-empty; `last` is the whole remainder, so a
/// hyphenated last name survives the round trip.
pub fn split_display_name(display: &str) -> Result<(String, String)> {
    match display.split_once(' ') {
        Some((first, last)) if !first.is_empty() && !last.is_empty() => {
            Ok((first.to_string(), last.to_string()))
        }
        _ => Err(OrgError::invalid_input(format!(
            "Display name \"{display}\" must be two non-empty tokens separated by a space"
        ))),
    }
}

/// Reject a name component that would not round-trip through a display name
///
/// First and last names must not contain the separator character; a
/// multi-word name is expected to arrive hyphenated.
pub fn ensure_name_token(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(OrgError::invalid_input("Name component cannot be blank"));
    }
    if name.contains(' ') {
        return Err(OrgError::invalid_input(format!(
            "Name component \"{name}\" must not contain spaces; use a hyphen instead"
        )));
    }
    Ok(())
}

impl<E: QueryExecutor> OrgDirectory<E> {
    /// Resolve an employee display name to its surrogate id
    ///
    /// With `role_title` the lookup is additionally qualified by the
    /// employee's role, disambiguating shared names. Without it, an
    /// ambiguous name is a [`OrgError::ResolutionFailure`].
    pub async fn resolve_employee(
        &self,
        display_name: &str,
        role_title: Option<&str>,
    ) -> Result<i64> {
        let (first, last) = split_display_name(display_name)?;
        let candidates = self.employee_candidates(&first, &last, role_title).await?;

        match candidates.len() {
            1 => Ok(candidates[0]),
            n => Err(OrgError::resolution("employee", display_name, n)),
        }
    }

    /// Resolve a role title to its surrogate id
    ///
    /// Titles are not globally unique in the schema; this operation assumes
    /// uniqueness within the calling context and fails closed otherwise.
    pub async fn resolve_role(&self, title: &str) -> Result<i64> {
        let outcome = self
            .executor
            .execute("SELECT id FROM role WHERE title = ?1 ORDER BY id", &[SqlValue::from(title)])
            .await?;
        let ids = collect_ids(&outcome.rows)?;

        match ids.len() {
            1 => Ok(ids[0]),
            n => Err(OrgError::resolution("role", title, n)),
        }
    }

    /// Ids of every employee matching the name, optionally role-qualified
    ///
    /// Cardinality is the caller's decision: the by-manager listing treats
    /// zero matches as an empty result while the mutations require exactly
    /// one.
    pub(super) async fn employee_candidates(
        &self,
        first_name: &str,
        last_name: &str,
        role_title: Option<&str>,
    ) -> Result<Vec<i64>> {
        let outcome = match role_title {
            Some(title) => {
                self.executor
                    .execute(
                        "SELECT employee.id FROM employee
                         JOIN role ON employee.role_id = role.id
                         WHERE employee.first_name = ?1
                           AND employee.last_name = ?2
                           AND role.title = ?3
                         ORDER BY employee.id",
                        &[
                            SqlValue::from(first_name),
                            SqlValue::from(last_name),
                            SqlValue::from(title),
                        ],
                    )
                    .await?
            }
            None => {
                self.executor
                    .execute(
                        "SELECT id FROM employee
                         WHERE first_name = ?1 AND last_name = ?2
                         ORDER BY id",
                        &[SqlValue::from(first_name), SqlValue::from(last_name)],
                    )
                    .await?
            }
        };

        collect_ids(&outcome.rows)
    }
}

fn collect_ids(rows: &[crate::executor::Row]) -> Result<Vec<i64>> {
    rows.iter()
        .map(|row| {
            row.get("id")
                .and_then(serde_json::Value::as_i64)
                .ok_or_else(|| OrgError::query_failed("Resolution row missing id column"))
        })
        .collect()
}
