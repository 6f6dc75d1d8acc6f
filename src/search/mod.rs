//! In-memory query engine over a loaded employee list.
//!
//! Derives the visible subset without further store calls: free-text search
//! first, then the department and status filters, each narrowing the
//! previous stage.

pub mod sort;

use serde::Deserialize;

use crate::models::Employee;

/// Attribute filters; an empty string means "no constraint".
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EmployeeFilter {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub status: String,
}

/// True when `term` (already lowercased) occurs in any searched field.
fn matches_term(employee: &Employee, term: &str) -> bool {
    [
        &employee.first_name,
        &employee.last_name,
        &employee.email,
        &employee.role,
        &employee.department,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}

/// Narrow `employees` by search term, department and status, preserving order.
/// A blank term matches everyone.
pub fn filter(employees: &[Employee], search_term: &str, filters: &EmployeeFilter) -> Vec<Employee> {
    let term = search_term.trim().to_lowercase();

    employees
        .iter()
        .filter(|e| term.is_empty() || matches_term(e, &term))
        .filter(|e| filters.department.is_empty() || e.department == filters.department)
        .filter(|e| filters.status.is_empty() || e.status.as_str() == filters.status)
        .cloned()
        .collect()
}
