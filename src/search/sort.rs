//! Stable, case-insensitive ordering of employee lists by a named column.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Employee;

/// Column an employee list can be ordered by.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    FirstName,
    #[default]
    LastName,
    Email,
    Phone,
    Role,
    Department,
    Status,
    StartDate,
    Manager,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Comparison key; missing values sort as the empty string.
fn sort_key(employee: &Employee, field: SortField) -> String {
    let value = match field {
        SortField::FirstName => employee.first_name.clone(),
        SortField::LastName => employee.last_name.clone(),
        SortField::Email => employee.email.clone(),
        SortField::Phone => employee.phone.clone().unwrap_or_default(),
        SortField::Role => employee.role.clone(),
        SortField::Department => employee.department.clone(),
        SortField::Status => employee.status.as_str().to_string(),
        SortField::StartDate => employee
            .start_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        SortField::Manager => employee.manager.clone().unwrap_or_default(),
    };
    value.to_lowercase()
}

/// Return a sorted copy. Ties keep their input order in both directions.
pub fn sort(employees: &[Employee], field: SortField, direction: SortDirection) -> Vec<Employee> {
    let mut keyed: Vec<(String, &Employee)> =
        employees.iter().map(|e| (sort_key(e, field), e)).collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering: Ordering = a.cmp(b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, e)| e.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeStatus;
    use chrono::NaiveDate;

    fn employee(id: i64, last: &str, role: &str) -> Employee {
        Employee {
            id,
            first_name: format!("F{}", id),
            last_name: last.to_string(),
            email: format!("e{}@corp.io", id),
            phone: None,
            role: role.to_string(),
            department: "Eng".to_string(),
            start_date: None,
            photo_url: None,
            status: EmployeeStatus::Active,
            manager: None,
            tags: None,
            owner: None,
        }
    }

    fn ids(employees: &[Employee]) -> Vec<i64> {
        employees.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let input = vec![employee(1, "lee", "x"), employee(2, "Adams", "x"), employee(3, "Baker", "x")];
        assert_eq!(ids(&sort(&input, SortField::LastName, SortDirection::Asc)), vec![2, 3, 1]);
    }

    #[test]
    fn test_descending_is_reverse_without_ties() {
        let input = vec![employee(1, "Cole", "x"), employee(2, "adams", "x"), employee(3, "Baker", "x")];
        let mut ascending = ids(&sort(&input, SortField::LastName, SortDirection::Asc));
        let descending = ids(&sort(&input, SortField::LastName, SortDirection::Desc));
        ascending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_ties_keep_input_order_in_both_directions() {
        let input = vec![
            employee(1, "A", "Dev"),
            employee(2, "B", "Ops"),
            employee(3, "C", "dev"),
            employee(4, "D", "Ops"),
        ];
        assert_eq!(ids(&sort(&input, SortField::Role, SortDirection::Asc)), vec![1, 3, 2, 4]);
        assert_eq!(ids(&sort(&input, SortField::Role, SortDirection::Desc)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_resorting_sorted_list_is_identity() {
        let input = vec![
            employee(1, "Ng", "Ops"),
            employee(2, "Lee", "Dev"),
            employee(3, "Lee", "Ops"),
        ];
        let once = sort(&input, SortField::LastName, SortDirection::Desc);
        let twice = sort(&once, SortField::LastName, SortDirection::Desc);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_values_sort_first_ascending() {
        let mut with_phone = employee(1, "A", "x");
        with_phone.phone = Some("555-0100".to_string());
        let mut early = employee(2, "B", "x");
        early.start_date = NaiveDate::from_ymd_opt(2019, 12, 31);
        let mut late = employee(3, "C", "x");
        late.start_date = NaiveDate::from_ymd_opt(2020, 1, 2);

        let input = vec![with_phone, early, late];
        assert_eq!(ids(&sort(&input, SortField::Phone, SortDirection::Asc)), vec![2, 3, 1]);
        assert_eq!(ids(&sort(&input, SortField::StartDate, SortDirection::Asc)), vec![1, 2, 3]);
    }

    #[test]
    fn test_field_names_parse_from_camel_case() {
        let field: SortField = serde_json::from_str("\"startDate\"").unwrap();
        assert_eq!(field, SortField::StartDate);
    }
}
