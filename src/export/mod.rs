//! CSV export of an employee list.

use crate::models::Employee;

const HEADER: [&str; 9] = [
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Role",
    "Department",
    "Status",
    "Start Date",
    "Manager",
];

/// File name offered to the browser.
pub const FILE_NAME: &str = "employees.csv";

/// Quote a cell only when it contains a delimiter, a quote or a line break.
fn escape_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn row(employee: &Employee) -> String {
    let start_date = employee
        .start_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    [
        employee.first_name.as_str(),
        employee.last_name.as_str(),
        employee.email.as_str(),
        employee.phone.as_deref().unwrap_or(""),
        employee.role.as_str(),
        employee.department.as_str(),
        employee.status.as_str(),
        start_date.as_str(),
        employee.manager.as_deref().unwrap_or(""),
    ]
    .iter()
    .map(|cell| escape_cell(cell))
    .collect::<Vec<_>>()
    .join(",")
}

/// Header line plus one line per employee, joined with `\n`.
pub fn to_csv(employees: &[Employee]) -> String {
    std::iter::once(HEADER.join(","))
        .chain(employees.iter().map(row))
        .collect::<Vec<_>>()
        .join("\n")
}
