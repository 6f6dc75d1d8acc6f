//! Employee API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{parse_id, success, ApiResult};
use crate::errors::AppError;
use crate::export;
use crate::models::{
    CreateEmployeeRequest, Deleted, Employee, EmployeeStatus, Notice, UpdateEmployeeRequest,
};
use crate::search::sort::{self, SortDirection, SortField};
use crate::search::{self, EmployeeFilter};
use crate::AppState;

/// Query parameters shared by the list and export endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeListQuery {
    /// Free-text search term
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub status: String,
    /// Column to order by; store order when absent
    #[serde(default)]
    pub sort: Option<SortField>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl EmployeeListQuery {
    /// Filter, then order, a loaded employee list.
    fn apply(&self, employees: &[Employee]) -> Vec<Employee> {
        let filters = EmployeeFilter {
            department: self.department.clone(),
            status: self.status.clone(),
        };
        let visible = search::filter(employees, &self.q, &filters);
        match self.sort {
            Some(field) => sort::sort(&visible, field, self.direction),
            None => visible,
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/employees - List employees, filtered and sorted in memory.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<EmployeeListQuery>,
) -> ApiResult<Vec<Employee>> {
    let envelope = state.employees.get_all().await;
    let total = envelope.data.len();

    let mut visible = envelope.map(|all| params.apply(&all));
    if visible.data.is_empty() && total > 0 {
        visible.notify(Notice::info("No employees match the current filters"));
    }

    success(visible)
}

/// GET /api/employees/export - Download the filtered list as CSV.
pub async fn export_employees(
    State(state): State<AppState>,
    Query(params): Query<EmployeeListQuery>,
) -> Response {
    let envelope = state.employees.get_all().await;
    if !envelope.notices.is_empty() {
        tracing::warn!("Exporting employees after a failed load");
    }

    let csv = export::to_csv(&params.apply(&envelope.data));
    let disposition = format!("attachment; filename=\"{}\"", export::FILE_NAME);

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response()
}

/// GET /api/employees/search - Store-side search across name, email, role and department.
pub async fn search_employees(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Vec<Employee>> {
    success(state.employees.search(&params.q).await)
}

/// GET /api/employees/status/:status - Employees with one status.
pub async fn employees_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Vec<Employee>> {
    let status = EmployeeStatus::parse(&status)
        .ok_or_else(|| AppError::Validation(format!("Unknown employee status: {}", status)))?;

    success(state.employees.filter_by_status(status).await)
}

/// GET /api/employees/department/:name - Employees of one department, matched exactly.
pub async fn employees_by_department(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> ApiResult<Vec<Employee>> {
    success(state.employees.get_by_department(&department).await)
}

/// GET /api/employees/:id - Get a single employee.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    let id = parse_id(&id, "Employee")?;
    success(state.employees.get_by_id(id).await?)
}

/// POST /api/employees - Create a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> ApiResult<Employee> {
    let envelope = state.employees.create(&request).await?;
    success(envelope.with_notice(Notice::success("Employee created successfully")))
}

/// PUT /api/employees/:id - Update an employee.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> ApiResult<Employee> {
    let id = parse_id(&id, "Employee")?;
    let envelope = state.employees.update(id, &request).await?;
    success(envelope.with_notice(Notice::success("Employee updated successfully")))
}

/// DELETE /api/employees/:id - Delete an employee.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let id = parse_id(&id, "Employee")?;
    let envelope = state.employees.delete(id).await?;
    success(envelope.with_notice(Notice::success("Employee has been removed")))
}
