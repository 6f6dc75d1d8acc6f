//! Department API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{parse_id, success, ApiResult};
use crate::models::{
    CreateDepartmentRequest, Deleted, Department, DepartmentDetail, Notice,
    UpdateDepartmentRequest,
};
use crate::AppState;

/// GET /api/departments - List all departments with live employee counts.
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    success(state.departments.get_all().await)
}

/// GET /api/departments/:id - Get a single department.
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Department> {
    let id = parse_id(&id, "Department")?;
    success(state.departments.get_by_id(id).await?)
}

/// GET /api/departments/:id/employees - A department and its members.
pub async fn get_department_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DepartmentDetail> {
    let id = parse_id(&id, "Department")?;
    success(state.departments.detail(id).await?)
}

/// POST /api/departments - Create a new department.
pub async fn create_department(
    State(state): State<AppState>,
    Json(request): Json<CreateDepartmentRequest>,
) -> ApiResult<Department> {
    let envelope = state.departments.create(&request).await?;
    let notice = Notice::success(format!("{} department has been created", envelope.data.name));
    success(envelope.with_notice(notice))
}

/// PUT /api/departments/:id - Update a department.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDepartmentRequest>,
) -> ApiResult<Department> {
    let id = parse_id(&id, "Department")?;
    let envelope = state.departments.update(id, &request).await?;
    success(envelope.with_notice(Notice::success("Department updated successfully")))
}

/// DELETE /api/departments/:id - Delete a department. Its employees are left in place.
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let id = parse_id(&id, "Department")?;
    let envelope = state.departments.delete(id).await?;
    success(envelope.with_notice(Notice::success("Department has been removed")))
}
