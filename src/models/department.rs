//! Department model and request bodies.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Employee;

/// A department. `employee_count` is derived from the employee collection on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
    /// Free-text label for the department head
    pub head: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub employee_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<serde_json::Value>,
}

/// A department together with its members.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentDetail {
    pub department: Department,
    pub employees: Vec<Employee>,
}

/// Request body for creating a new department.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub head: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub owner: Option<serde_json::Value>,
}

impl CreateDepartmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(
                "Department name is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request body for updating an existing department.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub owner: Option<serde_json::Value>,
}

impl UpdateDepartmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(AppError::Validation(
                "Department name is required".to_string(),
            ));
        }
        Ok(())
    }
}
