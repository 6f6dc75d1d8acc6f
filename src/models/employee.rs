//! Employee model and request bodies.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Employment status of an employee.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::OnLeave => "on-leave",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EmployeeStatus::Active),
            "inactive" => Some(EmployeeStatus::Inactive),
            "on-leave" => Some(EmployeeStatus::OnLeave),
            _ => None,
        }
    }
}

/// An employee record as served to the front-end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    /// Name of the department, not its id
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub status: EmployeeStatus,
    /// Free-text label, never resolved to another employee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<serde_json::Value>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Request body for creating a new employee.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub owner: Option<serde_json::Value>,
}

impl CreateEmployeeRequest {
    /// Check the mandatory fields, reporting the first one missing.
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.first_name, "First name")?;
        require(&self.last_name, "Last name")?;
        require(&self.email, "Email")?;
        validate_email(&self.email)?;
        require(&self.role, "Role")?;
        require(&self.department, "Department")?;
        if self.start_date.is_none() {
            return Err(AppError::Validation("Start date is required".to_string()));
        }
        Ok(())
    }
}

/// Request body for updating an existing employee. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub owner: Option<serde_json::Value>,
}

impl UpdateEmployeeRequest {
    /// Mandatory fields may be replaced but not blanked.
    pub fn validate(&self) -> Result<(), AppError> {
        let mandatory = [
            (&self.first_name, "First name"),
            (&self.last_name, "Last name"),
            (&self.email, "Email"),
            (&self.role, "Role"),
            (&self.department, "Department"),
        ];
        for (value, label) in mandatory {
            if let Some(value) = value {
                require(value, label)?;
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

fn require(value: &str, label: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", label)));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    Ok(())
}
