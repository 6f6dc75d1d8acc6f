//! Employee repository.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{
    CreateEmployeeRequest, Deleted, Employee, EmployeeStatus, Envelope, UpdateEmployeeRequest,
};
use crate::store::schema::{self, employee};
use crate::store::{Condition, ConditionGroup, FetchQuery, RecordClient, RecordStore};

/// Fields a free-text search looks at.
const SEARCH_FIELDS: [&str; 5] = [
    employee::FIRST_NAME,
    employee::LAST_NAME,
    employee::EMAIL,
    employee::ROLE,
    employee::DEPARTMENT,
];

pub struct EmployeeRepository {
    client: RecordClient<Employee>,
}

impl EmployeeRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            client: RecordClient::new(store),
        }
    }

    /// List all employees.
    pub async fn get_all(&self) -> Envelope<Vec<Employee>> {
        self.client.list(FetchQuery::new()).await
    }

    /// Get an employee by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Envelope<Employee>, AppError> {
        self.client.get_by_id(id).await
    }

    /// Employees whose department name equals `department`.
    pub async fn get_by_department(&self, department: &str) -> Envelope<Vec<Employee>> {
        let query =
            FetchQuery::new().with_condition(Condition::equal_to(employee::DEPARTMENT, department));
        self.client.list(query).await
    }

    /// Create a new employee.
    pub async fn create(
        &self,
        request: &CreateEmployeeRequest,
    ) -> Result<Envelope<Employee>, AppError> {
        request.validate()?;
        let envelope = self
            .client
            .create(schema::employee_create_record(request))
            .await?;
        tracing::info!(
            "Created employee {} ({})",
            envelope.data.id,
            envelope.data.full_name()
        );
        Ok(envelope)
    }

    /// Update an employee; only the supplied fields change.
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateEmployeeRequest,
    ) -> Result<Envelope<Employee>, AppError> {
        request.validate()?;
        self.client
            .update(id, schema::employee_update_record(request))
            .await
    }

    /// Delete an employee.
    pub async fn delete(&self, id: i64) -> Result<Envelope<Deleted>, AppError> {
        let envelope = self.client.delete(&[id]).await?;
        tracing::info!("Deleted employee {}", id);
        Ok(envelope.map(|_| Deleted { id }))
    }

    /// Case-insensitive substring search over name, email, role and department.
    /// A blank query matches everyone.
    pub async fn search(&self, query: &str) -> Envelope<Vec<Employee>> {
        let term = query.trim();
        if term.is_empty() {
            return self.get_all().await;
        }

        let any_field = SEARCH_FIELDS
            .iter()
            .map(|field| Condition::contains(field, term))
            .collect();
        self.client
            .list(FetchQuery::new().with_group(ConditionGroup::any(any_field)))
            .await
    }

    /// Employees with exactly this status.
    pub async fn filter_by_status(&self, status: EmployeeStatus) -> Envelope<Vec<Employee>> {
        let query =
            FetchQuery::new().with_condition(Condition::equal_to(employee::STATUS, status.as_str()));
        self.client.list(query).await
    }
}
