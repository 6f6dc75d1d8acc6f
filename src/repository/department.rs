//! Department repository.
//!
//! `employee_count` is never trusted from the store: every read recomputes it
//! from one fresh employee fetch.

use std::sync::Arc;

use super::EmployeeRepository;
use crate::errors::AppError;
use crate::models::{
    CreateDepartmentRequest, Deleted, Department, DepartmentDetail, Employee, Envelope,
    UpdateDepartmentRequest,
};
use crate::store::schema;
use crate::store::{FetchQuery, RecordClient, RecordStore};

/// Number of employees whose department name equals `name`.
pub fn count_employees(employees: &[Employee], name: &str) -> usize {
    employees.iter().filter(|e| e.department == name).count()
}

fn members(employees: &[Employee], name: &str) -> Vec<Employee> {
    employees
        .iter()
        .filter(|e| e.department == name)
        .cloned()
        .collect()
}

pub struct DepartmentRepository {
    client: RecordClient<Department>,
    employees: Arc<EmployeeRepository>,
}

impl DepartmentRepository {
    pub fn new(store: Arc<dyn RecordStore>, employees: Arc<EmployeeRepository>) -> Self {
        Self {
            client: RecordClient::new(store),
            employees,
        }
    }

    /// List all departments with live employee counts.
    pub async fn get_all(&self) -> Envelope<Vec<Department>> {
        let (mut departments, employees) =
            tokio::join!(self.client.list(FetchQuery::new()), self.employees.get_all());

        for department in &mut departments.data {
            department.employee_count = count_employees(&employees.data, &department.name);
        }
        departments.absorb(employees.notices);
        departments
    }

    /// Get a department by ID with its live employee count.
    pub async fn get_by_id(&self, id: i64) -> Result<Envelope<Department>, AppError> {
        let mut department = self.client.get_by_id(id).await?;
        self.recount(&mut department).await;
        Ok(department)
    }

    /// Create a new department. The count starts at the seeded zero.
    pub async fn create(
        &self,
        request: &CreateDepartmentRequest,
    ) -> Result<Envelope<Department>, AppError> {
        request.validate()?;
        let envelope = self
            .client
            .create(schema::department_create_record(request))
            .await?;
        tracing::info!("Created department {} ({})", envelope.data.id, envelope.data.name);
        Ok(envelope)
    }

    /// Update a department and recount its employees after the write.
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateDepartmentRequest,
    ) -> Result<Envelope<Department>, AppError> {
        request.validate()?;
        let mut department = self
            .client
            .update(id, schema::department_update_record(request))
            .await?;
        self.recount(&mut department).await;
        Ok(department)
    }

    /// Delete a department. Its employees keep their department name.
    pub async fn delete(&self, id: i64) -> Result<Envelope<Deleted>, AppError> {
        let envelope = self.client.delete(&[id]).await?;
        tracing::info!("Deleted department {}", id);
        Ok(envelope.map(|_| Deleted { id }))
    }

    /// A department and its members. The department and the employee list
    /// load concurrently; count and members come from that one list.
    pub async fn detail(&self, id: i64) -> Result<Envelope<DepartmentDetail>, AppError> {
        let (department, employees) =
            tokio::join!(self.client.get_by_id(id), self.employees.get_all());
        let department = department?;

        let staff = members(&employees.data, &department.data.name);
        let mut detail = department.map(|mut department| {
            department.employee_count = staff.len();
            DepartmentDetail {
                department,
                employees: staff,
            }
        });
        detail.absorb(employees.notices);
        Ok(detail)
    }

    async fn recount(&self, department: &mut Envelope<Department>) {
        let employees = self.employees.get_all().await;
        department.data.employee_count = count_employees(&employees.data, &department.data.name);
        department.absorb(employees.notices);
    }
}
