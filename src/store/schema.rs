//! Normalization boundary between wire records and the internal models.
//!
//! This is the only place that knows the store's field names. Reads map a
//! wire record onto [`Employee`] or [`Department`], defaulting what is
//! missing; writes emit only whitelisted fields.

use chrono::NaiveDate;
use serde_json::Value;

use super::{value_id, value_text, Record, ID_FIELD};
use crate::models::{
    CreateDepartmentRequest, CreateEmployeeRequest, Department, Employee, EmployeeStatus,
    UpdateDepartmentRequest, UpdateEmployeeRequest,
};

pub mod employee {
    pub const TABLE: &str = "employee";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const ROLE: &str = "role";
    pub const DEPARTMENT: &str = "department";
    pub const START_DATE: &str = "start_date";
    pub const PHOTO_URL: &str = "photo_url";
    pub const STATUS: &str = "status";
    pub const MANAGER: &str = "manager";
}

pub mod department {
    pub const TABLE: &str = "department";
    pub const NAME: &str = "Name";
    pub const HEAD: &str = "head";
    pub const EMPLOYEE_COUNT: &str = "employee_count";
    pub const DESCRIPTION: &str = "description";
}

pub const TAGS: &str = "Tags";
pub const OWNER: &str = "Owner";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A record type held in one table of the store.
pub trait Entity: Sized + Send + Sync {
    const TABLE: &'static str;
    /// Human-readable singular name used in messages
    const LABEL: &'static str;

    /// Fields requested on every read.
    fn fields() -> &'static [&'static str];

    /// Map a wire record to the model. `None` when the record has no usable id.
    fn from_record(record: &Record) -> Option<Self>;
}

impl Entity for Employee {
    const TABLE: &'static str = employee::TABLE;
    const LABEL: &'static str = "employee";

    fn fields() -> &'static [&'static str] {
        &[
            ID_FIELD,
            employee::FIRST_NAME,
            employee::LAST_NAME,
            employee::EMAIL,
            employee::PHONE,
            employee::ROLE,
            employee::DEPARTMENT,
            employee::START_DATE,
            employee::PHOTO_URL,
            employee::STATUS,
            employee::MANAGER,
            TAGS,
            OWNER,
        ]
    }

    fn from_record(record: &Record) -> Option<Self> {
        let id = record.get(ID_FIELD).and_then(value_id)?;
        let status = match text(record, employee::STATUS) {
            Some(raw) => EmployeeStatus::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Employee {} has unknown status {:?}, using active", id, raw);
                EmployeeStatus::Active
            }),
            None => EmployeeStatus::Active,
        };

        Some(Employee {
            id,
            first_name: text(record, employee::FIRST_NAME).unwrap_or_default(),
            last_name: text(record, employee::LAST_NAME).unwrap_or_default(),
            email: text(record, employee::EMAIL).unwrap_or_default(),
            phone: text(record, employee::PHONE),
            role: text(record, employee::ROLE).unwrap_or_default(),
            department: text(record, employee::DEPARTMENT).unwrap_or_default(),
            start_date: text(record, employee::START_DATE).and_then(|s| parse_date(&s)),
            photo_url: text(record, employee::PHOTO_URL),
            status,
            manager: text(record, employee::MANAGER),
            tags: text(record, TAGS),
            owner: passthrough(record, OWNER),
        })
    }
}

impl Entity for Department {
    const TABLE: &'static str = department::TABLE;
    const LABEL: &'static str = "department";

    fn fields() -> &'static [&'static str] {
        &[
            ID_FIELD,
            department::NAME,
            department::HEAD,
            department::EMPLOYEE_COUNT,
            department::DESCRIPTION,
            TAGS,
            OWNER,
        ]
    }

    fn from_record(record: &Record) -> Option<Self> {
        let id = record.get(ID_FIELD).and_then(value_id)?;

        Some(Department {
            id,
            name: text(record, department::NAME).unwrap_or_default(),
            head: text(record, department::HEAD).unwrap_or_default(),
            description: text(record, department::DESCRIPTION),
            employee_count: record
                .get(department::EMPLOYEE_COUNT)
                .and_then(value_id)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(0),
            tags: text(record, TAGS),
            owner: passthrough(record, OWNER),
        })
    }
}

/// Whitelisted wire fields for a new employee. Status defaults to active.
pub fn employee_create_record(request: &CreateEmployeeRequest) -> Record {
    let mut record = Record::new();
    put(&mut record, employee::FIRST_NAME, Some(request.first_name.trim()));
    put(&mut record, employee::LAST_NAME, Some(request.last_name.trim()));
    put(&mut record, employee::EMAIL, Some(request.email.trim()));
    put(&mut record, employee::PHONE, request.phone.as_deref());
    put(&mut record, employee::ROLE, Some(request.role.trim()));
    put(&mut record, employee::DEPARTMENT, Some(request.department.trim()));
    put_date(&mut record, request.start_date);
    put(&mut record, employee::PHOTO_URL, request.photo_url.as_deref());
    put(
        &mut record,
        employee::STATUS,
        Some(request.status.unwrap_or_default().as_str()),
    );
    put(&mut record, employee::MANAGER, request.manager.as_deref());
    put(&mut record, TAGS, request.tags.as_deref());
    put_owner(&mut record, request.owner.as_ref());
    record
}

/// Whitelisted wire fields for an employee patch; absent fields are omitted.
pub fn employee_update_record(request: &UpdateEmployeeRequest) -> Record {
    let mut record = Record::new();
    put(&mut record, employee::FIRST_NAME, request.first_name.as_deref().map(str::trim));
    put(&mut record, employee::LAST_NAME, request.last_name.as_deref().map(str::trim));
    put(&mut record, employee::EMAIL, request.email.as_deref().map(str::trim));
    put(&mut record, employee::PHONE, request.phone.as_deref());
    put(&mut record, employee::ROLE, request.role.as_deref().map(str::trim));
    put(
        &mut record,
        employee::DEPARTMENT,
        request.department.as_deref().map(str::trim),
    );
    put_date(&mut record, request.start_date);
    put(&mut record, employee::PHOTO_URL, request.photo_url.as_deref());
    put(&mut record, employee::STATUS, request.status.map(|s| s.as_str()));
    put(&mut record, employee::MANAGER, request.manager.as_deref());
    put(&mut record, TAGS, request.tags.as_deref());
    put_owner(&mut record, request.owner.as_ref());
    record
}

/// Whitelisted wire fields for a new department, seeding the stored count at zero.
pub fn department_create_record(request: &CreateDepartmentRequest) -> Record {
    let mut record = Record::new();
    put(&mut record, department::NAME, Some(request.name.trim()));
    put(&mut record, department::HEAD, Some(request.head.as_str()));
    record.insert(department::EMPLOYEE_COUNT.to_string(), Value::from(0));
    put(&mut record, department::DESCRIPTION, request.description.as_deref());
    put(&mut record, TAGS, request.tags.as_deref());
    put_owner(&mut record, request.owner.as_ref());
    record
}

pub fn department_update_record(request: &UpdateDepartmentRequest) -> Record {
    let mut record = Record::new();
    put(&mut record, department::NAME, request.name.as_deref().map(str::trim));
    put(&mut record, department::HEAD, request.head.as_deref());
    put(&mut record, department::DESCRIPTION, request.description.as_deref());
    put(&mut record, TAGS, request.tags.as_deref());
    put_owner(&mut record, request.owner.as_ref());
    record
}

fn text(record: &Record, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(value_text)
        .filter(|s| !s.is_empty())
}

fn passthrough(record: &Record, field: &str) -> Option<Value> {
    record.get(field).filter(|v| !v.is_null()).cloned()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Stores may hand back a full timestamp; the date is the leading part.
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

fn put(record: &mut Record, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        record.insert(field.to_string(), Value::from(value));
    }
}

fn put_date(record: &mut Record, date: Option<NaiveDate>) {
    if let Some(date) = date {
        record.insert(
            employee::START_DATE.to_string(),
            Value::from(date.format(DATE_FORMAT).to_string()),
        );
    }
}

fn put_owner(record: &mut Record, owner: Option<&Value>) {
    if let Some(owner) = owner.filter(|v| !v.is_null()) {
        record.insert(OWNER.to_string(), owner.clone());
    }
}
