//! Employee model and related types.
//!
//! This module defines the Employee record, its salary and employment
//! enums, and the create/patch forms used by the record store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{require_non_negative, require_text};
use crate::error::LedgerResult;

const ENTITY: &str = "employee";

/// How an employee's base pay is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryType {
    /// Paid `salary_rate` per logged hour.
    Hourly,
    /// Paid a flat `salary_rate` per month.
    Monthly,
}

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Full-time employment.
    FullTime,
    /// Part-time employment.
    PartTime,
    /// Fixed-term or per-job contract.
    Contractual,
}

/// Lifecycle state of an employee record.
///
/// Employees are never removed once created; deleting one flips it to
/// `Inactive` so that logs, advances and deductions keep resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// On the roster and included in payroll.
    #[default]
    Active,
    /// Soft-deleted.
    Inactive,
}

/// Represents an employee on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Department name (e.g., "Printing", "Binding").
    pub department: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
    /// The date the employee joined.
    pub joining_date: NaiveDate,
    /// The type of employment arrangement.
    pub employment_type: EmploymentType,
    /// Whether pay is hourly or monthly.
    pub salary_type: SalaryType,
    /// Currency units per hour or per month, depending on `salary_type`.
    pub salary_rate: Decimal,
    /// Lifecycle state.
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee has not been soft-deleted.
    ///
    /// # Examples
    ///
    /// ```
    /// use press_ledger::models::{Employee, EmployeeStatus, EmploymentType, SalaryType};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "John Smith".to_string(),
    ///     department: "Printing".to_string(),
    ///     position: "Senior Printer".to_string(),
    ///     phone: String::new(),
    ///     email: String::new(),
    ///     joining_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
    ///     employment_type: EmploymentType::FullTime,
    ///     salary_type: SalaryType::Monthly,
    ///     salary_rate: Decimal::new(3200, 0),
    ///     status: EmployeeStatus::Active,
    /// };
    /// assert!(employee.is_active());
    ///
    /// employee.status = EmployeeStatus::Inactive;
    /// assert!(!employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Returns true if the employee is paid per logged hour.
    pub fn is_hourly(&self) -> bool {
        self.salary_type == SalaryType::Hourly
    }

    /// Checks the stored fields: name and department present, rate not
    /// negative.
    pub fn validate(&self) -> LedgerResult<()> {
        require_text(ENTITY, "name", &self.name)?;
        require_text(ENTITY, "department", &self.department)?;
        require_non_negative(ENTITY, "salary_rate", self.salary_rate)
    }
}

/// Form for adding an employee. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewEmployee {
    /// Full name.
    pub name: String,
    /// Department name.
    pub department: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
    /// The date the employee joined.
    pub joining_date: NaiveDate,
    /// The type of employment arrangement.
    pub employment_type: EmploymentType,
    /// Whether pay is hourly or monthly.
    pub salary_type: SalaryType,
    /// Rate per hour or per month.
    pub salary_rate: Decimal,
    /// Initial lifecycle state, `Active` unless given.
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl NewEmployee {
    /// Validates the form and turns it into a record with the given id.
    pub fn into_employee(self, id: String) -> LedgerResult<Employee> {
        let employee = Employee {
            id,
            name: self.name,
            department: self.department,
            position: self.position,
            phone: self.phone,
            email: self.email,
            joining_date: self.joining_date,
            employment_type: self.employment_type,
            salary_type: self.salary_type,
            salary_rate: self.salary_rate,
            status: self.status,
        };
        employee.validate()?;
        Ok(employee)
    }
}

/// The mutable fields of an employee. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeePatch {
    /// New name.
    pub name: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New job title.
    pub position: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// Corrected joining date.
    pub joining_date: Option<NaiveDate>,
    /// New employment type.
    pub employment_type: Option<EmploymentType>,
    /// New salary type.
    pub salary_type: Option<SalaryType>,
    /// New salary rate.
    pub salary_rate: Option<Decimal>,
    /// New lifecycle state (used to reactivate).
    pub status: Option<EmployeeStatus>,
}

impl EmployeePatch {
    /// Applies the patch, validating each supplied field first.
    ///
    /// Nothing is written if any field is invalid.
    pub fn apply(self, employee: &mut Employee) -> LedgerResult<()> {
        if let Some(name) = &self.name {
            require_text(ENTITY, "name", name)?;
        }
        if let Some(department) = &self.department {
            require_text(ENTITY, "department", department)?;
        }
        if let Some(rate) = self.salary_rate {
            require_non_negative(ENTITY, "salary_rate", rate)?;
        }

        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(department) = self.department {
            employee.department = department;
        }
        if let Some(position) = self.position {
            employee.position = position;
        }
        if let Some(phone) = self.phone {
            employee.phone = phone;
        }
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(joining_date) = self.joining_date {
            employee.joining_date = joining_date;
        }
        if let Some(employment_type) = self.employment_type {
            employee.employment_type = employment_type;
        }
        if let Some(salary_type) = self.salary_type {
            employee.salary_type = salary_type;
        }
        if let Some(salary_rate) = self.salary_rate {
            employee.salary_rate = salary_rate;
        }
        if let Some(status) = self.status {
            employee.status = status;
        }
        Ok(())
    }
}
