//! Core data models for the press ledger.
//!
//! Every entity comes in three shapes: the stored record, a `New*` form used
//! to create it, and a `*Patch` listing exactly which fields may change
//! afterwards. Patches reject unknown fields.

mod advance;
mod attendance;
mod audit;
mod company;
mod deduction;
mod department;
mod employee;
mod period;
mod task;
mod work_log;

pub use advance::{Advance, AdvancePatch, NewAdvance};
pub use attendance::{Attendance, AttendancePatch, AttendanceStatus, NewAttendance};
pub use audit::AuditStep;
pub use company::{CompanyInfo, CompanyInfoPatch};
pub use deduction::{DeductionPatch, NewDeduction, SalaryDeduction};
pub use department::{Department, DepartmentPatch, NewDepartment};
pub use employee::{
    Employee, EmployeePatch, EmployeeStatus, EmploymentType, NewEmployee, SalaryType,
};
pub use period::PayMonth;
pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
pub use work_log::{LogStatus, NewWorkLog, WorkLog, WorkLogPatch, hours_between};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::{LedgerError, LedgerResult};

/// Distinguishes an absent patch field from an explicit `null`.
///
/// Used with `#[serde(default, deserialize_with = "nullable")]` on
/// `Option<Option<T>>` fields: missing → `None`, `null` → `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn require_text(entity: &'static str, field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::invalid(entity, field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_positive(
    entity: &'static str,
    field: &str,
    value: Decimal,
) -> LedgerResult<()> {
    if value <= Decimal::ZERO {
        return Err(LedgerError::invalid(
            entity,
            field,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    entity: &'static str,
    field: &str,
    value: Decimal,
) -> LedgerResult<()> {
    if value < Decimal::ZERO {
        return Err(LedgerError::invalid(
            entity,
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}
