//! The full data set held by the ledger.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Advance, Attendance, CompanyInfo, Department, Employee, SalaryDeduction, Task, WorkLog,
};
use crate::payroll::PayrollRecords;

/// Every collection the ledger stores, plus the company details.
///
/// This is also the export/import format and the on-disk format of the
/// JSON file backend. Missing collections deserialize as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Employees, including soft-deleted ones.
    pub employees: Vec<Employee>,
    /// Departments.
    pub departments: Vec<Department>,
    /// Tasks.
    pub tasks: Vec<Task>,
    /// Work logs.
    pub work_logs: Vec<WorkLog>,
    /// Attendance records.
    pub attendance: Vec<Attendance>,
    /// Salary advances.
    pub advances: Vec<Advance>,
    /// Salary deductions.
    pub salary_deductions: Vec<SalaryDeduction>,
    /// Company details shown on reports.
    pub company_info: CompanyInfo,
}

impl Snapshot {
    /// An empty snapshot carrying the given company details.
    pub fn with_company(company_info: CompanyInfo) -> Self {
        Self {
            company_info,
            ..Default::default()
        }
    }

    /// Replaces the collections present in an imported document.
    ///
    /// The document is parsed and merged into a copy, and the copy must pass
    /// [`Snapshot::validate`] before it replaces this snapshot. A malformed
    /// or invalid document leaves the snapshot as it was.
    pub fn import_json(&mut self, json: &str) -> LedgerResult<()> {
        let incoming: SnapshotImport = serde_json::from_str(json).map_err(import_error)?;
        let mut merged = self.clone();
        incoming.apply(&mut merged);
        merged.validate().map_err(import_error)?;
        *self = merged;
        Ok(())
    }

    /// Checks every record's own fields and every cross-reference.
    ///
    /// Child records must name a known employee, work logs a known task, and
    /// a deduction's advance must exist and belong to the same employee.
    pub fn validate(&self) -> LedgerResult<()> {
        self.company_info.validate()?;

        let employee_ids: HashSet<&str> = self.employees.iter().map(|e| e.id.as_str()).collect();
        let task_ids: HashSet<&str> = self.tasks.iter().map(|t| t.id.as_str()).collect();
        let advance_owners: HashMap<&str, &str> = self
            .advances
            .iter()
            .map(|a| (a.id.as_str(), a.employee_id.as_str()))
            .collect();

        let known_employee = |entity: &'static str, id: &str, employee_id: &str| {
            if employee_ids.contains(employee_id) {
                Ok(())
            } else {
                Err(LedgerError::invalid(
                    entity,
                    "employee_id",
                    format!("record '{}' references unknown employee '{}'", id, employee_id),
                ))
            }
        };

        for employee in &self.employees {
            in_record(&employee.id, employee.validate())?;
        }
        for department in &self.departments {
            in_record(&department.id, department.validate())?;
        }
        for task in &self.tasks {
            in_record(&task.id, task.validate())?;
            known_employee("task", &task.id, &task.employee_id)?;
        }
        for log in &self.work_logs {
            in_record(&log.id, log.validate())?;
            known_employee("work_log", &log.id, &log.employee_id)?;
            if let Some(task_id) = &log.task_id {
                if !task_ids.contains(task_id.as_str()) {
                    return Err(LedgerError::invalid(
                        "work_log",
                        "task_id",
                        format!("record '{}' references unknown task '{}'", log.id, task_id),
                    ));
                }
            }
        }
        for record in &self.attendance {
            in_record(&record.id, record.validate())?;
            known_employee("attendance", &record.id, &record.employee_id)?;
        }
        for advance in &self.advances {
            in_record(&advance.id, advance.validate())?;
            known_employee("advance", &advance.id, &advance.employee_id)?;
        }
        for deduction in &self.salary_deductions {
            in_record(&deduction.id, deduction.validate())?;
            known_employee("deduction", &deduction.id, &deduction.employee_id)?;
            if let Some(advance_id) = &deduction.advance_id {
                match advance_owners.get(advance_id.as_str()) {
                    Some(owner) if *owner == deduction.employee_id => {}
                    Some(owner) => {
                        return Err(LedgerError::invalid(
                            "deduction",
                            "advance_id",
                            format!(
                                "record '{}' settles advance '{}' of employee '{}'",
                                deduction.id, advance_id, owner
                            ),
                        ));
                    }
                    None => {
                        return Err(LedgerError::invalid(
                            "deduction",
                            "advance_id",
                            format!(
                                "record '{}' references unknown advance '{}'",
                                deduction.id, advance_id
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn import_error(e: impl fmt::Display) -> LedgerError {
    LedgerError::ImportError {
        message: e.to_string(),
    }
}

/// Names the offending record in a field validation error.
fn in_record(id: &str, result: LedgerResult<()>) -> LedgerResult<()> {
    result.map_err(|e| match e {
        LedgerError::InvalidRecord {
            entity,
            field,
            message,
        } => LedgerError::InvalidRecord {
            entity,
            field,
            message: format!("{} (record '{}')", message, id),
        },
        other => other,
    })
}

impl PayrollRecords for Snapshot {
    fn employees(&self) -> &[Employee] {
        &self.employees
    }

    fn work_logs(&self) -> &[WorkLog] {
        &self.work_logs
    }

    fn advances(&self) -> &[Advance] {
        &self.advances
    }

    fn salary_deductions(&self) -> &[SalaryDeduction] {
        &self.salary_deductions
    }
}

/// An import document. Absent collections are kept as they are.
#[derive(Debug, Default, Deserialize)]
struct SnapshotImport {
    employees: Option<Vec<Employee>>,
    departments: Option<Vec<Department>>,
    tasks: Option<Vec<Task>>,
    work_logs: Option<Vec<WorkLog>>,
    attendance: Option<Vec<Attendance>>,
    advances: Option<Vec<Advance>>,
    salary_deductions: Option<Vec<SalaryDeduction>>,
    company_info: Option<CompanyInfo>,
}

impl SnapshotImport {
    fn apply(self, snapshot: &mut Snapshot) {
        if let Some(employees) = self.employees {
            snapshot.employees = employees;
        }
        if let Some(departments) = self.departments {
            snapshot.departments = departments;
        }
        if let Some(tasks) = self.tasks {
            snapshot.tasks = tasks;
        }
        if let Some(work_logs) = self.work_logs {
            snapshot.work_logs = work_logs;
        }
        if let Some(attendance) = self.attendance {
            snapshot.attendance = attendance;
        }
        if let Some(advances) = self.advances {
            snapshot.advances = advances;
        }
        if let Some(salary_deductions) = self.salary_deductions {
            snapshot.salary_deductions = salary_deductions;
        }
        if let Some(company_info) = self.company_info {
            snapshot.company_info = company_info;
        }
    }
}
