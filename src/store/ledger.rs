//! The local-first ledger: an in-memory snapshot plus a persistence backend.
//!
//! Every mutation updates the snapshot first and then saves it. If the save
//! fails the change stays in memory, the failure is logged, and the caller
//! receives a storage error; the next successful save writes it out.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::backend::{JsonFileStore, MemoryStore, SnapshotStore};
use super::snapshot::Snapshot;
use crate::config::{AppConfig, StorageBackend};
use crate::dashboard::{DashboardSummary, summarize};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Advance, AdvancePatch, Attendance, AttendancePatch, CompanyInfo, CompanyInfoPatch,
    DeductionPatch, Department, DepartmentPatch, Employee, EmployeePatch, EmployeeStatus,
    NewAdvance, NewAttendance, NewDeduction, NewDepartment, NewEmployee, NewTask, NewWorkLog,
    PayMonth, SalaryDeduction, Task, TaskPatch, WorkLog, WorkLogPatch,
};
use crate::payroll::{
    AdvanceCutoff, BalanceBreakdown, SalaryReport, balance_breakdown, build_salary_report,
};

/// A stored record addressable by id.
trait Record {
    const ENTITY: &'static str;
    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty => $entity:literal),* $(,)?) => {
        $(impl Record for $ty {
            const ENTITY: &'static str = $entity;
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_record! {
    Employee => "employee",
    Department => "department",
    Task => "task",
    WorkLog => "work_log",
    Attendance => "attendance",
    Advance => "advance",
    SalaryDeduction => "deduction",
}

fn find<'a, T: Record>(items: &'a [T], id: &str) -> LedgerResult<&'a T> {
    items
        .iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| LedgerError::not_found(T::ENTITY, id))
}

fn find_mut<'a, T: Record>(items: &'a mut [T], id: &str) -> LedgerResult<&'a mut T> {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .ok_or_else(|| LedgerError::not_found(T::ENTITY, id))
}

fn remove<T: Record>(items: &mut Vec<T>, id: &str) -> LedgerResult<T> {
    let index = items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| LedgerError::not_found(T::ENTITY, id))?;
    Ok(items.remove(index))
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn matches_employee(filter: Option<&str>, employee_id: &str) -> bool {
    filter.is_none_or(|id| id == employee_id)
}

/// The press's records and the operations on them.
#[derive(Debug)]
pub struct Ledger {
    snapshot: Snapshot,
    store: Box<dyn SnapshotStore>,
    default_company: CompanyInfo,
    cutoff: AdvanceCutoff,
}

impl Ledger {
    /// Opens a ledger over `store`, loading whatever it holds.
    ///
    /// An empty store starts an empty ledger with `default_company`.
    pub fn open(store: Box<dyn SnapshotStore>, default_company: CompanyInfo) -> LedgerResult<Self> {
        let snapshot = match store.load()? {
            Some(snapshot) => {
                info!(
                    location = %store.location(),
                    employees = snapshot.employees.len(),
                    work_logs = snapshot.work_logs.len(),
                    "Loaded ledger snapshot"
                );
                snapshot
            }
            None => {
                info!(location = %store.location(), "Starting with an empty ledger");
                Snapshot::with_company(default_company.clone())
            }
        };

        Ok(Self {
            snapshot,
            store,
            default_company,
            cutoff: AdvanceCutoff::default(),
        })
    }

    /// An empty ledger that keeps nothing beyond the process.
    pub fn in_memory() -> Self {
        Self {
            snapshot: Snapshot::default(),
            store: Box::new(MemoryStore::new()),
            default_company: CompanyInfo::default(),
            cutoff: AdvanceCutoff::default(),
        }
    }

    /// Opens the ledger described by the application configuration.
    pub fn from_config(config: &AppConfig) -> LedgerResult<Self> {
        let store: Box<dyn SnapshotStore> = match config.storage.backend {
            StorageBackend::Memory => Box::new(MemoryStore::new()),
            StorageBackend::JsonFile => Box::new(JsonFileStore::new(&config.storage.path)),
        };
        Ok(Self::open(store, config.company.clone())?.with_cutoff(config.payroll.advance_cutoff))
    }

    /// Sets the advance cutoff rule used for balances and reports.
    pub fn with_cutoff(mut self, cutoff: AdvanceCutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// The advance cutoff rule in use.
    pub fn cutoff(&self) -> AdvanceCutoff {
        self.cutoff
    }

    /// Read access to every collection.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn persist(&self, action: &str) -> LedgerResult<()> {
        self.store.save(&self.snapshot).map_err(|e| {
            warn!(
                action,
                location = %self.store.location(),
                error = %e,
                "Failed to persist ledger; change kept in memory"
            );
            e
        })
    }

    fn require_employee(&self, entity: &'static str, employee_id: &str) -> LedgerResult<()> {
        if self.snapshot.employees.iter().any(|e| e.id == employee_id) {
            Ok(())
        } else {
            Err(LedgerError::invalid(
                entity,
                "employee_id",
                format!("unknown employee '{}'", employee_id),
            ))
        }
    }

    fn require_task(&self, entity: &'static str, task_id: Option<&str>) -> LedgerResult<()> {
        match task_id {
            Some(id) if !self.snapshot.tasks.iter().any(|t| t.id == id) => Err(
                LedgerError::invalid(entity, "task_id", format!("unknown task '{}'", id)),
            ),
            _ => Ok(()),
        }
    }

    // --- Employees ---

    /// Employees, optionally only the active ones.
    pub fn employees(&self, active_only: bool) -> impl Iterator<Item = &Employee> {
        self.snapshot
            .employees
            .iter()
            .filter(move |e| !active_only || e.is_active())
    }

    /// Looks up an employee, active or not.
    pub fn employee(&self, id: &str) -> LedgerResult<&Employee> {
        find(&self.snapshot.employees, id)
    }

    /// Adds an employee.
    pub fn add_employee(&mut self, form: NewEmployee) -> LedgerResult<Employee> {
        let employee = form.into_employee(new_id())?;
        self.snapshot.employees.push(employee.clone());
        info!(employee_id = %employee.id, name = %employee.name, "Employee added");
        self.persist("add_employee")?;
        Ok(employee)
    }

    /// Updates an employee's mutable fields.
    pub fn update_employee(&mut self, id: &str, patch: EmployeePatch) -> LedgerResult<Employee> {
        let employee = find_mut(&mut self.snapshot.employees, id)?;
        patch.apply(employee)?;
        let updated = employee.clone();
        info!(employee_id = %id, "Employee updated");
        self.persist("update_employee")?;
        Ok(updated)
    }

    /// Soft-deletes an employee by marking it inactive.
    ///
    /// The record stays so that its logs, advances and deductions still
    /// resolve.
    pub fn deactivate_employee(&mut self, id: &str) -> LedgerResult<Employee> {
        let employee = find_mut(&mut self.snapshot.employees, id)?;
        employee.status = EmployeeStatus::Inactive;
        let updated = employee.clone();
        info!(employee_id = %id, "Employee deactivated");
        self.persist("deactivate_employee")?;
        Ok(updated)
    }

    // --- Departments ---

    /// All departments.
    pub fn departments(&self) -> &[Department] {
        &self.snapshot.departments
    }

    /// Adds a department.
    pub fn add_department(&mut self, form: NewDepartment) -> LedgerResult<Department> {
        let department = form.into_department(new_id())?;
        self.snapshot.departments.push(department.clone());
        info!(department_id = %department.id, name = %department.name, "Department added");
        self.persist("add_department")?;
        Ok(department)
    }

    /// Updates a department.
    pub fn update_department(
        &mut self,
        id: &str,
        patch: DepartmentPatch,
    ) -> LedgerResult<Department> {
        let department = find_mut(&mut self.snapshot.departments, id)?;
        patch.apply(department)?;
        let updated = department.clone();
        self.persist("update_department")?;
        Ok(updated)
    }

    /// Deletes a department.
    pub fn delete_department(&mut self, id: &str) -> LedgerResult<Department> {
        let removed = remove(&mut self.snapshot.departments, id)?;
        info!(department_id = %id, "Department deleted");
        self.persist("delete_department")?;
        Ok(removed)
    }

    // --- Tasks ---

    /// Tasks, optionally for one employee.
    pub fn tasks<'a>(&'a self, employee_id: Option<&'a str>) -> impl Iterator<Item = &'a Task> {
        self.snapshot
            .tasks
            .iter()
            .filter(move |t| matches_employee(employee_id, &t.employee_id))
    }

    /// Assigns a task to an employee.
    pub fn add_task(&mut self, form: NewTask) -> LedgerResult<Task> {
        self.require_employee("task", &form.employee_id)?;
        let task = form.into_task(new_id())?;
        self.snapshot.tasks.push(task.clone());
        info!(task_id = %task.id, employee_id = %task.employee_id, "Task added");
        self.persist("add_task")?;
        Ok(task)
    }

    /// Updates a task.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> LedgerResult<Task> {
        let task = find_mut(&mut self.snapshot.tasks, id)?;
        patch.apply(task)?;
        let updated = task.clone();
        self.persist("update_task")?;
        Ok(updated)
    }

    /// Deletes a task.
    pub fn delete_task(&mut self, id: &str) -> LedgerResult<Task> {
        let removed = remove(&mut self.snapshot.tasks, id)?;
        info!(task_id = %id, "Task deleted");
        self.persist("delete_task")?;
        Ok(removed)
    }

    // --- Work logs ---

    /// Work logs, optionally for one employee.
    pub fn work_logs<'a>(
        &'a self,
        employee_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a WorkLog> {
        self.snapshot
            .work_logs
            .iter()
            .filter(move |log| matches_employee(employee_id, &log.employee_id))
    }

    /// Records a work log, open or already closed.
    pub fn add_work_log(&mut self, form: NewWorkLog) -> LedgerResult<WorkLog> {
        self.require_employee("work_log", &form.employee_id)?;
        self.require_task("work_log", form.task_id.as_deref())?;
        let log = form.into_work_log(new_id())?;
        self.snapshot.work_logs.push(log.clone());
        info!(
            work_log_id = %log.id,
            employee_id = %log.employee_id,
            hours = %log.hours_worked,
            "Work log added"
        );
        self.persist("add_work_log")?;
        Ok(log)
    }

    /// Updates a work log, recomputing hours when its times change.
    pub fn update_work_log(&mut self, id: &str, patch: WorkLogPatch) -> LedgerResult<WorkLog> {
        if let Some(task_id) = &patch.task_id {
            self.require_task("work_log", task_id.as_deref())?;
        }
        let log = find_mut(&mut self.snapshot.work_logs, id)?;
        patch.apply(log)?;
        let updated = log.clone();
        self.persist("update_work_log")?;
        Ok(updated)
    }

    /// Closes an open work log at `end_time`.
    pub fn close_work_log(&mut self, id: &str, end_time: NaiveDateTime) -> LedgerResult<WorkLog> {
        let log = find_mut(&mut self.snapshot.work_logs, id)?;
        let hours = log.close(end_time)?;
        let closed = log.clone();
        info!(work_log_id = %id, hours = %hours, "Work log closed");
        self.persist("close_work_log")?;
        Ok(closed)
    }

    /// Deletes a work log.
    pub fn delete_work_log(&mut self, id: &str) -> LedgerResult<WorkLog> {
        let removed = remove(&mut self.snapshot.work_logs, id)?;
        info!(work_log_id = %id, "Work log deleted");
        self.persist("delete_work_log")?;
        Ok(removed)
    }

    // --- Attendance ---

    /// Attendance records, optionally for one employee.
    pub fn attendance<'a>(
        &'a self,
        employee_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Attendance> {
        self.snapshot
            .attendance
            .iter()
            .filter(move |a| matches_employee(employee_id, &a.employee_id))
    }

    /// Records attendance for a day.
    pub fn add_attendance(&mut self, form: NewAttendance) -> LedgerResult<Attendance> {
        self.require_employee("attendance", &form.employee_id)?;
        let record = form.into_attendance(new_id())?;
        self.snapshot.attendance.push(record.clone());
        info!(attendance_id = %record.id, employee_id = %record.employee_id, "Attendance added");
        self.persist("add_attendance")?;
        Ok(record)
    }

    /// Updates an attendance record.
    pub fn update_attendance(
        &mut self,
        id: &str,
        patch: AttendancePatch,
    ) -> LedgerResult<Attendance> {
        let record = find_mut(&mut self.snapshot.attendance, id)?;
        patch.apply(record)?;
        let updated = record.clone();
        self.persist("update_attendance")?;
        Ok(updated)
    }

    /// Deletes an attendance record.
    pub fn delete_attendance(&mut self, id: &str) -> LedgerResult<Attendance> {
        let removed = remove(&mut self.snapshot.attendance, id)?;
        self.persist("delete_attendance")?;
        Ok(removed)
    }

    // --- Advances ---

    /// Advances, optionally narrowed by employee and paid status.
    pub fn advances<'a>(
        &'a self,
        employee_id: Option<&'a str>,
        is_paid: Option<bool>,
    ) -> impl Iterator<Item = &'a Advance> {
        self.snapshot.advances.iter().filter(move |adv| {
            matches_employee(employee_id, &adv.employee_id)
                && is_paid.is_none_or(|paid| adv.is_paid == paid)
        })
    }

    /// Records a salary advance.
    pub fn add_advance(&mut self, form: NewAdvance) -> LedgerResult<Advance> {
        self.require_employee("advance", &form.employee_id)?;
        let advance = form.into_advance(new_id())?;
        self.snapshot.advances.push(advance.clone());
        info!(
            advance_id = %advance.id,
            employee_id = %advance.employee_id,
            amount = %advance.amount,
            "Advance recorded"
        );
        self.persist("add_advance")?;
        Ok(advance)
    }

    /// Updates an advance.
    pub fn update_advance(&mut self, id: &str, patch: AdvancePatch) -> LedgerResult<Advance> {
        let advance = find_mut(&mut self.snapshot.advances, id)?;
        patch.apply(advance)?;
        let updated = advance.clone();
        self.persist("update_advance")?;
        Ok(updated)
    }

    /// Deletes an advance.
    pub fn delete_advance(&mut self, id: &str) -> LedgerResult<Advance> {
        let removed = remove(&mut self.snapshot.advances, id)?;
        info!(advance_id = %id, "Advance deleted");
        self.persist("delete_advance")?;
        Ok(removed)
    }

    // --- Deductions ---

    /// Salary deductions, optionally for one employee.
    pub fn deductions<'a>(
        &'a self,
        employee_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a SalaryDeduction> {
        self.snapshot
            .salary_deductions
            .iter()
            .filter(move |d| matches_employee(employee_id, &d.employee_id))
    }

    /// Records a salary deduction.
    ///
    /// A deduction that references an advance settles it: the advance is
    /// marked paid in the same save. The advance must exist and belong to
    /// the same employee.
    pub fn record_deduction(&mut self, form: NewDeduction) -> LedgerResult<SalaryDeduction> {
        self.require_employee("deduction", &form.employee_id)?;
        if let Some(advance_id) = &form.advance_id {
            let advance = self
                .snapshot
                .advances
                .iter()
                .find(|adv| adv.id == *advance_id)
                .ok_or_else(|| {
                    LedgerError::invalid(
                        "deduction",
                        "advance_id",
                        format!("unknown advance '{}'", advance_id),
                    )
                })?;
            if advance.employee_id != form.employee_id {
                return Err(LedgerError::invalid(
                    "deduction",
                    "advance_id",
                    format!(
                        "advance '{}' belongs to employee '{}'",
                        advance_id, advance.employee_id
                    ),
                ));
            }
        }

        let deduction = form.into_deduction(new_id())?;
        self.snapshot.salary_deductions.push(deduction.clone());

        if let Some(advance_id) = &deduction.advance_id {
            match self
                .snapshot
                .advances
                .iter_mut()
                .find(|adv| adv.id == *advance_id)
            {
                Some(advance) => {
                    advance.is_paid = true;
                    info!(advance_id = %advance_id, "Advance settled by deduction");
                }
                None => error!(
                    deduction_id = %deduction.id,
                    advance_id = %advance_id,
                    "Deduction references an advance that could not be marked paid"
                ),
            }
        }

        info!(
            deduction_id = %deduction.id,
            employee_id = %deduction.employee_id,
            amount = %deduction.amount,
            "Deduction recorded"
        );
        self.persist("record_deduction")?;
        Ok(deduction)
    }

    /// Updates a deduction's amount, date or reason.
    pub fn update_deduction(
        &mut self,
        id: &str,
        patch: DeductionPatch,
    ) -> LedgerResult<SalaryDeduction> {
        let deduction = find_mut(&mut self.snapshot.salary_deductions, id)?;
        patch.apply(deduction)?;
        let updated = deduction.clone();
        self.persist("update_deduction")?;
        Ok(updated)
    }

    /// Deletes a deduction. A settled advance stays paid.
    pub fn delete_deduction(&mut self, id: &str) -> LedgerResult<SalaryDeduction> {
        let removed = remove(&mut self.snapshot.salary_deductions, id)?;
        info!(deduction_id = %id, "Deduction deleted");
        self.persist("delete_deduction")?;
        Ok(removed)
    }

    // --- Company ---

    /// The company details.
    pub fn company_info(&self) -> &CompanyInfo {
        &self.snapshot.company_info
    }

    /// Updates the company details.
    pub fn update_company_info(&mut self, patch: CompanyInfoPatch) -> LedgerResult<CompanyInfo> {
        patch.apply(&mut self.snapshot.company_info)?;
        self.persist("update_company_info")?;
        Ok(self.snapshot.company_info.clone())
    }

    // --- Data management ---

    /// A copy of every collection, suitable for backup.
    pub fn export(&self) -> Snapshot {
        self.snapshot.clone()
    }

    /// Replaces the collections present in an exported JSON document.
    ///
    /// A malformed document is rejected and nothing changes.
    pub fn import_json(&mut self, json: &str) -> LedgerResult<()> {
        self.snapshot.import_json(json).inspect_err(|e| {
            warn!(error = %e, "Rejected data import");
        })?;
        info!(
            employees = self.snapshot.employees.len(),
            work_logs = self.snapshot.work_logs.len(),
            "Data imported"
        );
        self.persist("import")
    }

    /// Empties every collection and restores the default company details.
    pub fn reset(&mut self) -> LedgerResult<()> {
        self.snapshot = Snapshot::with_company(self.default_company.clone());
        warn!("Ledger reset");
        self.persist("reset")
    }

    // --- Reports ---

    /// The net balance of one employee for one month, with its breakdown.
    pub fn balance(&self, employee_id: &str, period: PayMonth) -> BalanceBreakdown {
        balance_breakdown(&self.snapshot, employee_id, period, self.cutoff)
    }

    /// The salary report for one month.
    pub fn salary_report(&self, period: PayMonth) -> SalaryReport {
        build_salary_report(&self.snapshot, period, self.cutoff)
    }

    /// Dashboard figures as of `today`.
    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        summarize(&self.snapshot, today)
    }
}
