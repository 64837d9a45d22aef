//! Read access the payroll calculator needs from a record store.

use crate::models::{Advance, Employee, SalaryDeduction, WorkLog};

/// The read side of a record store, as seen by payroll.
///
/// Implementors expose their four collections; the filtered views are
/// provided on top of them.
pub trait PayrollRecords {
    /// All employees, active or not.
    fn employees(&self) -> &[Employee];
    /// All work logs.
    fn work_logs(&self) -> &[WorkLog];
    /// All advances.
    fn advances(&self) -> &[Advance];
    /// All salary deductions.
    fn salary_deductions(&self) -> &[SalaryDeduction];

    /// Looks up an employee by id.
    fn find_employee(&self, id: &str) -> Option<&Employee> {
        self.employees().iter().find(|e| e.id == id)
    }

    /// Work logs belonging to one employee.
    fn work_logs_for<'a>(&'a self, employee_id: &'a str) -> impl Iterator<Item = &'a WorkLog> + 'a {
        self.work_logs()
            .iter()
            .filter(move |log| log.employee_id == employee_id)
    }

    /// Advances belonging to one employee, optionally narrowed by paid status.
    fn advances_for<'a>(
        &'a self,
        employee_id: &'a str,
        is_paid: Option<bool>,
    ) -> impl Iterator<Item = &'a Advance> + 'a {
        self.advances().iter().filter(move |adv| {
            adv.employee_id == employee_id && is_paid.is_none_or(|paid| adv.is_paid == paid)
        })
    }

    /// Salary deductions belonging to one employee.
    fn deductions_for<'a>(
        &'a self,
        employee_id: &'a str,
    ) -> impl Iterator<Item = &'a SalaryDeduction> + 'a {
        self.salary_deductions()
            .iter()
            .filter(move |ded| ded.employee_id == employee_id)
    }
}
