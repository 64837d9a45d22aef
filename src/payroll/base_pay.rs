//! Base pay calculation.
//!
//! Monthly staff earn their flat rate regardless of the month; hourly staff
//! earn their rate times the hours logged in the month.

use rust_decimal::Decimal;

use crate::models::{AuditStep, Employee, PayMonth, SalaryType, WorkLog};

/// The result of a base pay calculation.
#[derive(Debug, Clone)]
pub struct BasePayResult {
    /// Pay before advances and deductions.
    pub base_pay: Decimal,
    /// Hours counted (always zero for monthly staff).
    pub hours_worked: Decimal,
    /// Ids of the work logs that contributed hours.
    pub work_log_ids: Vec<String>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates an employee's base pay for a month.
///
/// # Arguments
///
/// * `employee` - The employee being paid
/// * `work_logs` - The employee's work logs; only those dated in `period` count
/// * `period` - The pay month
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use press_ledger::models::{Employee, EmployeeStatus, EmploymentType, PayMonth, SalaryType};
/// use press_ledger::payroll::calculate_base_pay;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "John Smith".to_string(),
///     department: "Printing".to_string(),
///     position: String::new(),
///     phone: String::new(),
///     email: String::new(),
///     joining_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
///     employment_type: EmploymentType::FullTime,
///     salary_type: SalaryType::Monthly,
///     salary_rate: Decimal::new(3200, 0),
///     status: EmployeeStatus::Active,
/// };
///
/// let period = PayMonth::new(2, 2026).unwrap();
/// let result = calculate_base_pay(&employee, std::iter::empty(), period, 1);
/// assert_eq!(result.base_pay, Decimal::new(3200, 0));
/// ```
pub fn calculate_base_pay<'a>(
    employee: &Employee,
    work_logs: impl IntoIterator<Item = &'a WorkLog>,
    period: PayMonth,
    step_number: u32,
) -> BasePayResult {
    match employee.salary_type {
        SalaryType::Monthly => {
            let audit_step = AuditStep {
                step_number,
                rule_id: "base_pay_monthly".to_string(),
                rule_name: "Monthly Base Pay".to_string(),
                input: serde_json::json!({
                    "employee_id": employee.id,
                    "salary_type": "monthly",
                    "salary_rate": employee.salary_rate.normalize().to_string(),
                    "period": period.to_string()
                }),
                output: serde_json::json!({
                    "base_pay": employee.salary_rate.normalize().to_string()
                }),
                reasoning: format!(
                    "Monthly salary of ${} applies to {} regardless of hours logged",
                    employee.salary_rate.normalize(),
                    period
                ),
            };

            BasePayResult {
                base_pay: employee.salary_rate,
                hours_worked: Decimal::ZERO,
                work_log_ids: Vec::new(),
                audit_step,
            }
        }
        SalaryType::Hourly => {
            let in_month: Vec<&WorkLog> = work_logs
                .into_iter()
                .filter(|log| period.contains(log.date))
                .collect();

            let hours_worked: Decimal = in_month.iter().map(|log| log.hours_worked).sum();
            let base_pay = hours_worked * employee.salary_rate;
            let work_log_ids: Vec<String> = in_month.iter().map(|log| log.id.clone()).collect();

            let audit_step = AuditStep {
                step_number,
                rule_id: "base_pay_hourly".to_string(),
                rule_name: "Hourly Base Pay".to_string(),
                input: serde_json::json!({
                    "employee_id": employee.id,
                    "salary_type": "hourly",
                    "salary_rate": employee.salary_rate.normalize().to_string(),
                    "period": period.to_string(),
                    "work_logs": work_log_ids.len()
                }),
                output: serde_json::json!({
                    "hours_worked": hours_worked.normalize().to_string(),
                    "base_pay": base_pay.normalize().to_string()
                }),
                reasoning: format!(
                    "{}h logged in {} × ${}/h = ${}",
                    hours_worked.normalize(),
                    period,
                    employee.salary_rate.normalize(),
                    base_pay.normalize()
                ),
            };

            BasePayResult {
                base_pay,
                hours_worked,
                work_log_ids,
                audit_step,
            }
        }
    }
}
