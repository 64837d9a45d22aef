//! Monthly salary report across the active roster.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::advances::AdvanceCutoff;
use super::balance::balance_breakdown;
use super::records::PayrollRecords;
use crate::models::{PayMonth, SalaryType};

/// One employee's row in the salary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryReportLine {
    /// The employee.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Department name.
    pub department: String,
    /// Hourly or monthly.
    pub salary_type: SalaryType,
    /// Rate per hour or per month.
    pub salary_rate: Decimal,
    /// Hours counted (hourly staff only).
    pub hours_worked: Decimal,
    /// Pay before advances and deductions.
    pub base_pay: Decimal,
    /// Outstanding advances subtracted.
    pub advances_total: Decimal,
    /// Deductions subtracted.
    pub deductions_total: Decimal,
    /// Net payable.
    pub net_balance: Decimal,
}

/// Net salaries of every active employee for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryReport {
    /// The month reported on.
    pub period: PayMonth,
    /// One line per active employee, in roster order.
    pub lines: Vec<SalaryReportLine>,
    /// Sum of every line's net balance.
    pub total_net: Decimal,
}

/// Builds the salary report for `period`.
///
/// Inactive employees are left out.
pub fn build_salary_report<R: PayrollRecords>(
    records: &R,
    period: PayMonth,
    cutoff: AdvanceCutoff,
) -> SalaryReport {
    let lines: Vec<SalaryReportLine> = records
        .employees()
        .iter()
        .filter(|employee| employee.is_active())
        .map(|employee| {
            let breakdown = balance_breakdown(records, &employee.id, period, cutoff);
            SalaryReportLine {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                department: employee.department.clone(),
                salary_type: employee.salary_type,
                salary_rate: employee.salary_rate,
                hours_worked: breakdown.hours_worked,
                base_pay: breakdown.base_pay,
                advances_total: breakdown.advances_total,
                deductions_total: breakdown.deductions_total,
                net_balance: breakdown.net_balance,
            }
        })
        .collect();

    let total_net: Decimal = lines.iter().map(|line| line.net_balance).sum();

    SalaryReport {
        period,
        lines,
        total_net,
    }
}
