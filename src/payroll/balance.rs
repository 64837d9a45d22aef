//! Net balance calculation.
//!
//! Net balance = base pay − outstanding advances − deductions for the month.
//! The calculation never fails: an unknown employee, or an employee with no
//! logs, advances or deductions, simply contributes zeros. The result may be
//! negative and is not rounded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::advances::{AdvanceCutoff, sum_outstanding_advances};
use super::base_pay::calculate_base_pay;
use super::deductions::sum_month_deductions;
use super::records::PayrollRecords;
use crate::models::{AuditStep, PayMonth, SalaryType};

/// A net balance together with the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceBreakdown {
    /// The employee queried.
    pub employee_id: String,
    /// The pay month queried.
    pub period: PayMonth,
    /// False when the id did not resolve; every figure is then zero.
    pub employee_found: bool,
    /// The employee's salary type, if found.
    pub salary_type: Option<SalaryType>,
    /// Hours counted towards hourly pay.
    pub hours_worked: Decimal,
    /// Pay before advances and deductions.
    pub base_pay: Decimal,
    /// Outstanding advances subtracted.
    pub advances_total: Decimal,
    /// Deductions subtracted.
    pub deductions_total: Decimal,
    /// `base_pay - advances_total - deductions_total`.
    pub net_balance: Decimal,
    /// Ids of the work logs counted.
    pub work_log_ids: Vec<String>,
    /// Ids of the advances counted.
    pub advance_ids: Vec<String>,
    /// Ids of the deductions counted.
    pub deduction_ids: Vec<String>,
    /// How the figures were reached.
    pub steps: Vec<AuditStep>,
}

impl BalanceBreakdown {
    fn not_found(employee_id: &str, period: PayMonth) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            period,
            employee_found: false,
            salary_type: None,
            hours_worked: Decimal::ZERO,
            base_pay: Decimal::ZERO,
            advances_total: Decimal::ZERO,
            deductions_total: Decimal::ZERO,
            net_balance: Decimal::ZERO,
            work_log_ids: Vec::new(),
            advance_ids: Vec::new(),
            deduction_ids: Vec::new(),
            steps: vec![AuditStep {
                step_number: 1,
                rule_id: "employee_lookup".to_string(),
                rule_name: "Employee Lookup".to_string(),
                input: serde_json::json!({ "employee_id": employee_id }),
                output: serde_json::json!({ "found": false }),
                reasoning: format!("Employee '{}' not found; balance is zero", employee_id),
            }],
        }
    }
}

/// Computes the net balance for an employee and month, with its breakdown.
///
/// # Examples
///
/// ```
/// use press_ledger::models::PayMonth;
/// use press_ledger::payroll::{AdvanceCutoff, balance_breakdown};
/// use press_ledger::store::Snapshot;
/// use rust_decimal::Decimal;
///
/// let snapshot = Snapshot::default();
/// let period = PayMonth::new(2, 2026).unwrap();
/// let breakdown = balance_breakdown(&snapshot, "nobody", period, AdvanceCutoff::default());
///
/// assert!(!breakdown.employee_found);
/// assert_eq!(breakdown.net_balance, Decimal::ZERO);
/// ```
pub fn balance_breakdown<R: PayrollRecords>(
    records: &R,
    employee_id: &str,
    period: PayMonth,
    cutoff: AdvanceCutoff,
) -> BalanceBreakdown {
    let Some(employee) = records.find_employee(employee_id) else {
        return BalanceBreakdown::not_found(employee_id, period);
    };

    let base = calculate_base_pay(employee, records.work_logs_for(employee_id), period, 1);
    let advances = sum_outstanding_advances(
        records.advances_for(employee_id, Some(false)),
        period,
        cutoff,
        2,
    );
    let deductions = sum_month_deductions(records.deductions_for(employee_id), period, 3);

    let net_balance = base.base_pay - advances.total - deductions.total;

    let net_step = AuditStep {
        step_number: 4,
        rule_id: "net_balance".to_string(),
        rule_name: "Net Balance".to_string(),
        input: serde_json::json!({
            "base_pay": base.base_pay.normalize().to_string(),
            "advances_total": advances.total.normalize().to_string(),
            "deductions_total": deductions.total.normalize().to_string()
        }),
        output: serde_json::json!({
            "net_balance": net_balance.normalize().to_string()
        }),
        reasoning: format!(
            "${} − ${} advances − ${} deductions = ${}",
            base.base_pay.normalize(),
            advances.total.normalize(),
            deductions.total.normalize(),
            net_balance.normalize()
        ),
    };

    BalanceBreakdown {
        employee_id: employee_id.to_string(),
        period,
        employee_found: true,
        salary_type: Some(employee.salary_type),
        hours_worked: base.hours_worked,
        base_pay: base.base_pay,
        advances_total: advances.total,
        deductions_total: deductions.total,
        net_balance,
        work_log_ids: base.work_log_ids,
        advance_ids: advances.advance_ids,
        deduction_ids: deductions.deduction_ids,
        steps: vec![
            base.audit_step,
            advances.audit_step,
            deductions.audit_step,
            net_step,
        ],
    }
}

/// Computes the net payable balance for an employee and month.
///
/// Returns zero for an unknown employee.
pub fn compute_net_balance<R: PayrollRecords>(
    records: &R,
    employee_id: &str,
    period: PayMonth,
    cutoff: AdvanceCutoff,
) -> Decimal {
    balance_breakdown(records, employee_id, period, cutoff).net_balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Advance, Employee, EmployeeStatus, EmploymentType, LogStatus, SalaryDeduction, WorkLog,
    };
    use crate::store::Snapshot;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn employee(id: &str, salary_type: SalaryType, rate: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Employee {}", id),
            department: "Printing".to_string(),
            position: String::new(),
            phone: String::new(),
            email: String::new(),
            joining_date: date("2025-01-01"),
            employment_type: EmploymentType::FullTime,
            salary_type,
            salary_rate: dec(rate),
            status: EmployeeStatus::Active,
        }
    }

    fn advance(id: &str, employee_id: &str, d: &str, amount: &str) -> Advance {
        Advance {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            amount: dec(amount),
            date: date(d),
            description: String::new(),
            is_paid: false,
        }
    }

    fn deduction(id: &str, employee_id: &str, d: &str, amount: &str) -> SalaryDeduction {
        SalaryDeduction {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            amount: dec(amount),
            date: date(d),
            reason: String::new(),
            advance_id: None,
        }
    }

    fn work_log(id: &str, employee_id: &str, d: &str, hours: &str) -> WorkLog {
        WorkLog {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            date: date(d),
            start_time: date(d).and_hms_opt(8, 0, 0).unwrap(),
            end_time: None,
            description: String::new(),
            task_id: None,
            status: LogStatus::Finished,
            hours_worked: dec(hours),
        }
    }

    fn march() -> PayMonth {
        PayMonth::new(2, 2026).unwrap()
    }

    /// The worked example: 3000 − 500 − 200 = 2300.
    #[test]
    fn test_monthly_with_advance_and_deduction() {
        let snapshot = Snapshot {
            employees: vec![employee("emp_e", SalaryType::Monthly, "3000.00")],
            advances: vec![advance("adv_001", "emp_e", "2026-03-04", "500.00")],
            salary_deductions: vec![deduction("ded_001", "emp_e", "2026-03-25", "200.00")],
            ..Default::default()
        };

        let breakdown =
            balance_breakdown(&snapshot, "emp_e", march(), AdvanceCutoff::Chronological);
        assert_eq!(breakdown.net_balance, dec("2300.00"));
        assert_eq!(breakdown.base_pay, dec("3000.00"));
        assert_eq!(breakdown.advances_total, dec("500.00"));
        assert_eq!(breakdown.deductions_total, dec("200.00"));
        assert_eq!(breakdown.steps.len(), 4);
        assert_eq!(breakdown.steps[3].rule_id, "net_balance");
    }

    #[test]
    fn test_unknown_employee_is_zero() {
        let snapshot = Snapshot {
            employees: vec![employee("emp_001", SalaryType::Monthly, "3000")],
            ..Default::default()
        };
        let balance =
            compute_net_balance(&snapshot, "emp_404", march(), AdvanceCutoff::Chronological);
        assert_eq!(balance, Decimal::ZERO);
    }

    #[test]
    fn test_hourly_balance_uses_month_hours() {
        let snapshot = Snapshot {
            employees: vec![employee("emp_h", SalaryType::Hourly, "18.50")],
            work_logs: vec![
                work_log("log_001", "emp_h", "2026-03-02", "8"),
                work_log("log_002", "emp_h", "2026-03-03", "6.5"),
                work_log("log_003", "emp_h", "2026-04-01", "8"),
                work_log("log_004", "emp_other", "2026-03-02", "8"),
            ],
            ..Default::default()
        };

        let breakdown =
            balance_breakdown(&snapshot, "emp_h", march(), AdvanceCutoff::Chronological);
        // 14.5h × 18.50 = 268.25
        assert_eq!(breakdown.hours_worked, dec("14.5"));
        assert_eq!(breakdown.net_balance, dec("268.25"));
    }

    #[test]
    fn test_other_employees_records_are_ignored() {
        let snapshot = Snapshot {
            employees: vec![
                employee("emp_001", SalaryType::Monthly, "3000"),
                employee("emp_002", SalaryType::Monthly, "2500"),
            ],
            advances: vec![advance("adv_001", "emp_002", "2026-03-04", "400")],
            salary_deductions: vec![deduction("ded_001", "emp_002", "2026-03-20", "100")],
            ..Default::default()
        };

        assert_eq!(
            compute_net_balance(&snapshot, "emp_001", march(), AdvanceCutoff::Chronological),
            dec("3000")
        );
        assert_eq!(
            compute_net_balance(&snapshot, "emp_002", march(), AdvanceCutoff::Chronological),
            dec("2000")
        );
    }

    #[test]
    fn test_balance_may_go_negative() {
        let snapshot = Snapshot {
            employees: vec![employee("emp_001", SalaryType::Hourly, "20")],
            advances: vec![advance("adv_001", "emp_001", "2026-02-15", "250")],
            ..Default::default()
        };
        assert_eq!(
            compute_net_balance(&snapshot, "emp_001", march(), AdvanceCutoff::Chronological),
            dec("-250")
        );
    }

    #[test]
    fn test_paid_advance_does_not_subtract() {
        let mut paid = advance("adv_001", "emp_001", "2026-03-04", "500");
        paid.is_paid = true;
        let snapshot = Snapshot {
            employees: vec![employee("emp_001", SalaryType::Monthly, "3000")],
            advances: vec![paid],
            ..Default::default()
        };
        assert_eq!(
            compute_net_balance(&snapshot, "emp_001", march(), AdvanceCutoff::Chronological),
            dec("3000")
        );
    }

    #[test]
    fn test_cutoff_rule_changes_cross_year_result() {
        let snapshot = Snapshot {
            employees: vec![employee("emp_001", SalaryType::Monthly, "3000")],
            advances: vec![advance("adv_001", "emp_001", "2025-12-10", "400")],
            ..Default::default()
        };

        assert_eq!(
            compute_net_balance(&snapshot, "emp_001", march(), AdvanceCutoff::Chronological),
            dec("2600")
        );
        assert_eq!(
            compute_net_balance(&snapshot, "emp_001", march(), AdvanceCutoff::Componentwise),
            dec("3000")
        );
    }

    #[test]
    fn test_inactive_employee_still_resolves() {
        let mut former = employee("emp_001", SalaryType::Monthly, "3000");
        former.status = EmployeeStatus::Inactive;
        let snapshot = Snapshot {
            employees: vec![former],
            ..Default::default()
        };
        let breakdown =
            balance_breakdown(&snapshot, "emp_001", march(), AdvanceCutoff::Chronological);
        assert!(breakdown.employee_found);
        assert_eq!(breakdown.net_balance, dec("3000"));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let snapshot = Snapshot {
            employees: vec![employee("emp_001", SalaryType::Monthly, "3000")],
            advances: vec![advance("adv_001", "emp_001", "2026-03-04", "500")],
            ..Default::default()
        };
        let first = balance_breakdown(&snapshot, "emp_001", march(), AdvanceCutoff::default());
        let second = balance_breakdown(&snapshot, "emp_001", march(), AdvanceCutoff::default());
        assert_eq!(first, second);
    }
}
