//! Monthly deduction calculation.

use rust_decimal::Decimal;

use crate::models::{AuditStep, PayMonth, SalaryDeduction};

/// The result of totalling an employee's deductions for a month.
#[derive(Debug, Clone)]
pub struct MonthDeductionsResult {
    /// Sum of deductions dated in the month.
    pub total: Decimal,
    /// Ids of the counted deductions.
    pub deduction_ids: Vec<String>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Totals the deductions dated in exactly `period`.
pub fn sum_month_deductions<'a>(
    deductions: impl IntoIterator<Item = &'a SalaryDeduction>,
    period: PayMonth,
    step_number: u32,
) -> MonthDeductionsResult {
    let counted: Vec<&SalaryDeduction> = deductions
        .into_iter()
        .filter(|ded| period.contains(ded.date))
        .collect();

    let total: Decimal = counted.iter().map(|ded| ded.amount).sum();
    let deduction_ids: Vec<String> = counted.iter().map(|ded| ded.id.clone()).collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "month_deductions".to_string(),
        rule_name: "Salary Deductions".to_string(),
        input: serde_json::json!({
            "period": period.to_string()
        }),
        output: serde_json::json!({
            "deduction_ids": deduction_ids,
            "total": total.normalize().to_string()
        }),
        reasoning: format!(
            "{} deduction(s) dated in {} totalling ${}",
            counted.len(),
            period,
            total.normalize()
        ),
    };

    MonthDeductionsResult {
        total,
        deduction_ids,
        audit_step,
    }
}
