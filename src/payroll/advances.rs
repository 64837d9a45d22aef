//! Outstanding advance calculation.
//!
//! Every unpaid advance dated on or before the pay month is subtracted from
//! the employee's balance. Which advances count as "on or before" depends on
//! the configured [`AdvanceCutoff`].

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Advance, AuditStep, PayMonth};

/// How an advance's date is compared against the pay month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceCutoff {
    /// The advance's month-year must not be later than the pay month.
    #[default]
    Chronological,
    /// Year and month are compared independently: an advance counts only
    /// if its year is not later AND its month number is not later. An
    /// advance from December of last year therefore does not count
    /// against March of this year.
    Componentwise,
}

impl AdvanceCutoff {
    /// Returns true if an advance dated `date` counts against `period`.
    ///
    /// # Examples
    ///
    /// ```
    /// use press_ledger::models::PayMonth;
    /// use press_ledger::payroll::AdvanceCutoff;
    /// use chrono::NaiveDate;
    ///
    /// let march = PayMonth::new(2, 2026).unwrap();
    /// let last_december = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
    ///
    /// assert!(AdvanceCutoff::Chronological.includes(last_december, march));
    /// assert!(!AdvanceCutoff::Componentwise.includes(last_december, march));
    /// ```
    pub fn includes(&self, date: NaiveDate, period: PayMonth) -> bool {
        match self {
            AdvanceCutoff::Chronological => PayMonth::of(date).ordinal() <= period.ordinal(),
            AdvanceCutoff::Componentwise => {
                date.year() <= period.year && date.month0() <= period.month
            }
        }
    }
}

/// The result of totalling an employee's outstanding advances.
#[derive(Debug, Clone)]
pub struct OutstandingAdvancesResult {
    /// Sum of the counted advances.
    pub total: Decimal,
    /// Ids of the counted advances.
    pub advance_ids: Vec<String>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Totals the unpaid advances that count against `period`.
///
/// Paid advances are skipped whatever their date.
pub fn sum_outstanding_advances<'a>(
    advances: impl IntoIterator<Item = &'a Advance>,
    period: PayMonth,
    cutoff: AdvanceCutoff,
    step_number: u32,
) -> OutstandingAdvancesResult {
    let counted: Vec<&Advance> = advances
        .into_iter()
        .filter(|adv| !adv.is_paid && cutoff.includes(adv.date, period))
        .collect();

    let total: Decimal = counted.iter().map(|adv| adv.amount).sum();
    let advance_ids: Vec<String> = counted.iter().map(|adv| adv.id.clone()).collect();

    let reasoning = if counted.is_empty() {
        format!("No unpaid advances on or before {}", period)
    } else {
        format!(
            "{} unpaid advance(s) on or before {} totalling ${}",
            counted.len(),
            period,
            total.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "outstanding_advances".to_string(),
        rule_name: "Outstanding Advances".to_string(),
        input: serde_json::json!({
            "period": period.to_string(),
            "cutoff": cutoff
        }),
        output: serde_json::json!({
            "advance_ids": advance_ids,
            "total": total.normalize().to_string()
        }),
        reasoning,
    };

    OutstandingAdvancesResult {
        total,
        advance_ids,
        audit_step,
    }
}
