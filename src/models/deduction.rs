//! Salary deduction model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_positive;
use crate::error::LedgerResult;

const ENTITY: &str = "deduction";

/// An amount taken off an employee's salary for the month it is dated in.
///
/// A deduction that references an advance settles that advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDeduction {
    /// Unique identifier for the deduction.
    pub id: String,
    /// The employee it applies to.
    pub employee_id: String,
    /// Amount deducted, always positive.
    pub amount: Decimal,
    /// The date that places it in a pay month.
    pub date: NaiveDate,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
    /// The advance this deduction settles, if any.
    #[serde(default)]
    pub advance_id: Option<String>,
}

impl SalaryDeduction {
    /// Checks the amount is positive.
    pub fn validate(&self) -> LedgerResult<()> {
        require_positive(ENTITY, "amount", self.amount)
    }
}

/// Form for recording a deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDeduction {
    /// The employee it applies to.
    pub employee_id: String,
    /// Amount deducted.
    pub amount: Decimal,
    /// Pay-month date.
    pub date: NaiveDate,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
    /// The advance to settle.
    #[serde(default)]
    pub advance_id: Option<String>,
}

impl NewDeduction {
    /// Validates the form and builds the record.
    pub fn into_deduction(self, id: String) -> LedgerResult<SalaryDeduction> {
        let deduction = SalaryDeduction {
            id,
            employee_id: self.employee_id,
            amount: self.amount,
            date: self.date,
            reason: self.reason,
            advance_id: self.advance_id,
        };
        deduction.validate()?;
        Ok(deduction)
    }
}

/// The mutable fields of a deduction.
///
/// The advance link is fixed at creation: settling happens when the
/// deduction is recorded, so it cannot be moved to another advance later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeductionPatch {
    /// Corrected amount.
    pub amount: Option<Decimal>,
    /// Corrected date.
    pub date: Option<NaiveDate>,
    /// New reason.
    pub reason: Option<String>,
}

impl DeductionPatch {
    /// Applies the patch.
    pub fn apply(self, deduction: &mut SalaryDeduction) -> LedgerResult<()> {
        if let Some(amount) = self.amount {
            require_positive(ENTITY, "amount", amount)?;
            deduction.amount = amount;
        }
        if let Some(date) = self.date {
            deduction.date = date;
        }
        if let Some(reason) = self.reason {
            deduction.reason = reason;
        }
        Ok(())
    }
}
