//! Salary advance model.
//!
//! An advance is money paid to an employee ahead of payroll. It reduces the
//! employee's net balance until a salary deduction settles it, at which
//! point `is_paid` flips to true.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_positive;
use crate::error::LedgerResult;

const ENTITY: &str = "advance";

/// A payment made ahead of payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    /// Unique identifier for the advance.
    pub id: String,
    /// The employee who received it.
    pub employee_id: String,
    /// Amount paid out, always positive.
    pub amount: Decimal,
    /// The date it was paid out.
    pub date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Whether a deduction has settled it.
    #[serde(default)]
    pub is_paid: bool,
}

impl Advance {
    /// Checks the amount is positive.
    pub fn validate(&self) -> LedgerResult<()> {
        require_positive(ENTITY, "amount", self.amount)
    }
}

/// Form for recording an advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAdvance {
    /// The employee receiving it.
    pub employee_id: String,
    /// Amount paid out.
    pub amount: Decimal,
    /// Payout date.
    pub date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Whether it is already settled.
    #[serde(default)]
    pub is_paid: bool,
}

impl NewAdvance {
    /// Validates the form and builds the record.
    pub fn into_advance(self, id: String) -> LedgerResult<Advance> {
        let advance = Advance {
            id,
            employee_id: self.employee_id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            is_paid: self.is_paid,
        };
        advance.validate()?;
        Ok(advance)
    }
}

/// The mutable fields of an advance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvancePatch {
    /// Corrected amount.
    pub amount: Option<Decimal>,
    /// Corrected payout date.
    pub date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// Settled flag.
    pub is_paid: Option<bool>,
}

impl AdvancePatch {
    /// Applies the patch.
    pub fn apply(self, advance: &mut Advance) -> LedgerResult<()> {
        if let Some(amount) = self.amount {
            require_positive(ENTITY, "amount", amount)?;
            advance.amount = amount;
        }
        if let Some(date) = self.date {
            advance.date = date;
        }
        if let Some(description) = self.description {
            advance.description = description;
        }
        if let Some(is_paid) = self.is_paid {
            advance.is_paid = is_paid;
        }
        Ok(())
    }
}
