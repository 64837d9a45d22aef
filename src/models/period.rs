//! Calendar month used to scope payroll queries.
//!
//! This module contains the [`PayMonth`] type. Months are zero-based
//! (0 = January) to match the month index the front end sends.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// A validated month/year pair.
///
/// # Example
///
/// ```
/// use press_ledger::models::PayMonth;
/// use chrono::NaiveDate;
///
/// let march = PayMonth::new(2, 2026).unwrap();
/// assert!(march.contains(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
/// assert!(!march.contains(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
/// assert!(PayMonth::new(12, 2026).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayMonth {
    /// Gregorian year.
    pub year: i32,
    /// Zero-based month index, 0..=11.
    pub month: u32,
}

impl PayMonth {
    /// Creates a pay month, rejecting a month outside 0..=11 or a year
    /// chrono cannot represent.
    pub fn new(month: u32, year: i32) -> LedgerResult<Self> {
        if month > 11 {
            return Err(LedgerError::InvalidPeriod {
                message: format!("month {} is outside 0..=11", month),
            });
        }
        if NaiveDate::from_ymd_opt(year, month + 1, 1).is_none() {
            return Err(LedgerError::InvalidPeriod {
                message: format!("year {} is out of range", year),
            });
        }
        Ok(Self { year, month })
    }

    /// The pay month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    /// Checks whether a date falls within this month and year.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    /// A single comparable month count (`year * 12 + month`).
    ///
    /// Two pay months compare chronologically by their ordinals.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }
}

impl fmt::Display for PayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}
