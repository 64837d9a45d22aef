//! Request types for the press ledger API.
//!
//! Create and update bodies are the model forms themselves (`New*` and
//! `*Patch`); this module holds the query strings and the few bodies that
//! have no model counterpart.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;
use crate::models::PayMonth;

/// `?month=&year=` for payroll queries. Months are zero-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodQuery {
    /// Month index, 0 = January.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl PeriodQuery {
    /// Validates the month/year pair.
    pub fn period(&self) -> LedgerResult<PayMonth> {
        PayMonth::new(self.month, self.year)
    }
}

/// `?active_only=` for the employee list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeQuery {
    /// Leave out soft-deleted employees.
    #[serde(default)]
    pub active_only: bool,
}

/// `?employee_id=` for per-employee lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordQuery {
    /// Only records for this employee.
    pub employee_id: Option<String>,
}

/// `?employee_id=&is_paid=` for the advance list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvanceQuery {
    /// Only advances for this employee.
    pub employee_id: Option<String>,
    /// Only paid (`true`) or unpaid (`false`) advances.
    pub is_paid: Option<bool>,
}

/// `?today=` for the dashboard; defaults to the server's local date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardQuery {
    /// The day to report on.
    pub today: Option<NaiveDate>,
}

/// Body of `POST /work-logs/:id/close`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloseWorkLogRequest {
    /// When the shift ended.
    pub end_time: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_query_validates_month() {
        let query = PeriodQuery {
            month: 12,
            year: 2026,
        };
        assert!(query.period().is_err());

        let query = PeriodQuery {
            month: 11,
            year: 2026,
        };
        assert_eq!(query.period().unwrap().to_string(), "2026-12");
    }

    #[test]
    fn test_close_request_deserialization() {
        let request: CloseWorkLogRequest =
            serde_json::from_str(r#"{"end_time": "2026-03-02T17:00:00"}"#).unwrap();
        assert_eq!(
            request.end_time,
            NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap()
        );
    }
}
