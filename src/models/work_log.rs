//! Work log model.
//!
//! A work log records one shift for one employee. It is opened with a start
//! time and closed later; hours stay at zero while it is open. Hourly staff
//! are paid from the sum of their closed logs.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{nullable, require_non_negative};
use crate::error::{LedgerError, LedgerResult};

const ENTITY: &str = "work_log";

/// Whether a shift has been closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// Shift closed; hours are final.
    Finished,
    /// Shift still running.
    Pending,
}

/// A logged shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    /// Unique identifier for the log.
    pub id: String,
    /// The employee who worked the shift.
    pub employee_id: String,
    /// The date the shift is booked against.
    pub date: NaiveDate,
    /// When the shift started.
    pub start_time: NaiveDateTime,
    /// When the shift ended, `None` while open.
    pub end_time: Option<NaiveDateTime>,
    /// Free-text description of the work.
    #[serde(default)]
    pub description: String,
    /// Optional task the shift was spent on.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Open/closed state.
    pub status: LogStatus,
    /// Hours worked, zero while open.
    pub hours_worked: Decimal,
}

impl WorkLog {
    /// Returns true while the shift has no end time.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Closes the shift at `end_time`, computing hours and marking it finished.
    ///
    /// Returns the computed hours.
    pub fn close(&mut self, end_time: NaiveDateTime) -> LedgerResult<Decimal> {
        let hours = checked_hours(self.start_time, end_time)?;
        self.end_time = Some(end_time);
        self.hours_worked = hours;
        self.status = LogStatus::Finished;
        Ok(hours)
    }

    /// Checks a stored log: end not before start, hours non-negative and
    /// zero while open, status matching the end time.
    pub fn validate(&self) -> LedgerResult<()> {
        if let Some(end) = self.end_time {
            checked_hours(self.start_time, end)?;
        }
        check_hours(self.end_time, self.hours_worked)?;
        let expected = if self.is_open() {
            LogStatus::Pending
        } else {
            LogStatus::Finished
        };
        if self.status != expected {
            return Err(LedgerError::invalid(
                ENTITY,
                "status",
                format!("{:?} does not match end time", self.status),
            ));
        }
        Ok(())
    }
}

/// Hours between two instants, rounded half-up to two decimal places.
///
/// # Examples
///
/// ```
/// use press_ledger::models::hours_between;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = NaiveDateTime::parse_from_str("2026-01-15 17:10:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(hours_between(start, end), Decimal::new(817, 2)); // 8.17
/// ```
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let minutes = (end - start).num_minutes();
    (Decimal::new(minutes, 0) / Decimal::new(60, 0))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn checked_hours(start: NaiveDateTime, end: NaiveDateTime) -> LedgerResult<Decimal> {
    if end < start {
        return Err(LedgerError::invalid(
            ENTITY,
            "end_time",
            format!("{} is before start time {}", end, start),
        ));
    }
    Ok(hours_between(start, end))
}

/// Hours are non-negative, and stay zero until the shift is closed.
fn check_hours(end_time: Option<NaiveDateTime>, hours: Decimal) -> LedgerResult<()> {
    require_non_negative(ENTITY, "hours_worked", hours)?;
    if end_time.is_none() && !hours.is_zero() {
        return Err(LedgerError::invalid(
            ENTITY,
            "hours_worked",
            format!("must be zero while the shift is open, got {}", hours),
        ));
    }
    Ok(())
}

/// Form for adding a work log.
///
/// When `end_time` is given the log is created closed with hours derived
/// from the times, unless `hours_worked` overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewWorkLog {
    /// The employee who worked the shift.
    pub employee_id: String,
    /// The date the shift is booked against.
    pub date: NaiveDate,
    /// When the shift started.
    pub start_time: NaiveDateTime,
    /// When the shift ended, if already known.
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Optional task reference.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Explicit hours, overriding the computed value.
    #[serde(default)]
    pub hours_worked: Option<Decimal>,
}

impl NewWorkLog {
    /// Validates the form and builds the record.
    pub fn into_work_log(self, id: String) -> LedgerResult<WorkLog> {
        let computed = match self.end_time {
            Some(end) => checked_hours(self.start_time, end)?,
            None => Decimal::ZERO,
        };
        let hours_worked = self.hours_worked.unwrap_or(computed);
        check_hours(self.end_time, hours_worked)?;

        let status = if self.end_time.is_some() {
            LogStatus::Finished
        } else {
            LogStatus::Pending
        };

        Ok(WorkLog {
            id,
            employee_id: self.employee_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
            task_id: self.task_id,
            status,
            hours_worked,
        })
    }
}

/// The mutable fields of a work log.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkLogPatch {
    /// New booking date.
    pub date: Option<NaiveDate>,
    /// Corrected start time.
    pub start_time: Option<NaiveDateTime>,
    /// Corrected end time; `null` reopens the shift.
    #[serde(default, deserialize_with = "nullable")]
    pub end_time: Option<Option<NaiveDateTime>>,
    /// New description.
    pub description: Option<String>,
    /// New task link; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub task_id: Option<Option<String>>,
    /// Explicit hours, overriding the computed value.
    pub hours_worked: Option<Decimal>,
}

impl WorkLogPatch {
    /// Applies the patch. Hours are recomputed from the times whenever a
    /// time changes and no explicit hours are given.
    pub fn apply(self, log: &mut WorkLog) -> LedgerResult<()> {
        let start_time = self.start_time.unwrap_or(log.start_time);
        let end_time = self.end_time.unwrap_or(log.end_time);
        let times_changed = self.start_time.is_some() || self.end_time.is_some();

        let hours_worked = match (self.hours_worked, end_time) {
            (Some(explicit), _) => explicit,
            (None, Some(end)) if times_changed => checked_hours(start_time, end)?,
            (None, None) if times_changed => Decimal::ZERO,
            (None, _) => log.hours_worked,
        };
        if let Some(end) = end_time {
            checked_hours(start_time, end)?;
        }
        check_hours(end_time, hours_worked)?;

        if let Some(date) = self.date {
            log.date = date;
        }
        if let Some(description) = self.description {
            log.description = description;
        }
        if let Some(task_id) = self.task_id {
            log.task_id = task_id;
        }
        log.start_time = start_time;
        log.end_time = end_time;
        log.hours_worked = hours_worked;
        log.status = if end_time.is_some() {
            LogStatus::Finished
        } else {
            LogStatus::Pending
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn open_log() -> WorkLog {
        NewWorkLog {
            employee_id: "emp_001".to_string(),
            date: make_date("2026-01-15"),
            start_time: make_datetime("2026-01-15", "09:00:00"),
            end_time: None,
            description: "Offset press run".to_string(),
            task_id: None,
            hours_worked: None,
        }
        .into_work_log("log_001".to_string())
        .unwrap()
    }

    #[test]
    fn test_new_open_log_is_pending_with_zero_hours() {
        let log = open_log();
        assert!(log.is_open());
        assert_eq!(log.status, LogStatus::Pending);
        assert_eq!(log.hours_worked, Decimal::ZERO);
    }

    #[test]
    fn test_new_closed_log_computes_hours() {
        let log = NewWorkLog {
            employee_id: "emp_001".to_string(),
            date: make_date("2026-01-15"),
            start_time: make_datetime("2026-01-15", "09:00:00"),
            end_time: Some(make_datetime("2026-01-15", "17:30:00")),
            description: String::new(),
            task_id: None,
            hours_worked: None,
        }
        .into_work_log("log_002".to_string())
        .unwrap();

        assert_eq!(log.status, LogStatus::Finished);
        assert_eq!(log.hours_worked, dec("8.5"));
    }

    #[test]
    fn test_close_rounds_to_two_decimals() {
        let mut log = open_log();
        let hours = log.close(make_datetime("2026-01-15", "09:20:00")).unwrap();
        // 20 minutes = 0.3333...
        assert_eq!(hours, dec("0.33"));
        assert_eq!(log.status, LogStatus::Finished);
        assert!(!log.is_open());
    }

    #[test]
    fn test_close_rounds_half_up() {
        // 3 minutes = 0.05 exactly; 9 minutes = 0.15 exactly
        let start = make_datetime("2026-01-15", "09:00:00");
        assert_eq!(hours_between(start, make_datetime("2026-01-15", "09:09:00")), dec("0.15"));
        // 1 minute = 0.01666...
        assert_eq!(hours_between(start, make_datetime("2026-01-15", "09:01:00")), dec("0.02"));
    }

    #[test]
    fn test_close_overnight_shift() {
        let mut log = open_log();
        log.start_time = make_datetime("2026-01-15", "22:00:00");
        let hours = log.close(make_datetime("2026-01-16", "06:00:00")).unwrap();
        assert_eq!(hours, dec("8"));
    }

    #[test]
    fn test_close_before_start_is_rejected() {
        let mut log = open_log();
        let result = log.close(make_datetime("2026-01-15", "08:00:00"));
        assert!(result.is_err());
        assert!(log.is_open());
    }

    #[test]
    fn test_patch_end_time_recomputes_hours() {
        let mut log = open_log();
        let patch: WorkLogPatch =
            serde_json::from_str(r#"{"end_time": "2026-01-15T12:00:00"}"#).unwrap();
        patch.apply(&mut log).unwrap();
        assert_eq!(log.hours_worked, dec("3"));
        assert_eq!(log.status, LogStatus::Finished);
    }

    #[test]
    fn test_patch_null_end_time_reopens_log() {
        let mut log = open_log();
        log.close(make_datetime("2026-01-15", "17:00:00")).unwrap();

        let patch: WorkLogPatch = serde_json::from_str(r#"{"end_time": null}"#).unwrap();
        patch.apply(&mut log).unwrap();
        assert!(log.is_open());
        assert_eq!(log.hours_worked, Decimal::ZERO);
        assert_eq!(log.status, LogStatus::Pending);
    }

    #[test]
    fn test_patch_description_keeps_hours() {
        let mut log = open_log();
        log.close(make_datetime("2026-01-15", "17:00:00")).unwrap();

        let patch = WorkLogPatch {
            description: Some("Binding".to_string()),
            ..Default::default()
        };
        patch.apply(&mut log).unwrap();
        assert_eq!(log.hours_worked, dec("8"));
        assert_eq!(log.description, "Binding");
    }

    #[test]
    fn test_patch_rejects_negative_hours() {
        let mut log = open_log();
        let patch = WorkLogPatch {
            hours_worked: Some(dec("-1")),
            ..Default::default()
        };
        assert!(patch.apply(&mut log).is_err());
    }

    #[test]
    fn test_new_open_log_rejects_explicit_hours() {
        let form = NewWorkLog {
            employee_id: "emp_001".to_string(),
            date: make_date("2026-01-15"),
            start_time: make_datetime("2026-01-15", "09:00:00"),
            end_time: None,
            description: String::new(),
            task_id: None,
            hours_worked: Some(dec("9")),
        };
        let err = form.into_work_log("log_001".to_string()).unwrap_err();
        assert!(err.to_string().contains("hours_worked"));
    }

    #[test]
    fn test_new_closed_log_accepts_explicit_hours() {
        let form = NewWorkLog {
            employee_id: "emp_001".to_string(),
            date: make_date("2026-01-15"),
            start_time: make_datetime("2026-01-15", "09:00:00"),
            end_time: Some(make_datetime("2026-01-15", "17:00:00")),
            description: String::new(),
            task_id: None,
            hours_worked: Some(dec("7.5")),
        };
        let log = form.into_work_log("log_001".to_string()).unwrap();
        assert_eq!(log.hours_worked, dec("7.5"));
    }

    #[test]
    fn test_patch_rejects_hours_on_open_log() {
        let mut log = open_log();
        let before = log.clone();
        let patch = WorkLogPatch {
            hours_worked: Some(dec("9")),
            ..Default::default()
        };
        assert!(patch.apply(&mut log).is_err());
        assert_eq!(log, before);
    }

    #[test]
    fn test_patch_rejects_hours_when_reopening() {
        let mut log = open_log();
        log.close(make_datetime("2026-01-15", "17:00:00")).unwrap();
        let patch: WorkLogPatch =
            serde_json::from_str(r#"{"end_time": null, "hours_worked": "8"}"#).unwrap();
        assert!(patch.apply(&mut log).is_err());
        assert!(!log.is_open());
    }

    #[test]
    fn test_validate_flags_open_log_with_hours() {
        let mut log = open_log();
        assert!(log.validate().is_ok());
        log.hours_worked = dec("9");
        assert!(log.validate().is_err());
    }

    #[test]
    fn test_validate_flags_status_mismatch() {
        let mut log = open_log();
        log.status = LogStatus::Finished;
        assert!(log.validate().is_err());
    }
}
