//! Attendance model.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::nullable;
use crate::error::{LedgerError, LedgerResult};

const ENTITY: &str = "attendance";

/// How the employee showed up on the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// On time.
    Present,
    /// Did not come in.
    Absent,
    /// Worked half the day.
    HalfDay,
    /// Arrived late.
    Late,
}

/// One day's attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier for the record.
    pub id: String,
    /// The employee.
    pub employee_id: String,
    /// The day.
    pub date: NaiveDate,
    /// Check-in time.
    pub check_in: NaiveDateTime,
    /// Check-out time, if recorded.
    pub check_out: Option<NaiveDateTime>,
    /// Attendance status.
    pub status: AttendanceStatus,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

fn check_times(check_in: NaiveDateTime, check_out: Option<NaiveDateTime>) -> LedgerResult<()> {
    match check_out {
        Some(out) if out < check_in => Err(LedgerError::invalid(
            ENTITY,
            "check_out",
            format!("{} is before check-in {}", out, check_in),
        )),
        _ => Ok(()),
    }
}

impl Attendance {
    /// Checks check-out is not before check-in.
    pub fn validate(&self) -> LedgerResult<()> {
        check_times(self.check_in, self.check_out)
    }
}

/// Form for recording attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAttendance {
    /// The employee.
    pub employee_id: String,
    /// The day.
    pub date: NaiveDate,
    /// Check-in time.
    pub check_in: NaiveDateTime,
    /// Check-out time.
    #[serde(default)]
    pub check_out: Option<NaiveDateTime>,
    /// Attendance status.
    pub status: AttendanceStatus,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl NewAttendance {
    /// Validates the form and builds the record.
    pub fn into_attendance(self, id: String) -> LedgerResult<Attendance> {
        check_times(self.check_in, self.check_out)?;
        Ok(Attendance {
            id,
            employee_id: self.employee_id,
            date: self.date,
            check_in: self.check_in,
            check_out: self.check_out,
            status: self.status,
            notes: self.notes,
        })
    }
}

/// The mutable fields of an attendance record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendancePatch {
    /// New day.
    pub date: Option<NaiveDate>,
    /// Corrected check-in.
    pub check_in: Option<NaiveDateTime>,
    /// Corrected check-out; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub check_out: Option<Option<NaiveDateTime>>,
    /// New status.
    pub status: Option<AttendanceStatus>,
    /// New notes.
    pub notes: Option<String>,
}

impl AttendancePatch {
    /// Applies the patch.
    pub fn apply(self, record: &mut Attendance) -> LedgerResult<()> {
        let check_in = self.check_in.unwrap_or(record.check_in);
        let check_out = self.check_out.unwrap_or(record.check_out);
        check_times(check_in, check_out)?;

        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(notes) = self.notes {
            record.notes = notes;
        }
        record.check_in = check_in;
        record.check_out = check_out;
        Ok(())
    }
}
