//! Dashboard summary figures.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Employee;
use crate::store::Snapshot;

const RECENT_ACTIVITY_LIMIT: usize = 5;

/// What kind of record an activity entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A task assignment.
    Task,
    /// A work log starting or finishing.
    Log,
    /// A salary advance.
    Advance,
}

/// One line in the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Source record type.
    pub kind: ActivityKind,
    /// Human-readable description.
    pub message: String,
    /// When it happened; date-only events use midnight.
    pub timestamp: NaiveDateTime,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Number of active employees.
    pub total_employees: usize,
    /// Work logs dated today that are still open.
    pub active_today: usize,
    /// Hours logged on work logs dated today.
    pub total_hours_today: Decimal,
    /// Tasks marked completed.
    pub tasks_completed: usize,
    /// Tasks in any other state.
    pub tasks_pending: usize,
    /// The most recent events, newest first.
    pub recent_activity: Vec<ActivityEntry>,
}

fn employee_name<'a>(employees: &'a [Employee], employee_id: &str) -> &'a str {
    employees
        .iter()
        .find(|e| e.id == employee_id)
        .map(|e| e.name.as_str())
        .unwrap_or("Employee")
}

fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Computes the dashboard figures for `today`.
pub fn summarize(snapshot: &Snapshot, today: NaiveDate) -> DashboardSummary {
    let total_employees = snapshot.employees.iter().filter(|e| e.is_active()).count();

    let logs_today: Vec<_> = snapshot
        .work_logs
        .iter()
        .filter(|log| log.date == today)
        .collect();
    let active_today = logs_today.iter().filter(|log| log.is_open()).count();
    let total_hours_today: Decimal = logs_today.iter().map(|log| log.hours_worked).sum();

    let tasks_completed = snapshot.tasks.iter().filter(|t| t.is_completed()).count();
    let tasks_pending = snapshot.tasks.len() - tasks_completed;

    let tasks = snapshot.tasks.iter().map(|task| ActivityEntry {
        kind: ActivityKind::Task,
        message: format!("Task \"{}\" was {}", task.title, task.status.label()),
        timestamp: at_midnight(task.assigned_date),
    });
    let logs = snapshot.work_logs.iter().map(|log| ActivityEntry {
        kind: ActivityKind::Log,
        message: format!(
            "{} {} work",
            employee_name(&snapshot.employees, &log.employee_id),
            if log.is_open() { "started" } else { "completed" }
        ),
        timestamp: log.end_time.unwrap_or(log.start_time),
    });
    let advances = snapshot.advances.iter().map(|adv| ActivityEntry {
        kind: ActivityKind::Advance,
        message: format!(
            "Advance of {} given to {}",
            adv.amount,
            employee_name(&snapshot.employees, &adv.employee_id)
        ),
        timestamp: at_midnight(adv.date),
    });

    let mut recent_activity: Vec<ActivityEntry> = tasks.chain(logs).chain(advances).collect();
    recent_activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

    DashboardSummary {
        total_employees,
        active_today,
        total_hours_today,
        tasks_completed,
        tasks_pending,
        recent_activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Advance, EmployeeStatus, EmploymentType, LogStatus, SalaryType, Task, TaskPriority,
        TaskStatus, WorkLog,
    };
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn employee(id: &str, name: &str, status: EmployeeStatus) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            department: "Printing".to_string(),
            position: String::new(),
            phone: String::new(),
            email: String::new(),
            joining_date: date("2025-01-01"),
            employment_type: EmploymentType::FullTime,
            salary_type: SalaryType::Hourly,
            salary_rate: dec("20"),
            status,
        }
    }

    fn log(id: &str, employee_id: &str, start: &str, end: Option<&str>, hours: &str) -> WorkLog {
        let start_time = time(start);
        WorkLog {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            date: start_time.date(),
            start_time,
            end_time: end.map(time),
            description: String::new(),
            task_id: None,
            status: if end.is_some() {
                LogStatus::Finished
            } else {
                LogStatus::Pending
            },
            hours_worked: dec(hours),
        }
    }

    fn task(id: &str, assigned: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            title: format!("Job {}", id),
            description: String::new(),
            due_date: date("2026-03-31"),
            assigned_date: date(assigned),
            priority: TaskPriority::Medium,
            status,
        }
    }

    fn sample() -> Snapshot {
        Snapshot {
            employees: vec![
                employee("emp_001", "John Smith", EmployeeStatus::Active),
                employee("emp_002", "Emma Johnson", EmployeeStatus::Active),
                employee("emp_003", "Old Timer", EmployeeStatus::Inactive),
            ],
            work_logs: vec![
                log("log_001", "emp_001", "2026-03-10T08:00:00", Some("2026-03-10T12:30:00"), "4.5"),
                log("log_002", "emp_002", "2026-03-10T09:00:00", None, "0"),
                log("log_003", "emp_001", "2026-03-09T08:00:00", Some("2026-03-09T16:00:00"), "8"),
            ],
            tasks: vec![
                task("task_001", "2026-03-01", TaskStatus::Completed),
                task("task_002", "2026-03-05", TaskStatus::InProgress),
                task("task_003", "2026-03-06", TaskStatus::Pending),
            ],
            advances: vec![Advance {
                id: "adv_001".to_string(),
                employee_id: "emp_gone".to_string(),
                amount: dec("150"),
                date: date("2026-03-08"),
                description: String::new(),
                is_paid: false,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_for_today() {
        let summary = summarize(&sample(), date("2026-03-10"));

        assert_eq!(summary.total_employees, 2);
        assert_eq!(summary.active_today, 1);
        assert_eq!(summary.total_hours_today, dec("4.5"));
        assert_eq!(summary.tasks_completed, 1);
        assert_eq!(summary.tasks_pending, 2);
    }

    #[test]
    fn test_recent_activity_is_newest_first_and_capped() {
        let summary = summarize(&sample(), date("2026-03-10"));
        let activity = &summary.recent_activity;

        assert_eq!(activity.len(), 5);
        assert_eq!(activity[0].message, "John Smith completed work");
        assert_eq!(activity[1].message, "Emma Johnson started work");
        assert_eq!(activity[2].kind, ActivityKind::Log);
        assert_eq!(activity[3].message, "Advance of 150 given to Employee");
        assert_eq!(activity[4].message, "Task \"Job task_003\" was pending");
    }

    #[test]
    fn test_empty_snapshot_summary() {
        let summary = summarize(&Snapshot::default(), date("2026-03-10"));
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.total_hours_today, Decimal::ZERO);
        assert!(summary.recent_activity.is_empty());
    }
}
