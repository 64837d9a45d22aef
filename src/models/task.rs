//! Task model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::LedgerResult;

const ENTITY: &str = "task";

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Urgent.
    High,
    /// Normal.
    Medium,
    /// Whenever there is time.
    Low,
}

/// Task progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Done.
    Completed,
    /// Being worked on.
    InProgress,
    /// Not started.
    Pending,
}

impl TaskStatus {
    /// Lower-case label used in activity messages.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "completed",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Pending => "pending",
        }
    }
}

/// A task assigned to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: String,
    /// The assignee.
    pub employee_id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    pub due_date: NaiveDate,
    /// When the task was assigned.
    pub assigned_date: NaiveDate,
    /// Urgency.
    pub priority: TaskPriority,
    /// Progress.
    pub status: TaskStatus,
}

impl Task {
    /// Returns true once the task is completed.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Checks the title is present.
    pub fn validate(&self) -> LedgerResult<()> {
        require_text(ENTITY, "title", &self.title)
    }
}

/// Form for assigning a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTask {
    /// The assignee.
    pub employee_id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    pub due_date: NaiveDate,
    /// When the task was assigned.
    pub assigned_date: NaiveDate,
    /// Urgency.
    pub priority: TaskPriority,
    /// Initial progress.
    pub status: TaskStatus,
}

impl NewTask {
    /// Validates the form and builds the record.
    pub fn into_task(self, id: String) -> LedgerResult<Task> {
        require_text(ENTITY, "title", &self.title)?;
        Ok(Task {
            id,
            employee_id: self.employee_id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            assigned_date: self.assigned_date,
            priority: self.priority,
            status: self.status,
        })
    }
}

/// The mutable fields of a task. The assignee is fixed once assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New urgency.
    pub priority: Option<TaskPriority>,
    /// New progress.
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Applies the patch.
    pub fn apply(self, task: &mut Task) -> LedgerResult<()> {
        if let Some(title) = &self.title {
            require_text(ENTITY, "title", title)?;
        }
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        Ok(())
    }
}
