use chrono::{DateTime, Local, Utc};
use thiserror::Error;

pub type ReminderId = u64;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ValidationError {
    #[error("Enter a class schedule or an assignment")]
    EmptyReminder,
}

/// Validated request to create a reminder.
///
/// At least one of the two labels is non-blank. Labels are kept exactly as typed,
/// only the blank check trims them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    schedule_label: String,
    task_label: String,
    due_at: DateTime<Utc>,
}

impl NewReminder {
    pub fn new(
        schedule_label: impl Into<String>,
        task_label: impl Into<String>,
        due_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let schedule_label = schedule_label.into();
        let task_label = task_label.into();

        if schedule_label.trim().is_empty() && task_label.trim().is_empty() {
            return Err(ValidationError::EmptyReminder);
        }

        Ok(Self {
            schedule_label,
            task_label,
            due_at,
        })
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    pub(crate) fn into_item(self, id: ReminderId) -> ReminderItem {
        ReminderItem {
            id,
            schedule_label: self.schedule_label,
            task_label: self.task_label,
            due_at: self.due_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderItem {
    pub id: ReminderId,
    pub schedule_label: String,
    pub task_label: String,
    pub due_at: DateTime<Utc>,
}

impl ReminderItem {
    /// Display expiry. Passes the instant the due time is behind `now`,
    /// long before the item becomes eligible for pruning.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }

    pub fn due_at_local(&self, format: &str) -> String {
        format_local(self.due_at, format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderView {
    pub item: ReminderItem,
    pub expired: bool,
}

impl ReminderView {
    pub fn new(item: ReminderItem, now: DateTime<Utc>) -> Self {
        let expired = item.is_expired(now);
        Self { item, expired }
    }
}

pub fn format_local(at: DateTime<Utc>, format: &str) -> String {
    at.with_timezone(&Local).format(format).to_string()
}
