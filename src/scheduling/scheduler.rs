use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use super::delivery::{NotificationHandle, NotificationHost, NotificationRequest};
use crate::reminder::{ReminderId, ReminderItem, format_local};

/// A reminder whose due time already passed still fires, this long from now.
pub const PAST_DUE_BUMP: TimeDelta = TimeDelta::minutes(1);
/// The host misbehaves on zero delays.
pub const MIN_DELAY_SECONDS: u64 = 1;

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("Host refused to schedule notification for reminder {reminder_id}: {error:#}")]
    Host {
        reminder_id: ReminderId,
        error: anyhow::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub reminder_id: ReminderId,
    pub handle: NotificationHandle,
    pub trigger: DateTime<Utc>,
    pub delay_seconds: u64,
}

pub struct NotificationScheduler {
    host: Arc<dyn NotificationHost>,
    datetime_format: String,
}

impl NotificationScheduler {
    pub fn new(host: Arc<dyn NotificationHost>, datetime_format: impl Into<String>) -> Self {
        Self {
            host,
            datetime_format: datetime_format.into(),
        }
    }

    /// Requests one notification for `item`. Nothing is retried; the caller decides
    /// what a failure means.
    pub async fn schedule(
        &self,
        item: &ReminderItem,
        now: DateTime<Utc>,
    ) -> Result<ScheduledNotification, SchedulingError> {
        let trigger = get_trigger(item.due_at, now);
        let delay_seconds = get_delay_seconds(trigger, now);
        let request = self.build_request(item, delay_seconds);

        log::info!(
            "[SCHEDULE] Reminder {} fires in {delay_seconds}s at {trigger}",
            item.id
        );

        let handle = self
            .host
            .schedule_one_shot(request)
            .await
            .map_err(|error| SchedulingError::Host {
                reminder_id: item.id,
                error,
            })?;

        Ok(ScheduledNotification {
            reminder_id: item.id,
            handle,
            trigger,
            delay_seconds,
        })
    }

    fn build_request(&self, item: &ReminderItem, delay_seconds: u64) -> NotificationRequest {
        // The body keeps the due time the user picked, even when the trigger moved.
        let deadline = format_local(item.due_at, &self.datetime_format);

        NotificationRequest {
            title: format!("📚 {}", item.schedule_label),
            body: format!("📝 {} (Deadline: {deadline})", item.task_label),
            delay_seconds,
        }
    }
}

pub fn get_trigger(due_at: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if due_at > now {
        return due_at;
    }

    now.checked_add_signed(PAST_DUE_BUMP).unwrap_or(now)
}

pub fn get_delay_seconds(trigger: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let seconds = (trigger - now).num_seconds();

    u64::try_from(seconds)
        .unwrap_or(0)
        .max(MIN_DELAY_SECONDS)
}
