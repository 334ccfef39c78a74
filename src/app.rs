use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    appsettings::DisplaySettings,
    clock::Clock,
    reminder::{NewReminder, ReminderId, ReminderItem, ReminderView, ValidationError},
    scheduling::{
        NotificationScheduler, PRUNE_INTERVAL, ScheduledTask, TASK_STOP_TIMEOUT,
        delivery::{NotificationHost, PermissionStatus, ReceivedNotification},
        spawn_pruning_task,
    },
    selection::{DueDateSelection, ReminderForm},
    storage::{InMemoryReminderStorage, ReminderStorage},
};

pub const PERMISSION_DENIED_ADVISORY: &str =
    "Permission denied: allow the app to send notifications.";

/// Owns all application state and the background tasks tied to its lifetime.
pub struct ReminderApp {
    storage: Arc<dyn ReminderStorage>,
    scheduler: NotificationScheduler,
    clock: Arc<dyn Clock>,
    display: DisplaySettings,
    pub form: ReminderForm,
    permission: PermissionStatus,
    advisory_shown: bool,
    pruning_task: ScheduledTask,
    received_listener: ScheduledTask,
}

impl ReminderApp {
    pub async fn start(
        host: Arc<dyn NotificationHost>,
        clock: Arc<dyn Clock>,
        display: DisplaySettings,
    ) -> Self {
        let storage: Arc<dyn ReminderStorage> = Arc::new(InMemoryReminderStorage::new());
        Self::start_with_storage(host, storage, clock, display).await
    }

    pub async fn start_with_storage(
        host: Arc<dyn NotificationHost>,
        storage: Arc<dyn ReminderStorage>,
        clock: Arc<dyn Clock>,
        display: DisplaySettings,
    ) -> Self {
        let permission = ensure_permission(host.as_ref()).await;
        let received_listener = spawn_received_listener(host.subscribe());
        let pruning_task = spawn_pruning_task(storage.clone(), clock.clone(), PRUNE_INTERVAL);

        let scheduler = NotificationScheduler::new(host, display.datetime_format.clone());
        let form = ReminderForm::new(DueDateSelection::starting_at(clock.now(), &display));

        Self {
            storage,
            scheduler,
            clock,
            display,
            form,
            permission,
            advisory_shown: false,
            pruning_task,
            received_listener,
        }
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    /// Advisory for a denied permission. Yields it only on the first call.
    pub fn take_permission_advisory(&mut self) -> Option<&'static str> {
        if self.permission == PermissionStatus::Granted || self.advisory_shown {
            return None;
        }

        self.advisory_shown = true;
        Some(PERMISSION_DENIED_ADVISORY)
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    /// Turns the form into a reminder. Nothing is created when validation fails.
    pub async fn submit_form(&mut self) -> Result<ReminderItem, ValidationError> {
        let reminder = self.form.submit()?;
        Ok(self.add_reminder(reminder).await)
    }

    /// Lists the reminder and then asks the host to notify about it.
    pub async fn add_reminder(&self, reminder: NewReminder) -> ReminderItem {
        let item = self.storage.insert(reminder).await;

        // A failed notification never takes the reminder off the list.
        if let Err(error) = self.scheduler.schedule(&item, self.clock.now()).await {
            log::error!("Failed to schedule notification: {error}");
        }

        item
    }

    /// Removes the reminder from the list. An already scheduled notification still fires.
    pub async fn delete_reminder(&self, id: ReminderId) -> bool {
        self.storage.remove(id).await
    }

    pub async fn reminders(&self) -> Vec<ReminderView> {
        let now = self.clock.now();
        self.storage
            .list()
            .await
            .into_iter()
            .map(|item| ReminderView::new(item, now))
            .collect()
    }

    pub async fn shutdown(self) {
        log::info!("Shutting down");
        self.pruning_task.cancel(TASK_STOP_TIMEOUT).await;
        self.received_listener.cancel(TASK_STOP_TIMEOUT).await;
    }
}

async fn ensure_permission(host: &dyn NotificationHost) -> PermissionStatus {
    let status = host.permission_status().await;
    if status == PermissionStatus::Granted {
        log::info!("Notification permission already granted");
        return status;
    }

    let status = host.request_permission().await;
    if status == PermissionStatus::Granted {
        log::info!("Notification permission granted");
    } else {
        log::warn!("Notification permission is {status:?}, reminders will not notify");
    }

    status
}

fn spawn_received_listener(
    mut received: broadcast::Receiver<ReceivedNotification>,
) -> ScheduledTask {
    ScheduledTask::spawn("received notifications", move |cancellation_token| async move {
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                event = received.recv() => match event {
                    Ok(notification) => log::info!(
                        "Notification received {:?}: {} / {}",
                        notification.handle,
                        notification.title,
                        notification.body
                    ),
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("Missed {skipped} received notifications");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}
