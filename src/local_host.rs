use std::{
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::{sync::broadcast, task};

use crate::{
    appsettings::NotificationSettings,
    scheduling::delivery::{
        NotificationHandle, NotificationHost, NotificationRequest, PermissionStatus,
        ReceivedNotification,
    },
};

/// Delivers notifications to the terminal from tokio timers.
pub struct LocalNotificationHost {
    permission: Mutex<PermissionStatus>,
    grant_on_request: bool,
    next_handle: AtomicU64,
    received_tx: broadcast::Sender<ReceivedNotification>,
}

impl LocalNotificationHost {
    pub fn new(settings: &NotificationSettings) -> Self {
        let (received_tx, _) = broadcast::channel(32);

        Self {
            permission: Mutex::new(settings.permission),
            grant_on_request: settings.grant_on_request,
            next_handle: AtomicU64::new(1),
            received_tx,
        }
    }

    fn current_permission(&self) -> PermissionStatus {
        match self.permission.lock() {
            Ok(permission) => *permission,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl NotificationHost for LocalNotificationHost {
    async fn permission_status(&self) -> PermissionStatus {
        self.current_permission()
    }

    async fn request_permission(&self) -> PermissionStatus {
        let status = if self.grant_on_request {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };

        match self.permission.lock() {
            Ok(mut permission) => *permission = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }

        status
    }

    async fn schedule_one_shot(
        &self,
        request: NotificationRequest,
    ) -> anyhow::Result<NotificationHandle> {
        let permission = self.current_permission();
        anyhow::ensure!(
            permission == PermissionStatus::Granted,
            "Notification permission is {permission:?}"
        );
        anyhow::ensure!(request.delay_seconds > 0, "Delay must be positive");

        let handle = NotificationHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let received_tx = self.received_tx.clone();

        task::spawn(async move {
            tokio::time::sleep(Duration::from_secs(request.delay_seconds)).await;

            println!("\n🔔 {}\n   {}", request.title, request.body);

            let _ = received_tx.send(ReceivedNotification {
                handle,
                title: request.title,
                body: request.body,
            });
        });

        log::debug!("Notification {handle:?} armed");
        Ok(handle)
    }

    fn subscribe(&self) -> broadcast::Receiver<ReceivedNotification> {
        self.received_tx.subscribe()
    }
}
