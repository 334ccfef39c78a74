use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::scheduling::delivery::{
    NotificationHandle, NotificationHost, NotificationRequest, PermissionStatus,
    ReceivedNotification,
};

pub type ReceivedRequests = Arc<Mutex<Vec<NotificationRequest>>>;

/// Host that records every request instead of notifying anyone.
pub struct TestNotificationHost {
    pub requests: ReceivedRequests,
    pub permission: Mutex<PermissionStatus>,
    pub grant_on_request: bool,
    pub permission_prompts: AtomicUsize,
    pub fail_scheduling: bool,
    pub received_tx: broadcast::Sender<ReceivedNotification>,
    pub next_handle: AtomicU64,
}

impl TestNotificationHost {
    pub fn new(permission: PermissionStatus) -> Self {
        let (received_tx, _) = broadcast::channel(16);
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            permission: Mutex::new(permission),
            grant_on_request: true,
            permission_prompts: AtomicUsize::new(0),
            fail_scheduling: false,
            received_tx,
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted)
    }

    pub fn failing() -> Self {
        Self {
            fail_scheduling: true,
            ..Self::granted()
        }
    }

    pub fn requests(&self) -> Vec<NotificationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> usize {
        self.permission_prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationHost for TestNotificationHost {
    async fn permission_status(&self) -> PermissionStatus {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> PermissionStatus {
        self.permission_prompts.fetch_add(1, Ordering::SeqCst);
        let status = if self.grant_on_request {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        *self.permission.lock().unwrap() = status;
        status
    }

    async fn schedule_one_shot(
        &self,
        request: NotificationRequest,
    ) -> anyhow::Result<NotificationHandle> {
        self.requests.lock().unwrap().push(request);
        if self.fail_scheduling {
            anyhow::bail!("Scheduling is broken");
        }

        Ok(NotificationHandle(
            self.next_handle.fetch_add(1, Ordering::SeqCst),
        ))
    }

    fn subscribe(&self) -> broadcast::Receiver<ReceivedNotification> {
        self.received_tx.subscribe()
    }
}
