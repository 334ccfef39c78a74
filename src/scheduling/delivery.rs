use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::broadcast;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub delay_seconds: u64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct NotificationHandle(pub u64);

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ReceivedNotification {
    pub handle: NotificationHandle,
    pub title: String,
    pub body: String,
}

/// Local notification subsystem of the device.
#[async_trait]
pub trait NotificationHost: Send + Sync + 'static {
    async fn permission_status(&self) -> PermissionStatus;

    /// Prompts the user. Only worth calling when permission is not granted yet.
    async fn request_permission(&self) -> PermissionStatus;

    async fn schedule_one_shot(
        &self,
        request: NotificationRequest,
    ) -> anyhow::Result<NotificationHandle>;

    fn subscribe(&self) -> broadcast::Receiver<ReceivedNotification>;
}
