use std::time::Duration;

use tokio::{task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

pub const TASK_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Background task that lives until it is stopped or dropped.
pub struct ScheduledTask {
    name: &'static str,
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ScheduledTask {
    pub fn spawn<F, Fut>(name: &'static str, work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancellation_token = CancellationToken::new();
        let task_handle = tokio::spawn(work(cancellation_token.child_token()));

        log::info!("Started {name} task");

        Self {
            name,
            task_handle,
            cancellation_token,
        }
    }

    pub async fn cancel(mut self, timeout: Duration) {
        self.cancellation_token.cancel();
        if time::timeout(timeout, &mut self.task_handle).await.is_err() {
            log::warn!("{} task did not stop in {timeout:?}, aborting", self.name);
            self.task_handle.abort();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
