use std::{sync::Arc, time::Duration};

use tokio::time::{self, Instant, MissedTickBehavior};

use super::task::ScheduledTask;
use crate::{clock::Clock, storage::ReminderStorage};

pub const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Prunes `storage` once per `period` until the returned task is cancelled.
/// The first pass runs one full period after spawning.
pub fn spawn_pruning_task(
    storage: Arc<dyn ReminderStorage>,
    clock: Arc<dyn Clock>,
    period: Duration,
) -> ScheduledTask {
    ScheduledTask::spawn("pruning", move |cancellation_token| async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    log::info!("Pruning task shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let pruned = storage.prune(clock.now()).await;
                    log::debug!("[PRUNE] Pass finished, {pruned} removed");
                }
            }
        }
    })
}
