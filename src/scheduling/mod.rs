pub mod delivery;
mod pruning;
mod scheduler;
mod task;

pub use pruning::{PRUNE_INTERVAL, spawn_pruning_task};
pub use scheduler::{
    MIN_DELAY_SECONDS, NotificationScheduler, PAST_DUE_BUMP, ScheduledNotification,
    SchedulingError, get_delay_seconds, get_trigger,
};
pub use task::{ScheduledTask, TASK_STOP_TIMEOUT};

#[cfg(test)]
mod tests;
