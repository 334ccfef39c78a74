use std::{sync::Arc, time::Duration};

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use proptest_arbitrary_interop::arb;

use super::*;
use crate::{
    clock::TokioClock,
    reminder::{NewReminder, ReminderItem, format_local},
    storage::{InMemoryReminderStorage, PRUNE_GRACE, ReminderStorage},
    test_utils::TestNotificationHost,
};

const DATETIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 31, 12, 0, 0).unwrap()
}

fn item_due(due_at: DateTime<Utc>) -> ReminderItem {
    NewReminder::new("Algorithms", "Problem set 3", due_at)
        .unwrap()
        .into_item(1)
}

fn scheduler(host: &Arc<TestNotificationHost>) -> NotificationScheduler {
    NotificationScheduler::new(host.clone(), DATETIME_FORMAT)
}

#[test]
fn future_due_time_is_the_trigger() {
    let due_at = now() + TimeDelta::minutes(5);

    assert_eq!(get_trigger(due_at, now()), due_at);
}

#[test]
fn past_due_time_triggers_one_minute_from_now() {
    let due_at = now() - TimeDelta::minutes(10);

    assert_eq!(get_trigger(due_at, now()), now() + PAST_DUE_BUMP);
}

#[test]
fn due_time_equal_to_now_counts_as_past() {
    assert_eq!(get_trigger(now(), now()), now() + PAST_DUE_BUMP);
}

#[test]
fn delay_is_whole_seconds_rounded_down() {
    let trigger = now() + TimeDelta::milliseconds(2_999);

    assert_eq!(get_delay_seconds(trigger, now()), 2);
}

#[test]
fn delay_is_never_below_one_second() {
    assert_eq!(get_delay_seconds(now(), now()), MIN_DELAY_SECONDS);
    assert_eq!(
        get_delay_seconds(now() + TimeDelta::milliseconds(400), now()),
        MIN_DELAY_SECONDS
    );
    assert_eq!(
        get_delay_seconds(now() - TimeDelta::hours(1), now()),
        MIN_DELAY_SECONDS
    );
}

proptest::proptest! {
    #[test]
    fn trigger_is_always_in_the_future(
        now in arb::<NaiveDateTime>(),
        offset_seconds in -86_400i64..86_400,
    ) {
        let now = now.with_nanosecond(0).unwrap().and_utc();
        let Some(due_at) = now.checked_add_signed(TimeDelta::seconds(offset_seconds)) else {
            return Ok(());
        };
        let Some(bumped) = now.checked_add_signed(PAST_DUE_BUMP) else {
            return Ok(());
        };

        let trigger = get_trigger(due_at, now);
        let delay = get_delay_seconds(trigger, now);

        assert!(trigger > now, "Trigger should always be in the future");
        assert!(delay >= MIN_DELAY_SECONDS);
        if offset_seconds > 0 {
            assert_eq!(delay, offset_seconds as u64);
        } else {
            assert_eq!(trigger, bumped);
            assert_eq!(delay, 60);
        }
    }
}

#[tokio::test]
async fn scheduling_five_minutes_ahead_delays_three_hundred_seconds() {
    let host = Arc::new(TestNotificationHost::granted());
    let item = item_due(now() + TimeDelta::minutes(5));

    let scheduled = scheduler(&host).schedule(&item, now()).await.unwrap();

    assert_eq!(scheduled.delay_seconds, 300);
    assert_eq!(scheduled.reminder_id, item.id);
    let requests = host.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].delay_seconds, 300);
    assert_eq!(requests[0].title, "📚 Algorithms");
}

#[tokio::test]
async fn past_due_notification_keeps_original_deadline_in_body() {
    let host = Arc::new(TestNotificationHost::granted());
    let due_at = now() - TimeDelta::minutes(10);
    let item = item_due(due_at);

    let scheduled = scheduler(&host).schedule(&item, now()).await.unwrap();

    assert_eq!(scheduled.trigger, now() + TimeDelta::minutes(1));
    assert_eq!(scheduled.delay_seconds, 60);

    let requests = host.requests();
    let expected_body = format!(
        "📝 Problem set 3 (Deadline: {})",
        format_local(due_at, DATETIME_FORMAT)
    );
    assert_eq!(requests[0].body, expected_body);
}

#[tokio::test]
async fn host_failure_is_returned_not_panicked() {
    let host = Arc::new(TestNotificationHost::failing());
    let item = item_due(now() + TimeDelta::minutes(5));

    let result = scheduler(&host).schedule(&item, now()).await;

    assert!(matches!(
        result,
        Err(SchedulingError::Host { reminder_id: 1, .. })
    ));
    assert_eq!(host.requests().len(), 1, "No retry is attempted");
}

#[tokio::test(start_paused = true)]
async fn pruning_task_runs_every_interval() {
    let storage = Arc::new(InMemoryReminderStorage::new());
    let clock = Arc::new(TokioClock::starting_at(now()));

    // Becomes prunable 30 seconds after start.
    let due_at = now() - PRUNE_GRACE + TimeDelta::seconds(30);
    storage
        .insert(NewReminder::new("Algorithms", "", due_at).unwrap())
        .await;

    let task = spawn_pruning_task(storage.clone(), clock, PRUNE_INTERVAL);

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert_eq!(storage.len().await, 1, "No pass before the first full period");

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(storage.is_empty().await);

    task.cancel(TASK_STOP_TIMEOUT).await;
}

#[tokio::test(start_paused = true)]
async fn cancelled_pruning_task_stops_pruning() {
    let storage = Arc::new(InMemoryReminderStorage::new());
    let clock = Arc::new(TokioClock::starting_at(now()));
    storage
        .insert(NewReminder::new("Algorithms", "", now() - PRUNE_GRACE).unwrap())
        .await;

    let task = spawn_pruning_task(storage.clone(), clock, PRUNE_INTERVAL);
    task.cancel(TASK_STOP_TIMEOUT).await;

    tokio::time::sleep(PRUNE_INTERVAL * 3).await;

    assert_eq!(storage.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn dropped_task_is_cancelled() {
    let (finished_tx, finished_rx) = tokio::sync::oneshot::channel();
    let task = ScheduledTask::spawn("test", move |cancellation_token| async move {
        cancellation_token.cancelled().await;
        let _ = finished_tx.send(());
    });

    drop(task);

    assert!(finished_rx.await.is_ok());
}
