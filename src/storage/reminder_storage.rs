use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::reminder::{NewReminder, ReminderId, ReminderItem};

/// How long past its due time a reminder stays listed before pruning removes it.
pub const PRUNE_GRACE: TimeDelta = TimeDelta::hours(2);

#[async_trait]
pub trait ReminderStorage: Send + Sync {
    /// Assigns an id and puts the reminder at the head of the list.
    async fn insert(&self, reminder: NewReminder) -> ReminderItem;
    async fn remove(&self, id: ReminderId) -> bool;
    async fn prune(&self, now: DateTime<Utc>) -> usize;
    /// Newest first.
    async fn list(&self) -> Vec<ReminderItem>;
}

pub fn is_prunable(item: &ReminderItem, now: DateTime<Utc>) -> bool {
    match item.due_at.checked_add_signed(PRUNE_GRACE) {
        Some(prune_at) => prune_at <= now,
        None => false,
    }
}

struct InMemoryReminderStore {
    next_id: ReminderId,
    items: VecDeque<ReminderItem>,
}

pub struct InMemoryReminderStorage {
    store: RwLock<InMemoryReminderStore>,
}

impl InMemoryReminderStorage {
    pub fn new() -> Self {
        InMemoryReminderStorage {
            store: RwLock::new(InMemoryReminderStore {
                next_id: 1,
                items: VecDeque::new(),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.items.is_empty()
    }
}

impl Default for InMemoryReminderStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReminderStorage for InMemoryReminderStorage {
    async fn insert(&self, reminder: NewReminder) -> ReminderItem {
        let mut store = self.store.write().await;
        let id = store.next_id;
        store.next_id += 1;

        let item = reminder.into_item(id);
        store.items.push_front(item.clone());

        log::info!("Inserted reminder {id}, due at {}", item.due_at);
        item
    }

    async fn remove(&self, id: ReminderId) -> bool {
        let mut store = self.store.write().await;
        let before = store.items.len();
        store.items.retain(|item| item.id != id);
        let removed = before != store.items.len();

        if removed {
            log::info!("Removed reminder {id}");
        } else {
            log::debug!("Reminder {id} is not listed, nothing to remove");
        }

        removed
    }

    async fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut store = self.store.write().await;
        let before = store.items.len();
        store.items.retain(|item| !is_prunable(item, now));
        let pruned = before - store.items.len();

        if pruned > 0 {
            log::info!(
                "Pruned {pruned} reminders more than {} hours past due",
                PRUNE_GRACE.num_hours()
            );
        }

        pruned
    }

    async fn list(&self) -> Vec<ReminderItem> {
        let store = self.store.read().await;
        store.items.iter().cloned().collect()
    }
}
