mod reminder_storage;

pub use reminder_storage::{InMemoryReminderStorage, PRUNE_GRACE, ReminderStorage, is_prunable};
