pub mod app;
pub mod appsettings;
pub mod clock;
pub mod local_host;
pub mod reminder;
pub mod scheduling;
pub mod selection;
pub mod storage;
pub mod terminal;

#[cfg(test)]
mod test_utils;
