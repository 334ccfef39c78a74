use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::scheduling::delivery::PermissionStatus;

#[derive(Deserialize, Debug, Clone)]
pub struct NotificationSettings {
    /// Permission state the local host starts with.
    pub permission: PermissionStatus,
    /// Answer the local host gives when the user is prompted.
    pub grant_on_request: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DisplaySettings {
    pub date_format: String,
    pub time_format: String,
    pub datetime_format: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_owned(),
            time_format: "%H:%M".to_owned(),
            datetime_format: "%d/%m/%Y, %H:%M:%S".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub notifications: NotificationSettings,
    pub display: DisplaySettings,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment())
    }

    fn load_with(environment: Environment) -> Result<Self, ConfigError> {
        let display = DisplaySettings::default();

        let settings = Config::builder()
            .set_default("notifications.permission", "undetermined")?
            .set_default("notifications.grant_on_request", true)?
            .set_default("display.date_format", display.date_format)?
            .set_default("display.time_format", display.time_format)?
            .set_default("display.datetime_format", display.datetime_format)?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(environment)
            .build()?;

        settings.try_deserialize()
    }
}

/// `APP_` followed by the key path, with `__` between nested keys,
/// e.g. `APP_NOTIFICATIONS__PERMISSION=denied`.
fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}
