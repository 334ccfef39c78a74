use std::sync::Arc;

use tenggat::{
    app::ReminderApp, appsettings::AppSettings, clock::SystemClock,
    local_host::LocalNotificationHost, terminal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load()?;
    log::info!("Loaded settings: {settings:?}");

    let host = Arc::new(LocalNotificationHost::new(&settings.notifications));
    let mut app = ReminderApp::start(host, Arc::new(SystemClock), settings.display).await;

    if let Some(advisory) = app.take_permission_advisory() {
        println!("⚠️ {advisory}");
    }

    let result = terminal::run(&mut app).await;
    app.shutdown().await;

    result
}
