use std::io;

use bulk_sms::configuration::Settings;
use bulk_sms::startup::Application;
use bulk_sms::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = get_subscriber("bulk-sms".into(), "info".into(), io::stdout);
    init_subscriber(subscriber);

    // Retrieve settings
    let config = Settings::get_config().expect("Failed to load configuration");

    // Build and run the application
    let application = Application::build(config)?;
    application.run_until_stopped().await?;

    Ok(())
}
