use timetable_sync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting timetable-sync");

    // Load configuration
    let config = startup::load_config()?;

    // Start the web server
    startup::serve(config).await
}
