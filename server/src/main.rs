// Agency content calendar
// Entry point: load settings, start timers, run until interrupted

use agency_calendar::app;
use agency_calendar::services::CalendarSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agency_calendar=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting content calendar");

    let state = app::setup(CalendarSettings::from_env()).await?;

    let upcoming = state.calendar.upcoming_events(7).await;
    tracing::info!("{} events due in the next 7 days", upcoming.len());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    state.calendar.shutdown().await?;
    Ok(())
}
