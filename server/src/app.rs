//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::error::Result;
use crate::services::{
    mailer_from_settings, BlogPostSource, CalendarSettings, ContentCalendar, InMemoryBlogPosts,
    SettingsService,
};
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<CalendarSettings>,
    pub calendar: Arc<ContentCalendar>,
}

/// Application setup - called once on startup
pub async fn setup(settings: CalendarSettings) -> Result<AppState> {
    tracing::info!("Initializing content calendar");
    tracing::info!(
        "Base URL: {}, timezone: {}",
        settings.base_url,
        settings.timezone_label
    );

    let schedule = SettingsService::new(settings.schedule_path.clone())
        .load_schedule()
        .await?;
    let mailer = mailer_from_settings(&settings.mail)?;
    let posts: Arc<dyn BlogPostSource> = Arc::new(InMemoryBlogPosts::default());

    let calendar = ContentCalendar::new(settings.clone(), schedule, mailer, posts).await?;
    calendar.initialize().await?;

    tracing::info!("Application initialized successfully");

    Ok(AppState {
        settings: Arc::new(settings),
        calendar: Arc::new(calendar),
    })
}
