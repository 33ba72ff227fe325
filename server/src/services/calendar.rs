//! Content calendar
//!
//! Owns the active schedule, the event store and every service that acts on
//! them. One instance is built at startup and shared behind an `Arc`; tests
//! build a fresh one each.

use super::blog::BlogPostSource;
use super::drafts::DraftGenerator;
use super::export::{events_to_ics, google_calendar_link};
use super::generator::{EventGenerator, GenerationReport};
use super::mail::MailTransport;
use super::reminders::{ReminderDispatcher, SweepReport};
use super::scheduler::{SchedulerService, TriggerContext};
use super::settings::CalendarSettings;
use crate::error::{AppError, Result};
use crate::schedule::{ScheduleConfig, ScheduleUpdate, TimerKind};
use crate::store::{CalendarEvent, ContentDraft, EventStatus, EventStore, EventType, NewEvent};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

const EXPORT_LOCATION: &str = "Online";

pub struct ContentCalendar {
    settings: Arc<CalendarSettings>,
    schedule: RwLock<ScheduleConfig>,
    store: EventStore,
    generator: EventGenerator,
    dispatcher: ReminderDispatcher,
    drafts: DraftGenerator,
    scheduler: SchedulerService,
}

impl ContentCalendar {
    pub async fn new(
        settings: CalendarSettings,
        schedule: ScheduleConfig,
        mailer: Arc<dyn MailTransport>,
        posts: Arc<dyn BlogPostSource>,
    ) -> Result<Self> {
        schedule.validate()?;

        let settings = Arc::new(settings);
        let store = EventStore::new();
        let dispatcher = ReminderDispatcher::new(store.clone(), mailer, settings.clone());
        let drafts = DraftGenerator::new(posts, settings.base_url.clone());
        let scheduler = SchedulerService::new(TriggerContext::new(
            store.clone(),
            dispatcher.clone(),
            drafts.clone(),
        ))
        .await?;

        if dispatcher.is_simulated() {
            tracing::info!("Reminder delivery is simulated");
        }

        Ok(Self {
            settings,
            schedule: RwLock::new(schedule),
            store,
            generator: EventGenerator::default(),
            dispatcher,
            drafts,
            scheduler,
        })
    }

    /// Populate the calendar, register timers and start firing them
    pub async fn initialize(&self) -> Result<()> {
        self.regenerate_events().await;

        let schedule = self.schedule().await;
        self.scheduler.rebuild(&schedule).await?;
        self.scheduler.start().await?;

        tracing::info!("Content calendar initialized");
        Ok(())
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Snapshot of the active schedule
    pub async fn schedule(&self) -> ScheduleConfig {
        self.schedule.read().await.clone()
    }

    /// Apply a partial update, then rebuild timers and regenerate events.
    ///
    /// A rejected update leaves the active schedule and its timers untouched.
    pub async fn update_schedule(&self, update: ScheduleUpdate) -> Result<ScheduleConfig> {
        let mut schedule = self.schedule.write().await;
        let next = schedule.apply(&update)?;

        if let Err(e) = self.scheduler.rebuild(&next).await {
            tracing::error!("Timer rebuild failed, restoring previous schedule: {}", e);
            self.scheduler.rebuild(&schedule).await?;
            return Err(e);
        }

        *schedule = next.clone();
        drop(schedule);

        tracing::info!("Schedule updated");
        self.generator
            .regenerate(&self.store, &next, Local::now())
            .await;

        Ok(next)
    }

    /// Prune stale events and fill in the horizon, using the local clock
    pub async fn regenerate_events(&self) -> GenerationReport {
        self.regenerate_events_at(Local::now()).await
    }

    pub async fn regenerate_events_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> GenerationReport {
        let schedule = self.schedule().await;
        self.generator.regenerate(&self.store, &schedule, now).await
    }

    pub async fn list_events(&self) -> Vec<CalendarEvent> {
        self.store.list().await
    }

    /// Events due within the next `days` days
    pub async fn upcoming_events(&self, days: i64) -> Vec<CalendarEvent> {
        let now = Utc::now();
        self.store.list_between(now, now + Duration::days(days)).await
    }

    pub async fn get_event(&self, id: &str) -> Result<CalendarEvent> {
        self.store.get(id).await
    }

    /// Add a one-off event
    pub async fn add_event(&self, request: NewEvent) -> Result<CalendarEvent> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("title", "must not be empty"));
        }

        let event = CalendarEvent::new(
            request.event_type,
            title,
            request.description,
            request.due_date,
        );
        Ok(self.store.insert(event).await)
    }

    pub async fn update_event_status(&self, id: &str, status: EventStatus) -> Result<CalendarEvent> {
        self.store.update_status(id, status, Utc::now()).await
    }

    pub async fn complete_event(&self, id: &str) -> Result<CalendarEvent> {
        self.update_event_status(id, EventStatus::Completed).await
    }

    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.store.delete(id).await
    }

    /// Content skeleton for `content_type`
    pub async fn generate_draft(&self, content_type: &str) -> Result<ContentDraft> {
        self.drafts.generate(content_type).await
    }

    /// Create a same-day event for `event_type` as if its timer fired
    pub async fn trigger_now(&self, event_type: EventType) -> CalendarEvent {
        self.scheduler.context().fire(event_type).await
    }

    pub async fn run_reminder_sweep(&self) -> SweepReport {
        self.dispatcher.sweep().await
    }

    pub async fn run_reminder_sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        self.dispatcher.sweep_at(now).await
    }

    /// Deliver one event's reminder immediately. Returns whether it went out.
    pub async fn send_reminder(&self, id: &str) -> Result<bool> {
        let event = self.store.get(id).await?;
        Ok(self.dispatcher.deliver(&event).await)
    }

    /// ICS feed of every stored event
    pub async fn export_ics(&self) -> String {
        let events = self.store.list().await;
        events_to_ics(&events, &self.settings.calendar_domain, Utc::now())
    }

    pub async fn google_calendar_link(&self, id: &str) -> Result<String> {
        let event = self.store.get(id).await?;
        Ok(google_calendar_link(&event, EXPORT_LOCATION))
    }

    pub async fn active_timers(&self) -> Vec<TimerKind> {
        self.scheduler.active_timers().await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.scheduler.cancel_all().await?;
        self.scheduler.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::BlogUpdate;
    use crate::services::mail::SimulatedMailer;
    use crate::services::InMemoryBlogPosts;

    async fn calendar() -> ContentCalendar {
        ContentCalendar::new(
            CalendarSettings::default(),
            ScheduleConfig::default(),
            Arc::new(SimulatedMailer),
            Arc::new(InMemoryBlogPosts::new(Vec::new())),
        )
        .await
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_and_complete_event() {
        let calendar = calendar().await;
        let due = Utc::now() + Duration::days(2);

        let event = calendar
            .add_event(NewEvent {
                title: "  Webinar prep ".to_string(),
                description: String::new(),
                event_type: EventType::Custom,
                due_date: due,
            })
            .await
            .unwrap();
        assert_eq!(event.title, "Webinar prep");

        let done = calendar.complete_event(&event.id).await.unwrap();
        assert_eq!(done.status, EventStatus::Completed);
        assert!(done.completed_at.is_some());

        let again = calendar
            .update_event_status(&event.id, EventStatus::Pending)
            .await;
        assert!(matches!(again, Err(AppError::InvalidTransition { .. })));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_blank_title_rejected() {
        let calendar = calendar().await;

        let result = calendar
            .add_event(NewEvent {
                title: "   ".to_string(),
                description: String::new(),
                event_type: EventType::Custom,
                due_date: Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert!(calendar.list_events().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rejected_update_keeps_schedule() {
        let calendar = calendar().await;
        calendar.initialize().await.unwrap();
        let before = calendar.schedule().await;
        let timers = calendar.active_timers().await;

        let result = calendar
            .update_schedule(ScheduleUpdate {
                blog: Some(BlogUpdate {
                    day_of_month: Some(30),
                    ..BlogUpdate::default()
                }),
                ..ScheduleUpdate::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert_eq!(calendar.schedule().await, before);
        assert_eq!(calendar.active_timers().await, timers);

        calendar.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_event_id() {
        let calendar = calendar().await;

        assert!(matches!(
            calendar.google_calendar_link("missing").await,
            Err(AppError::EventNotFound(_))
        ));
        assert!(matches!(
            calendar.send_reminder("missing").await,
            Err(AppError::EventNotFound(_))
        ));
    }
}
