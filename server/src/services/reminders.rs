//! Reminders service
//!
//! Delivers reminder emails for calendar events. A sweep runs every 30
//! minutes (registered by the scheduler) and handles pending events that
//! have not been notified yet:
//! - due within the next 24 hours: send the reminder
//! - already past due: mark overdue, no further attempts

use super::mail::{MailMessage, MailTransport};
use super::settings::CalendarSettings;
use super::templates::{render_reminder, template_for, EmailContext};
use crate::config::REMINDER_WINDOW_HOURS;
use crate::store::{CalendarEvent, EventStatus, EventStore};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Counts from one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    pub marked_overdue: usize,
}

/// Reminder dispatcher shared by the sweep timer and content-type timers
#[derive(Clone)]
pub struct ReminderDispatcher {
    store: EventStore,
    mailer: Arc<dyn MailTransport>,
    settings: Arc<CalendarSettings>,
}

impl ReminderDispatcher {
    pub fn new(
        store: EventStore,
        mailer: Arc<dyn MailTransport>,
        settings: Arc<CalendarSettings>,
    ) -> Self {
        Self {
            store,
            mailer,
            settings,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.mailer.is_simulated()
    }

    /// Run a sweep against the current time
    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(Utc::now()).await
    }

    /// Check pending events for reminders to send or deadlines missed
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let window_end = now + Duration::hours(REMINDER_WINDOW_HOURS);
        let mut report = SweepReport::default();

        for snapshot in self.store.pending_unsent().await {
            // Earlier sends in this sweep may have been slow; act on current state
            let Ok(event) = self.store.get(&snapshot.id).await else {
                continue;
            };
            if event.status != EventStatus::Pending || event.reminder_sent {
                continue;
            }

            if event.due_date > now && event.due_date <= window_end {
                report.attempted += 1;
                if self.deliver(&event).await {
                    report.delivered += 1;
                } else {
                    report.failed += 1;
                }
            } else if event.due_date < now {
                match self.store.mark_overdue(&event.id).await {
                    Ok(true) => {
                        report.marked_overdue += 1;
                        tracing::debug!(
                            "Event {} ({}) is overdue; no further reminders",
                            event.id,
                            event.event_type
                        );
                    }
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Could not mark event overdue: {}", e),
                }
            }
        }

        if report != SweepReport::default() {
            tracing::info!(
                "Reminder sweep: {} attempted, {} delivered, {} failed, {} overdue",
                report.attempted,
                report.delivered,
                report.failed,
                report.marked_overdue
            );
        }

        report
    }

    /// Send the reminder for one event, regardless of its due date.
    ///
    /// Returns true when the email went out (or was simulated) and the event
    /// is now marked as notified. Failures are logged and leave the event
    /// eligible for the next sweep.
    pub async fn deliver(&self, event: &CalendarEvent) -> bool {
        let key = event.event_type.template_key();
        let Some(template) = template_for(key) else {
            tracing::error!(
                "No reminder template for event type '{}' (event {})",
                key,
                event.id
            );
            return false;
        };

        let ctx = EmailContext {
            base_url: &self.settings.base_url,
            timezone_label: &self.settings.timezone_label,
        };
        let (subject, html) = render_reminder(&template, event, &ctx);
        let message = MailMessage {
            from: self.settings.mail.from.clone(),
            to: self.settings.mail.to.clone(),
            subject,
            html,
        };

        match self.mailer.send(&message).await {
            Ok(()) => {
                if let Err(e) = self.store.mark_reminder_sent(&event.id).await {
                    tracing::warn!("Reminder sent but event vanished: {}", e);
                }
                tracing::info!("Reminder sent for {} event {}", event.event_type, event.id);
                true
            }
            Err(e) => {
                tracing::error!("Failed to send reminder for event {}: {}", event.id, e);
                false
            }
        }
    }
}
