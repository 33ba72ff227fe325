//! Event generator
//!
//! Expands the schedule into concrete upcoming events. Generation is pure:
//! given the schedule, a clock reading and the existing events it returns
//! only the events that are missing, so running it twice in a row creates
//! nothing the second time.

use crate::config::{CLIENT_CONTACT_OCCURRENCES, LINKEDIN_HORIZON_DAYS};
use crate::schedule::{DayName, ScheduleConfig, TimeOfDay};
use crate::store::{CalendarEvent, EventStore, EventType};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Upper bound on days scanned when looking for client-contact occurrences.
/// Monthly cadence needs roughly five months.
const CONTACT_SCAN_DAYS: i64 = 400;

/// Outcome of one regeneration pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub pruned: usize,
    pub created: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct EventGenerator {
    linkedin_horizon_days: i64,
    contact_occurrences: usize,
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self {
            linkedin_horizon_days: LINKEDIN_HORIZON_DAYS,
            contact_occurrences: CLIENT_CONTACT_OCCURRENCES,
        }
    }
}

impl EventGenerator {
    pub fn new(linkedin_horizon_days: i64, contact_occurrences: usize) -> Self {
        Self {
            linkedin_horizon_days,
            contact_occurrences,
        }
    }

    /// Prune stale events and add whatever the schedule implies is missing.
    ///
    /// Calendar dates are evaluated in the timezone of `now`.
    pub async fn regenerate<Tz: TimeZone>(
        &self,
        store: &EventStore,
        config: &ScheduleConfig,
        now: DateTime<Tz>,
    ) -> GenerationReport {
        let (pruned, created) = store
            .prune_and_extend(
                now.with_timezone(&Utc),
                |event| current_blog_slot(config, &now, event),
                |existing| self.generate(config, &now, existing),
            )
            .await;

        tracing::info!(
            "Content calendar regenerated: {} pruned, {} created",
            pruned,
            created
        );

        GenerationReport { pruned, created }
    }

    /// Events implied by `config` that are not already in `existing`
    pub fn generate<Tz: TimeZone>(
        &self,
        config: &ScheduleConfig,
        now: &DateTime<Tz>,
        existing: &[CalendarEvent],
    ) -> Vec<CalendarEvent> {
        let mut created = Vec::new();

        if config.linked_in.enabled {
            self.linkedin_events(config, now, existing, &mut created);
        }
        if config.blog.enabled {
            blog_events(config, now, existing, &mut created);
        }
        if config.case_studies.enabled {
            case_study_events(config, now, existing, &mut created);
        }
        if config.client_contact.enabled {
            self.client_contact_events(config, now, existing, &mut created);
        }

        created
    }

    fn linkedin_events<Tz: TimeZone>(
        &self,
        config: &ScheduleConfig,
        now: &DateTime<Tz>,
        existing: &[CalendarEvent],
        created: &mut Vec<CalendarEvent>,
    ) {
        let schedule = &config.linked_in;
        let days = schedule.active_days();
        let gate = schedule.gate();
        let tz = now.timezone();
        let today = now.date_naive();

        for offset in 0..self.linkedin_horizon_days {
            let date = today + Duration::days(offset);
            if !days.contains(&DayName::from(date.weekday())) || !gate.allows(date) {
                continue;
            }

            let Some(due) = local_at(&tz, date, schedule.time) else {
                continue;
            };
            if due < *now {
                continue;
            }

            let taken = any_event(existing, created, |e| {
                e.event_type == EventType::Linkedin && local_date(&tz, e) == date
            });
            if !taken {
                created.push(CalendarEvent::scheduled(
                    EventType::Linkedin,
                    due.with_timezone(&Utc),
                ));
            }
        }
    }

    fn client_contact_events<Tz: TimeZone>(
        &self,
        config: &ScheduleConfig,
        now: &DateTime<Tz>,
        existing: &[CalendarEvent],
        created: &mut Vec<CalendarEvent>,
    ) {
        let schedule = &config.client_contact;
        let days = schedule.active_days();
        let gate = schedule.gate();
        let tz = now.timezone();
        let today = now.date_naive();

        let mut found = 0;
        for offset in 0..CONTACT_SCAN_DAYS {
            if found >= self.contact_occurrences {
                break;
            }

            let date = today + Duration::days(offset);
            if !days.contains(&DayName::from(date.weekday())) || !gate.allows(date) {
                continue;
            }
            let Some(due) = local_at(&tz, date, schedule.time) else {
                continue;
            };
            if due < *now {
                continue;
            }
            found += 1;

            let due = due.with_timezone(&Utc);
            let taken = any_event(existing, created, |e| {
                e.event_type == EventType::ClientContact && e.due_date == due
            });
            if !taken {
                created.push(CalendarEvent::scheduled(EventType::ClientContact, due));
            }
        }
    }
}

/// One blog event for the current and the next calendar month
fn blog_events<Tz: TimeZone>(
    config: &ScheduleConfig,
    now: &DateTime<Tz>,
    existing: &[CalendarEvent],
    created: &mut Vec<CalendarEvent>,
) {
    let schedule = &config.blog;
    let tz = now.timezone();
    let today = now.date_naive();

    let current = (today.year(), today.month());
    let next = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };

    for (year, month) in [current, next] {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, schedule.day_of_month) else {
            continue;
        };
        let Some(due) = local_at(&tz, date, schedule.time) else {
            continue;
        };

        let taken = any_event(existing, created, |e| {
            e.event_type == EventType::Blog && same_month(&tz, e, year, month)
        });
        if !taken {
            created.push(CalendarEvent::scheduled(
                EventType::Blog,
                due.with_timezone(&Utc),
            ));
        }
    }
}

/// This month's blog event is regenerated even once it is past the
/// retention window, so pruning must leave it in place.
fn current_blog_slot<Tz: TimeZone>(
    config: &ScheduleConfig,
    now: &DateTime<Tz>,
    event: &CalendarEvent,
) -> bool {
    let today = now.date_naive();
    config.blog.enabled
        && event.event_type == EventType::Blog
        && same_month(&now.timezone(), event, today.year(), today.month())
}

/// Next occurrence of each configured case-study month, rolling into next
/// year once this year's date has passed
fn case_study_events<Tz: TimeZone>(
    config: &ScheduleConfig,
    now: &DateTime<Tz>,
    existing: &[CalendarEvent],
    created: &mut Vec<CalendarEvent>,
) {
    let schedule = &config.case_studies;
    let tz = now.timezone();
    let year = now.date_naive().year();

    for &month in &schedule.months {
        let this_year = NaiveDate::from_ymd_opt(year, month, schedule.day_of_month)
            .and_then(|date| local_at(&tz, date, schedule.time));
        let Some(mut due) = this_year else {
            continue;
        };

        let mut due_year = year;
        if due < *now {
            due_year += 1;
            let next_year = NaiveDate::from_ymd_opt(due_year, month, schedule.day_of_month)
                .and_then(|date| local_at(&tz, date, schedule.time));
            match next_year {
                Some(next) => due = next,
                None => continue,
            }
        }

        let taken = any_event(existing, created, |e| {
            e.event_type == EventType::CaseStudy && same_month(&tz, e, due_year, month)
        });
        if !taken {
            created.push(CalendarEvent::scheduled(
                EventType::CaseStudy,
                due.with_timezone(&Utc),
            ));
        }
    }
}

fn local_at<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: TimeOfDay) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time.naive())).earliest()
}

fn local_date<Tz: TimeZone>(tz: &Tz, event: &CalendarEvent) -> NaiveDate {
    event.due_date.with_timezone(tz).date_naive()
}

fn same_month<Tz: TimeZone>(tz: &Tz, event: &CalendarEvent, year: i32, month: u32) -> bool {
    let date = local_date(tz, event);
    date.year() == year && date.month() == month
}

fn any_event<P>(existing: &[CalendarEvent], created: &[CalendarEvent], predicate: P) -> bool
where
    P: Fn(&CalendarEvent) -> bool,
{
    existing.iter().chain(created.iter()).any(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ContactFrequency, LinkedInFrequency};
    use crate::store::EventStatus;
    use chrono::Timelike;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn only(config: &mut ScheduleConfig, keep: EventType) {
        config.linked_in.enabled = keep == EventType::Linkedin;
        config.blog.enabled = keep == EventType::Blog;
        config.case_studies.enabled = keep == EventType::CaseStudy;
        config.client_contact.enabled = keep == EventType::ClientContact;
    }

    #[test]
    fn test_linkedin_week_starting_sunday() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::Linkedin);
        config.linked_in.days = vec![DayName::Monday, DayName::Wednesday, DayName::Friday];
        config.linked_in.time = "09:00".parse().unwrap();

        // 2024-03-03 is a Sunday
        let now = at(2024, 3, 3, 0);
        let events = EventGenerator::new(7, 5).generate(&config, &now, &[]);

        let dates: Vec<DateTime<Utc>> = events.iter().map(|e| e.due_date).collect();
        assert_eq!(
            dates,
            vec![at(2024, 3, 4, 9), at(2024, 3, 6, 9), at(2024, 3, 8, 9)]
        );
    }

    #[test]
    fn test_linkedin_biweekly_skips_odd_weeks() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::Linkedin);
        config.linked_in.frequency = LinkedInFrequency::Biweekly;

        // Monday 2024-01-08 starts ISO week 2
        let now = at(2024, 1, 8, 0);
        let events = EventGenerator::new(14, 5).generate(&config, &now, &[]);

        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.due_date < at(2024, 1, 15, 0)));
    }

    #[test]
    fn test_linkedin_skips_slot_already_passed_today() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::Linkedin);

        // Monday 10:00, after the 09:00 slot
        let now = at(2024, 3, 4, 10);
        let events = EventGenerator::new(1, 5).generate(&config, &now, &[]);

        assert!(events.is_empty());
    }

    #[test]
    fn test_blog_spans_month_boundary() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::Blog);
        config.blog.day_of_month = 1;

        let now = at(2024, 1, 31, 12);
        let events = EventGenerator::default().generate(&config, &now, &[]);

        let dates: Vec<DateTime<Utc>> = events.iter().map(|e| e.due_date).collect();
        assert_eq!(dates, vec![at(2024, 1, 1, 10), at(2024, 2, 1, 10)]);
    }

    #[test]
    fn test_blog_wraps_year_in_december() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::Blog);
        config.blog.day_of_month = 20;

        let now = at(2024, 12, 5, 12);
        let events = EventGenerator::default().generate(&config, &now, &[]);

        assert_eq!(events[1].due_date, at(2025, 1, 20, 10));
    }

    #[test]
    fn test_case_study_rolls_into_next_year() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::CaseStudy);
        config.case_studies.months = vec![1];
        config.case_studies.day_of_month = 1;

        let now = at(2024, 2, 1, 0);
        let events = EventGenerator::default().generate(&config, &now, &[]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].due_date, at(2025, 1, 1, 11));
    }

    #[test]
    fn test_case_study_keeps_this_year_when_upcoming() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::CaseStudy);

        let now = at(2024, 2, 1, 0);
        let mut due: Vec<DateTime<Utc>> = EventGenerator::default()
            .generate(&config, &now, &[])
            .iter()
            .map(|e| e.due_date)
            .collect();
        due.sort();

        assert_eq!(
            due,
            vec![
                at(2024, 4, 15, 11),
                at(2024, 7, 15, 11),
                at(2024, 10, 15, 11),
                at(2025, 1, 15, 11),
            ]
        );
    }

    #[test]
    fn test_client_contact_next_five_weeks() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::ClientContact);

        // Wednesday
        let now = at(2024, 3, 6, 8);
        let events = EventGenerator::default().generate(&config, &now, &[]);

        assert_eq!(events.len(), 5);
        assert_eq!(events[0].due_date, at(2024, 3, 8, 14));
        assert_eq!(events[4].due_date, at(2024, 4, 5, 14));
        assert!(events
            .iter()
            .all(|e| e.due_date.weekday() == chrono::Weekday::Fri && e.due_date.hour() == 14));
    }

    #[test]
    fn test_client_contact_monthly_uses_first_week() {
        let mut config = ScheduleConfig::default();
        only(&mut config, EventType::ClientContact);
        config.client_contact.frequency = ContactFrequency::Monthly;

        let now = at(2024, 3, 6, 8);
        let events = EventGenerator::new(30, 2).generate(&config, &now, &[]);

        let dates: Vec<DateTime<Utc>> = events.iter().map(|e| e.due_date).collect();
        assert_eq!(dates, vec![at(2024, 4, 5, 14), at(2024, 5, 3, 14)]);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let config = ScheduleConfig::default();
        let now = at(2024, 3, 3, 0);
        let generator = EventGenerator::default();

        let first = generator.generate(&config, &now, &[]);
        assert!(!first.is_empty());

        let second = generator.generate(&config, &now, &first);
        assert!(second.is_empty());
    }

    #[test]
    fn test_disabled_schedule_generates_nothing() {
        let mut config = ScheduleConfig::default();
        config.linked_in.enabled = false;
        config.blog.enabled = false;
        config.case_studies.enabled = false;
        config.client_contact.enabled = false;

        let events = EventGenerator::default().generate(&config, &at(2024, 3, 3, 0), &[]);

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_twice_adds_no_duplicates() {
        let store = EventStore::new();
        let config = ScheduleConfig::default();
        let now = at(2024, 3, 3, 0);
        let generator = EventGenerator::default();

        let first = generator.regenerate(&store, &config, now).await;
        let second = generator.regenerate(&store, &config, now).await;

        assert!(first.created > 0);
        assert_eq!(second, GenerationReport { pruned: 0, created: 0 });
        assert_eq!(store.len().await, first.created);
    }

    #[tokio::test]
    async fn test_mid_month_blog_slot_survives_regeneration() {
        let store = EventStore::new();
        let config = ScheduleConfig::default();
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let generator = EventGenerator::default();

        generator.regenerate(&store, &config, now).await;
        let march = store
            .list()
            .await
            .into_iter()
            .find(|e| e.event_type == EventType::Blog && e.due_date < now)
            .unwrap();
        store.mark_overdue(&march.id).await.unwrap();

        let second = generator.regenerate(&store, &config, now).await;

        assert_eq!(second, GenerationReport { pruned: 0, created: 0 });
        let kept = store.get(&march.id).await.unwrap();
        assert_eq!(kept.status, EventStatus::Overdue);
    }

    #[tokio::test]
    async fn test_last_months_blog_slot_is_pruned() {
        let store = EventStore::new();
        let config = ScheduleConfig::default();
        let generator = EventGenerator::default();

        generator
            .regenerate(&store, &config, at(2024, 3, 20, 12))
            .await;
        let report = generator
            .regenerate(&store, &config, at(2024, 4, 20, 12))
            .await;

        assert!(report.pruned >= 1);
        assert!(store
            .list()
            .await
            .iter()
            .all(|e| !(e.event_type == EventType::Blog && e.due_date.month() == 3)));
    }
}
