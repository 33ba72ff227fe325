//! Cron expressions derived from the schedule
//!
//! Expressions use the six-field, seconds-first format understood by
//! tokio-cron-scheduler: `sec min hour day-of-month month day-of-week`,
//! with day-of-week numbered from Sunday = 0.

use super::{BlogFrequency, DayName, ScheduleConfig, TimeOfDay};
use crate::config::REMINDER_SWEEP_CRON;
use crate::store::EventType;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Identifies one registered timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerKind {
    Linkedin,
    Blog,
    CaseStudy,
    ClientContact,
    ReminderSweep,
}

impl TimerKind {
    /// Content type created when this timer fires, if any
    pub fn event_type(self) -> Option<EventType> {
        match self {
            TimerKind::Linkedin => Some(EventType::Linkedin),
            TimerKind::Blog => Some(EventType::Blog),
            TimerKind::CaseStudy => Some(EventType::CaseStudy),
            TimerKind::ClientContact => Some(EventType::ClientContact),
            TimerKind::ReminderSweep => None,
        }
    }
}

/// Extra condition checked when a timer fires.
///
/// Cron cannot express "every other week" or "first Friday of the month",
/// so those cadences fire weekly and filter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireGate {
    Always,
    /// Only on even ISO week numbers
    EvenWeeks,
    /// Only within the first seven days of the month
    FirstWeekOfMonth,
}

impl FireGate {
    pub fn allows(self, date: NaiveDate) -> bool {
        match self {
            FireGate::Always => true,
            FireGate::EvenWeeks => date.iso_week().week() % 2 == 0,
            FireGate::FirstWeekOfMonth => date.day() <= 7,
        }
    }
}

/// A timer to register: when it fires and what gate applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPlan {
    pub kind: TimerKind,
    pub cron: String,
    pub gate: FireGate,
}

/// Timers for every enabled sub-schedule, in a stable order.
///
/// Recomputed on each rebuild; never stored alongside the configuration.
pub fn trigger_plans(config: &ScheduleConfig) -> Vec<TriggerPlan> {
    let mut plans = Vec::new();

    let linked_in = &config.linked_in;
    if linked_in.enabled {
        plans.push(TriggerPlan {
            kind: TimerKind::Linkedin,
            cron: weekly_cron(linked_in.time, &linked_in.active_days()),
            gate: linked_in.gate(),
        });
    }

    let blog = &config.blog;
    if blog.enabled {
        let (cron, gate) = match blog.frequency {
            BlogFrequency::Monthly => (
                format!(
                    "0 {} {} {} * *",
                    blog.time.minute(),
                    blog.time.hour(),
                    blog.day_of_month
                ),
                FireGate::Always,
            ),
            BlogFrequency::Weekly => (weekly_cron(blog.time, &[DayName::Monday]), FireGate::Always),
            BlogFrequency::Biweekly => (
                weekly_cron(blog.time, &[DayName::Monday]),
                FireGate::EvenWeeks,
            ),
        };
        plans.push(TriggerPlan {
            kind: TimerKind::Blog,
            cron,
            gate,
        });
    }

    let case_studies = &config.case_studies;
    if case_studies.enabled {
        let months = case_studies
            .months
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",");
        plans.push(TriggerPlan {
            kind: TimerKind::CaseStudy,
            cron: format!(
                "0 {} {} {} {} *",
                case_studies.time.minute(),
                case_studies.time.hour(),
                case_studies.day_of_month,
                months
            ),
            gate: FireGate::Always,
        });
    }

    let contact = &config.client_contact;
    if contact.enabled {
        plans.push(TriggerPlan {
            kind: TimerKind::ClientContact,
            cron: weekly_cron(contact.time, &contact.active_days()),
            gate: contact.gate(),
        });
    }

    plans
}

/// The fixed-cadence due-reminder sweep
pub fn sweep_plan() -> TriggerPlan {
    TriggerPlan {
        kind: TimerKind::ReminderSweep,
        cron: REMINDER_SWEEP_CRON.to_string(),
        gate: FireGate::Always,
    }
}

fn weekly_cron(time: TimeOfDay, days: &[DayName]) -> String {
    let mut numbers: Vec<u32> = days.iter().map(|d| d.cron_number()).collect();
    numbers.sort_unstable();
    numbers.dedup();

    let days = numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",");

    format!("0 {} {} * * {}", time.minute(), time.hour(), days)
}
