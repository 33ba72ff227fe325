//! Partial schedule updates
//!
//! Every field is optional; omitted fields keep their current value.
//! An update is applied to a copy of the active schedule and validated as a
//! whole, so a rejected update never leaves a half-applied configuration.

use super::{
    BlogFrequency, ContactFrequency, DayName, LinkedInFrequency, ScheduleConfig, TimeOfDay,
};
use crate::error::{AppError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    #[serde(rename = "linkedIn")]
    pub linked_in: Option<LinkedInUpdate>,
    pub blog: Option<BlogUpdate>,
    pub case_studies: Option<CaseStudyUpdate>,
    pub client_contact: Option<ClientContactUpdate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInUpdate {
    pub enabled: Option<bool>,
    pub days: Option<Vec<String>>,
    pub time: Option<String>,
    pub frequency: Option<LinkedInFrequency>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogUpdate {
    pub enabled: Option<bool>,
    pub day_of_month: Option<u32>,
    pub time: Option<String>,
    pub frequency: Option<BlogFrequency>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyUpdate {
    pub enabled: Option<bool>,
    pub months: Option<Vec<u32>>,
    pub day_of_month: Option<u32>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContactUpdate {
    pub enabled: Option<bool>,
    pub day: Option<String>,
    pub time: Option<String>,
    pub frequency: Option<ContactFrequency>,
}

impl ScheduleConfig {
    /// Produce the schedule that results from applying `update`.
    ///
    /// `self` is never modified; the caller swaps the returned value in.
    pub fn apply(&self, update: &ScheduleUpdate) -> Result<ScheduleConfig> {
        let mut next = self.clone();

        if let Some(patch) = &update.linked_in {
            let target = &mut next.linked_in;
            if let Some(enabled) = patch.enabled {
                target.enabled = enabled;
            }
            if let Some(days) = &patch.days {
                target.days = parse_days("linkedIn.days", days)?;
            }
            if let Some(time) = &patch.time {
                target.time = parse_time("linkedIn.time", time)?;
            }
            if let Some(frequency) = patch.frequency {
                target.frequency = frequency;
            }
        }

        if let Some(patch) = &update.blog {
            let target = &mut next.blog;
            if let Some(enabled) = patch.enabled {
                target.enabled = enabled;
            }
            if let Some(day) = patch.day_of_month {
                target.day_of_month = day;
            }
            if let Some(time) = &patch.time {
                target.time = parse_time("blog.time", time)?;
            }
            if let Some(frequency) = patch.frequency {
                target.frequency = frequency;
            }
        }

        if let Some(patch) = &update.case_studies {
            let target = &mut next.case_studies;
            if let Some(enabled) = patch.enabled {
                target.enabled = enabled;
            }
            if let Some(months) = &patch.months {
                let mut months = months.clone();
                months.sort_unstable();
                months.dedup();
                target.months = months;
            }
            if let Some(day) = patch.day_of_month {
                target.day_of_month = day;
            }
            if let Some(time) = &patch.time {
                target.time = parse_time("caseStudies.time", time)?;
            }
        }

        if let Some(patch) = &update.client_contact {
            let target = &mut next.client_contact;
            if let Some(enabled) = patch.enabled {
                target.enabled = enabled;
            }
            if let Some(day) = &patch.day {
                target.day = day
                    .parse()
                    .map_err(|e: String| AppError::validation("clientContact.day", e))?;
            }
            if let Some(time) = &patch.time {
                target.time = parse_time("clientContact.time", time)?;
            }
            if let Some(frequency) = patch.frequency {
                target.frequency = frequency;
            }
        }

        next.validate()?;
        Ok(next)
    }
}

fn parse_days(field: &str, names: &[String]) -> Result<Vec<DayName>> {
    let mut days = names
        .iter()
        .map(|name| name.parse::<DayName>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AppError::validation(field, e))?;

    days.sort_unstable();
    days.dedup();
    Ok(days)
}

fn parse_time(field: &str, value: &str) -> Result<TimeOfDay> {
    value
        .parse()
        .map_err(|e: String| AppError::validation(field, e))
}
