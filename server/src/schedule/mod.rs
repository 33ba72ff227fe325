//! Schedule configuration
//!
//! Cadence rules for each content type (LinkedIn, blog, case studies,
//! client contact). The structured configuration is the single source of
//! truth; cron expressions are derived from it on demand in [`cron`].

pub mod cron;
pub mod update;

pub use cron::{sweep_plan, trigger_plans, FireGate, TimerKind, TriggerPlan};
pub use update::{
    BlogUpdate, CaseStudyUpdate, ClientContactUpdate, LinkedInUpdate, ScheduleUpdate,
};

use crate::config::{
    DEFAULT_BLOG_DAY_OF_MONTH, DEFAULT_BLOG_TIME, DEFAULT_CASE_STUDY_DAY_OF_MONTH,
    DEFAULT_CASE_STUDY_MONTHS, DEFAULT_CASE_STUDY_TIME, DEFAULT_CLIENT_CONTACT_TIME,
    DEFAULT_LINKEDIN_TIME, MAX_DAY_OF_MONTH, MIN_DAY_OF_MONTH,
};
use crate::error::{AppError, Result};
use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weekday name as it appears in schedule configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayName {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayName {
    pub const BUSINESS_DAYS: [DayName; 5] = [
        DayName::Monday,
        DayName::Tuesday,
        DayName::Wednesday,
        DayName::Thursday,
        DayName::Friday,
    ];

    /// Numeric day-of-week used in cron expressions (Sunday = 0)
    pub fn cron_number(self) -> u32 {
        self.weekday().num_days_from_sunday()
    }

    pub fn weekday(self) -> Weekday {
        match self {
            DayName::Sunday => Weekday::Sun,
            DayName::Monday => Weekday::Mon,
            DayName::Tuesday => Weekday::Tue,
            DayName::Wednesday => Weekday::Wed,
            DayName::Thursday => Weekday::Thu,
            DayName::Friday => Weekday::Fri,
            DayName::Saturday => Weekday::Sat,
        }
    }

    pub fn is_business_day(self) -> bool {
        Self::BUSINESS_DAYS.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayName::Sunday => "Sunday",
            DayName::Monday => "Monday",
            DayName::Tuesday => "Tuesday",
            DayName::Wednesday => "Wednesday",
            DayName::Thursday => "Thursday",
            DayName::Friday => "Friday",
            DayName::Saturday => "Saturday",
        }
    }
}

impl From<Weekday> for DayName {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayName::Sunday,
            Weekday::Mon => DayName::Monday,
            Weekday::Tue => DayName::Tuesday,
            Weekday::Wed => DayName::Wednesday,
            Weekday::Thu => DayName::Thursday,
            Weekday::Fri => DayName::Friday,
            Weekday::Sat => DayName::Saturday,
        }
    }
}

impl FromStr for DayName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" => Ok(DayName::Sunday),
            "monday" => Ok(DayName::Monday),
            "tuesday" => Ok(DayName::Tuesday),
            "wednesday" => Ok(DayName::Wednesday),
            "thursday" => Ok(DayName::Thursday),
            "friday" => Ok(DayName::Friday),
            "saturday" => Ok(DayName::Saturday),
            other => Err(format!("'{}' is not a weekday name", other)),
        }
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 24-hour wall-clock time, serialized as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn naive(self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());

        if !well_formed {
            return Err(format!("'{}' is not in HH:MM format", s));
        }

        // Both halves are two ASCII digits at this point
        let hour: u32 = s[..2].parse().map_err(|_| format!("Invalid hour in '{}'", s))?;
        let minute: u32 = s[3..].parse().map_err(|_| format!("Invalid minute in '{}'", s))?;

        TimeOfDay::new(hour, minute)
            .ok_or_else(|| format!("'{}' is outside the 24-hour range", s))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

fn default_time(value: &str) -> TimeOfDay {
    // Compile-time constants from config.rs; a typo there is a programming error
    value.parse().unwrap_or(TimeOfDay(NaiveTime::MIN))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkedInFrequency {
    /// Every business day
    Daily,
    Weekly,
    Biweekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFrequency {
    /// Every business day
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

/// LinkedIn posting cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkedInSchedule {
    pub enabled: bool,
    pub days: Vec<DayName>,
    pub time: TimeOfDay,
    pub frequency: LinkedInFrequency,
}

impl Default for LinkedInSchedule {
    fn default() -> Self {
        Self {
            enabled: true,
            days: vec![DayName::Monday, DayName::Wednesday, DayName::Friday],
            time: default_time(DEFAULT_LINKEDIN_TIME),
            frequency: LinkedInFrequency::Weekly,
        }
    }
}

impl LinkedInSchedule {
    /// Weekdays this schedule fires on before the fire gate is applied
    pub fn active_days(&self) -> Vec<DayName> {
        match self.frequency {
            LinkedInFrequency::Daily => DayName::BUSINESS_DAYS.to_vec(),
            LinkedInFrequency::Weekly | LinkedInFrequency::Biweekly => self.days.clone(),
        }
    }

    pub fn gate(&self) -> FireGate {
        match self.frequency {
            LinkedInFrequency::Biweekly => FireGate::EvenWeeks,
            _ => FireGate::Always,
        }
    }
}

/// Blog publishing cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogSchedule {
    pub enabled: bool,
    pub day_of_month: u32,
    pub time: TimeOfDay,
    pub frequency: BlogFrequency,
}

impl Default for BlogSchedule {
    fn default() -> Self {
        Self {
            enabled: true,
            day_of_month: DEFAULT_BLOG_DAY_OF_MONTH,
            time: default_time(DEFAULT_BLOG_TIME),
            frequency: BlogFrequency::Monthly,
        }
    }
}

/// Case-study cadence: one per configured month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseStudySchedule {
    pub enabled: bool,
    pub months: Vec<u32>,
    pub day_of_month: u32,
    pub time: TimeOfDay,
}

impl Default for CaseStudySchedule {
    fn default() -> Self {
        Self {
            enabled: true,
            months: DEFAULT_CASE_STUDY_MONTHS.to_vec(),
            day_of_month: DEFAULT_CASE_STUDY_DAY_OF_MONTH,
            time: default_time(DEFAULT_CASE_STUDY_TIME),
        }
    }
}

/// Client-contact reminder cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientContactSchedule {
    pub enabled: bool,
    pub day: DayName,
    pub time: TimeOfDay,
    pub frequency: ContactFrequency,
}

impl Default for ClientContactSchedule {
    fn default() -> Self {
        Self {
            enabled: true,
            day: DayName::Friday,
            time: default_time(DEFAULT_CLIENT_CONTACT_TIME),
            frequency: ContactFrequency::Weekly,
        }
    }
}

impl ClientContactSchedule {
    pub fn active_days(&self) -> Vec<DayName> {
        match self.frequency {
            ContactFrequency::Daily => DayName::BUSINESS_DAYS.to_vec(),
            _ => vec![self.day],
        }
    }

    pub fn gate(&self) -> FireGate {
        match self.frequency {
            ContactFrequency::Biweekly => FireGate::EvenWeeks,
            ContactFrequency::Monthly => FireGate::FirstWeekOfMonth,
            _ => FireGate::Always,
        }
    }
}

/// Full content schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleConfig {
    #[serde(rename = "linkedIn")]
    pub linked_in: LinkedInSchedule,
    pub blog: BlogSchedule,
    pub case_studies: CaseStudySchedule,
    pub client_contact: ClientContactSchedule,
}

impl ScheduleConfig {
    /// Check every constraint, reporting the first offending field
    pub fn validate(&self) -> Result<()> {
        let linked_in = &self.linked_in;
        if linked_in.enabled && linked_in.days.is_empty() {
            return Err(AppError::validation(
                "linkedIn.days",
                "at least one day is required",
            ));
        }
        if let Some(day) = linked_in.days.iter().find(|d| !d.is_business_day()) {
            return Err(AppError::validation(
                "linkedIn.days",
                format!("{} is not a business day", day),
            ));
        }

        validate_day_of_month("blog.dayOfMonth", self.blog.day_of_month)?;

        let case_studies = &self.case_studies;
        if case_studies.enabled && case_studies.months.is_empty() {
            return Err(AppError::validation(
                "caseStudies.months",
                "at least one month is required",
            ));
        }
        if let Some(month) = case_studies.months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(AppError::validation(
                "caseStudies.months",
                format!("{} is not a month number between 1 and 12", month),
            ));
        }
        validate_day_of_month("caseStudies.dayOfMonth", case_studies.day_of_month)?;

        if !self.client_contact.day.is_business_day() {
            return Err(AppError::validation(
                "clientContact.day",
                format!("{} is not a business day", self.client_contact.day),
            ));
        }

        Ok(())
    }
}

fn validate_day_of_month(field: &str, day: u32) -> Result<()> {
    if !(MIN_DAY_OF_MONTH..=MAX_DAY_OF_MONTH).contains(&day) {
        return Err(AppError::validation(
            field,
            format!(
                "{} is outside {}..={}",
                day, MIN_DAY_OF_MONTH, MAX_DAY_OF_MONTH
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_parsing() {
        assert_eq!("09:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 0).unwrap());
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap().to_string(), "23:59");

        assert!("9:00".parse::<TimeOfDay>().is_err());
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("12-30".parse::<TimeOfDay>().is_err());
        assert!("+1:30".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_day_name_cron_numbers() {
        assert_eq!(DayName::Sunday.cron_number(), 0);
        assert_eq!(DayName::Monday.cron_number(), 1);
        assert_eq!(DayName::Saturday.cron_number(), 6);
        assert_eq!("wednesday".parse::<DayName>().unwrap(), DayName::Wednesday);
        assert!("Funday".parse::<DayName>().is_err());
    }

    #[test]
    fn test_default_schedule_is_valid() {
        let config = ScheduleConfig::default();
        config.validate().unwrap();

        assert_eq!(config.linked_in.time.to_string(), "09:00");
        assert_eq!(config.blog.day_of_month, 1);
        assert_eq!(config.case_studies.months, vec![1, 4, 7, 10]);
        assert_eq!(config.client_contact.day, DayName::Friday);
    }

    #[test]
    fn test_schedule_json_uses_camel_case_keys() {
        let json = serde_json::to_value(ScheduleConfig::default()).unwrap();

        assert_eq!(json["linkedIn"]["days"][0], "Monday");
        assert_eq!(json["linkedIn"]["time"], "09:00");
        assert_eq!(json["blog"]["dayOfMonth"], 1);
        assert_eq!(json["caseStudies"]["months"][1], 4);
        assert_eq!(json["clientContact"]["frequency"], "weekly");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ScheduleConfig =
            serde_json::from_str(r#"{"blog": {"dayOfMonth": 12}}"#).unwrap();

        assert_eq!(config.blog.day_of_month, 12);
        assert_eq!(config.blog.time.to_string(), "10:00");
        assert_eq!(config.linked_in, LinkedInSchedule::default());
    }

    #[test]
    fn test_validate_rejects_weekend_linkedin_day() {
        let mut config = ScheduleConfig::default();
        config.linked_in.days.push(DayName::Saturday);

        match config.validate() {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "linkedIn.days"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_day_of_month_29() {
        let mut config = ScheduleConfig::default();
        config.case_studies.day_of_month = 29;

        match config.validate() {
            Err(AppError::Validation { field, .. }) => {
                assert_eq!(field, "caseStudies.dayOfMonth")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_daily_frequency_uses_business_days() {
        let schedule = LinkedInSchedule {
            frequency: LinkedInFrequency::Daily,
            days: vec![DayName::Monday],
            ..LinkedInSchedule::default()
        };

        assert_eq!(schedule.active_days().len(), 5);
        assert_eq!(schedule.gate(), FireGate::Always);
    }
}
