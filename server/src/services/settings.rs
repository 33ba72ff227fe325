//! Settings service
//!
//! Environment-driven runtime settings, plus the optional JSON schedule
//! file that overrides the built-in cadence at startup.

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_CALENDAR_DOMAIN, DEFAULT_SMTP_PORT, DEFAULT_TIMEZONE_LABEL,
};
use crate::error::{AppError, Result};
use crate::schedule::ScheduleConfig;
use std::path::PathBuf;
use tokio::fs;

/// SMTP delivery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub to: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_SMTP_PORT,
            secure: false,
            user: None,
            password: None,
            from: format!("calendar@{}", DEFAULT_CALENDAR_DOMAIN),
            to: format!("marketing@{}", DEFAULT_CALENDAR_DOMAIN),
        }
    }
}

impl MailSettings {
    /// Username and password, if both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }

    /// Without credentials the dispatcher only simulates delivery
    pub fn is_simulated(&self) -> bool {
        self.credentials().is_none()
    }
}

/// Runtime settings for the calendar service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSettings {
    /// Base URL for links embedded in reminder emails
    pub base_url: String,
    /// Display label only; date math uses the local clock
    pub timezone_label: String,
    /// Domain used in ICS UIDs
    pub calendar_domain: String,
    /// Optional JSON file overriding the default schedule
    pub schedule_path: Option<PathBuf>,
    pub mail: MailSettings,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timezone_label: DEFAULT_TIMEZONE_LABEL.to_string(),
            calendar_domain: DEFAULT_CALENDAR_DOMAIN.to_string(),
            schedule_path: None,
            mail: MailSettings::default(),
        }
    }
}

impl CalendarSettings {
    /// Read settings from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match get("SMTP_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid SMTP_PORT '{}'", raw);
                DEFAULT_SMTP_PORT
            }),
            None => DEFAULT_SMTP_PORT,
        };

        let mail = MailSettings {
            host: get("SMTP_HOST").unwrap_or(defaults.mail.host),
            port,
            secure: get("SMTP_SECURE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            user: get("SMTP_USER"),
            password: get("SMTP_PASS"),
            from: get("EMAIL_FROM").unwrap_or(defaults.mail.from),
            to: get("EMAIL_TO").unwrap_or(defaults.mail.to),
        };

        Self {
            base_url: get("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timezone_label: get("TIMEZONE").unwrap_or(defaults.timezone_label),
            calendar_domain: get("CALENDAR_DOMAIN").unwrap_or(defaults.calendar_domain),
            schedule_path: get("CALENDAR_SCHEDULE_PATH").map(PathBuf::from),
            mail,
        }
    }
}

/// Loads the startup schedule
#[derive(Clone)]
pub struct SettingsService {
    schedule_path: Option<PathBuf>,
}

impl SettingsService {
    pub fn new(schedule_path: Option<PathBuf>) -> Self {
        Self { schedule_path }
    }

    /// Load the schedule file, or the defaults if there is none
    pub async fn load_schedule(&self) -> Result<ScheduleConfig> {
        let Some(path) = &self.schedule_path else {
            tracing::info!("No schedule file configured, using default schedule");
            return Ok(ScheduleConfig::default());
        };

        if !path.exists() {
            tracing::info!("Schedule file {:?} not found, using default schedule", path);
            return Ok(ScheduleConfig::default());
        }

        let content = fs::read_to_string(path).await?;
        let schedule: ScheduleConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse schedule: {}", e)))?;
        schedule.validate()?;

        tracing::info!("Schedule loaded from {:?}", path);
        Ok(schedule)
    }
}
