//! Application configuration constants
//!
//! Central location for cadence values, reminder windows, retention limits
//! and validation boundaries used throughout the calendar.

// ===== Reminder Sweep =====

/// Cron expression for the due-reminder sweep (every 30 minutes, seconds first)
pub const REMINDER_SWEEP_CRON: &str = "0 */30 * * * *";

/// Look-ahead window for reminder delivery in hours.
/// Events due further out than this are left for a later sweep.
pub const REMINDER_WINDOW_HOURS: i64 = 24;

// ===== Event Generation =====

/// Days ahead that LinkedIn events are pre-populated for
pub const LINKEDIN_HORIZON_DAYS: i64 = 30;

/// Number of upcoming client-contact occurrences generated per run
pub const CLIENT_CONTACT_OCCURRENCES: usize = 5;

/// Events due longer ago than this are dropped on regeneration unless completed
pub const RETENTION_DAYS: i64 = 7;

/// Calendar events exported to ICS/Google Calendar span one hour
pub const EXPORT_EVENT_DURATION_MINUTES: i64 = 60;

// ===== Schedule Validation Limits =====

/// Highest allowed day-of-month. 28 exists in every month.
pub const MAX_DAY_OF_MONTH: u32 = 28;

/// Lowest allowed day-of-month
pub const MIN_DAY_OF_MONTH: u32 = 1;

// ===== Defaults =====

pub const DEFAULT_LINKEDIN_TIME: &str = "09:00";
pub const DEFAULT_BLOG_TIME: &str = "10:00";
pub const DEFAULT_BLOG_DAY_OF_MONTH: u32 = 1;
pub const DEFAULT_CASE_STUDY_MONTHS: &[u32] = &[1, 4, 7, 10];
pub const DEFAULT_CASE_STUDY_DAY_OF_MONTH: u32 = 15;
pub const DEFAULT_CASE_STUDY_TIME: &str = "11:00";
pub const DEFAULT_CLIENT_CONTACT_TIME: &str = "14:00";

/// Fallback base URL for links embedded in reminder emails
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Fallback timezone label shown in reminder emails
pub const DEFAULT_TIMEZONE_LABEL: &str = "America/Chicago";

/// Domain used in exported ICS UIDs
pub const DEFAULT_CALENDAR_DOMAIN: &str = "agency.local";

/// Default SMTP submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;
