//! Services module
//!
//! Calendar logic that coordinates between the schedule, the event store
//! and the outside world (mail, blog posts, calendar apps).

pub mod blog;
pub mod calendar;
pub mod drafts;
pub mod export;
pub mod generator;
pub mod mail;
pub mod reminders;
pub mod repurpose;
pub mod scheduler;
pub mod settings;
pub mod templates;

pub use blog::{BlogPost, BlogPostSource, InMemoryBlogPosts};
pub use calendar::ContentCalendar;
pub use drafts::DraftGenerator;
pub use generator::{EventGenerator, GenerationReport};
pub use mail::{mailer_from_settings, MailMessage, MailTransport, SimulatedMailer, SmtpMailer};
pub use reminders::{ReminderDispatcher, SweepReport};
pub use scheduler::{SchedulerService, TriggerContext};
pub use settings::{CalendarSettings, MailSettings, SettingsService};
