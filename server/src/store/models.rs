//! Calendar models
//!
//! Rust structs representing calendar entities.
//! All models use serde for serialization to API callers.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of content an event reminds about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Linkedin,
    Blog,
    CaseStudy,
    ClientContact,
    Custom,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Linkedin => "linkedin",
            EventType::Blog => "blog",
            EventType::CaseStudy => "case-study",
            EventType::ClientContact => "client-contact",
            EventType::Custom => "custom",
        }
    }

    /// Key used to look up the reminder email template
    pub fn template_key(self) -> &'static str {
        match self {
            EventType::Linkedin => "linkedin",
            EventType::Blog => "blog",
            EventType::CaseStudy => "caseStudy",
            EventType::ClientContact => "clientContact",
            EventType::Custom => "custom",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            EventType::Linkedin => "LinkedIn Post",
            EventType::Blog => "Blog Post",
            EventType::CaseStudy => "Case Study",
            EventType::ClientContact => "Client Check-in",
            EventType::Custom => "Reminder",
        }
    }

    pub fn default_description(self) -> &'static str {
        match self {
            EventType::Linkedin => {
                "Share a recent project, client win or industry insight on LinkedIn."
            }
            EventType::Blog => "Publish this month's blog post and share it on social channels.",
            EventType::CaseStudy => {
                "Write up a recent client success as a case study with measurable results."
            }
            EventType::ClientContact => {
                "Reach out to past clients for reviews, testimonials and referrals."
            }
            EventType::Custom => "Scheduled marketing task.",
        }
    }
}

impl FromStr for EventType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(EventType::Linkedin),
            "blog" => Ok(EventType::Blog),
            "case-study" | "casestudy" => Ok(EventType::CaseStudy),
            "client-contact" | "clientcontact" => Ok(EventType::ClientContact),
            "custom" => Ok(EventType::Custom),
            _ => Err(AppError::UnsupportedContentType(s.to_string())),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::InProgress => "in-progress",
            EventStatus::Completed => "completed",
            EventStatus::Overdue => "overdue",
        }
    }

    /// Transitions a caller may request. Status only moves forward:
    /// completed is terminal, nothing returns to pending, and overdue is
    /// only assigned by the reminder sweep.
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        match (self, next) {
            (EventStatus::Completed, _) => false,
            (_, EventStatus::Pending | EventStatus::Overdue) => false,
            (current, next) => current != next,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label/value pair such as "Organic traffic" / "+140%"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Generated content skeleton attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ContentDraft {
    Linkedin {
        text: String,
        /// Slug of the blog post the text was derived from
        source_post: Option<String>,
    },
    Blog {
        title: String,
        outline: Vec<String>,
        keywords: Vec<String>,
    },
    CaseStudy {
        title: String,
        client: String,
        challenge: String,
        solution: String,
        results: Vec<Stat>,
    },
    ClientContact {
        subject: String,
        body: String,
    },
}

impl ContentDraft {
    pub fn event_type(&self) -> EventType {
        match self {
            ContentDraft::Linkedin { .. } => EventType::Linkedin,
            ContentDraft::Blog { .. } => EventType::Blog,
            ContentDraft::CaseStudy { .. } => EventType::CaseStudy,
            ContentDraft::ClientContact { .. } => EventType::ClientContact,
        }
    }

    /// Plain-text rendering for email previews
    pub fn preview(&self) -> String {
        match self {
            ContentDraft::Linkedin { text, .. } => text.clone(),
            ContentDraft::Blog {
                title,
                outline,
                keywords,
            } => {
                let mut out = format!("{}\n", title);
                for (i, section) in outline.iter().enumerate() {
                    out.push_str(&format!("{}. {}\n", i + 1, section));
                }
                if !keywords.is_empty() {
                    out.push_str(&format!("Keywords: {}", keywords.join(", ")));
                }
                out
            }
            ContentDraft::CaseStudy {
                title,
                client,
                challenge,
                solution,
                results,
            } => {
                let mut out = format!(
                    "{}\nClient: {}\nChallenge: {}\nSolution: {}\n",
                    title, client, challenge, solution
                );
                for stat in results {
                    out.push_str(&format!("- {}: {}\n", stat.label, stat.value));
                }
                out
            }
            ContentDraft::ClientContact { subject, body } => {
                format!("Subject: {}\n\n{}", subject, body)
            }
        }
    }
}

/// A reminder event on the content calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub due_date: DateTime<Utc>,
    pub status: EventStatus,
    pub draft: Option<ContentDraft>,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CalendarEvent {
    pub fn new(
        event_type: EventType,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            event_type,
            due_date,
            status: EventStatus::Pending,
            draft: None,
            reminder_sent: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Event with the standard title and description for its type
    pub fn scheduled(event_type: EventType, due_date: DateTime<Utc>) -> Self {
        Self::new(
            event_type,
            event_type.default_title(),
            event_type.default_description(),
            due_date,
        )
    }

    pub fn with_draft(mut self, draft: ContentDraft) -> Self {
        self.draft = Some(draft);
        self
    }
}

/// Create event request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_new_event_type")]
    pub event_type: EventType,
    pub due_date: DateTime<Utc>,
}

fn default_new_event_type() -> EventType {
    EventType::Custom
}
