//! Calendar export
//!
//! Formats events as an ICS feed or a Google Calendar deep link. Every
//! exported event spans one hour from its due time.

use crate::config::EXPORT_EVENT_DURATION_MINUTES;
use crate::store::CalendarEvent;
use chrono::{DateTime, Duration, Utc};

const GOOGLE_CALENDAR_URL: &str = "https://calendar.google.com/calendar/render";
const PRODID: &str = "-//Agency Content Calendar//EN";

fn window(event: &CalendarEvent) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = event.due_date;
    (start, start + Duration::minutes(EXPORT_EVENT_DURATION_MINUTES))
}

fn ics_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Deep link that opens a pre-filled "new event" form
pub fn google_calendar_link(event: &CalendarEvent, location: &str) -> String {
    let (start, end) = window(event);
    format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&details={}&location={}&sf=true&output=xml",
        GOOGLE_CALENDAR_URL,
        urlencoding::encode(&event.title),
        ics_timestamp(start),
        ics_timestamp(end),
        urlencoding::encode(&event.description),
        urlencoding::encode(location),
    )
}

/// Emit an ICS calendar with one VEVENT per event.
///
/// Notes:
/// - All timestamps are UTC.
/// - UIDs are `{id}@{domain}`, stable across exports.
/// - Lines end in CRLF.
pub fn events_to_ics(events: &[CalendarEvent], domain: &str, stamp: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    let dtstamp = ics_timestamp(stamp);
    for event in events {
        let (start, end) = window(event);
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@{}", event.id, domain));
        lines.push(format!("DTSTAMP:{}", dtstamp));
        lines.push(format!("DTSTART:{}", ics_timestamp(start)));
        lines.push(format!("DTEND:{}", ics_timestamp(end)));
        lines.push(format!("SUMMARY:{}", escape_ics(&event.title)));
        lines.push(format!("DESCRIPTION:{}", escape_ics(&event.description)));
        lines.push("STATUS:CONFIRMED".to_string());
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\r', "")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
