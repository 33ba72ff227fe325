//! Reminder email templates
//!
//! One template per known content type, looked up by the event's template
//! key. Custom events have no template.

use crate::store::CalendarEvent;

/// Per-type wording of a reminder email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject_prefix: &'static str,
    pub heading: &'static str,
    pub call_to_action: &'static str,
}

pub fn template_for(key: &str) -> Option<EmailTemplate> {
    match key {
        "linkedin" => Some(EmailTemplate {
            subject_prefix: "LinkedIn post due",
            heading: "Time to post on LinkedIn",
            call_to_action: "Review the draft below, adjust the tone and publish it from the company page.",
        }),
        "blog" => Some(EmailTemplate {
            subject_prefix: "Blog post due",
            heading: "This month's blog post is due",
            call_to_action: "Finish the outline, add images and publish it through the admin dashboard.",
        }),
        "caseStudy" => Some(EmailTemplate {
            subject_prefix: "Case study due",
            heading: "Time for a new case study",
            call_to_action: "Pick a recent client win, collect the numbers and fill in the case-study skeleton.",
        }),
        "clientContact" => Some(EmailTemplate {
            subject_prefix: "Client check-in",
            heading: "Reach out to past clients",
            call_to_action: "Send a short check-in and ask happy clients for a review or referral.",
        }),
        _ => None,
    }
}

/// Values shared by every rendered reminder
#[derive(Debug, Clone)]
pub struct EmailContext<'a> {
    pub base_url: &'a str,
    pub timezone_label: &'a str,
}

/// Render the subject and HTML body for `event`
pub fn render_reminder(
    template: &EmailTemplate,
    event: &CalendarEvent,
    ctx: &EmailContext<'_>,
) -> (String, String) {
    let subject = format!("{}: {}", template.subject_prefix, event.title);
    let due = event.due_date.format("%A, %B %-d at %H:%M UTC");
    let dashboard = format!("{}/admin/content-calendar", ctx.base_url);

    let mut html = String::new();
    html.push_str("<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\n");
    html.push_str(&format!("<h2>{}</h2>\n", escape_html(template.heading)));
    html.push_str(&format!(
        "<p><strong>{}</strong></p>\n<p>{}</p>\n",
        escape_html(&event.title),
        escape_html(&event.description)
    ));
    html.push_str(&format!(
        "<p>Due: {} ({})</p>\n",
        due,
        escape_html(ctx.timezone_label)
    ));
    html.push_str(&format!("<p>{}</p>\n", escape_html(template.call_to_action)));

    if let Some(draft) = &event.draft {
        html.push_str(&format!(
            "<h3>Draft</h3>\n<pre style=\"white-space: pre-wrap;\">{}</pre>\n",
            escape_html(&draft.preview())
        ));
    }

    html.push_str(&format!(
        "<p><a href=\"{0}\">Open the content calendar</a></p>\n</div>\n",
        escape_html(&dashboard)
    ));

    (subject, html)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
