//! Calendar reminder export.
//!
//! Produces a single-event iCalendar document that standard calendar
//! readers import as a reminder to follow up on the referral link.

use chrono::{DateTime, Duration, Utc};

/// Suggested file name for the downloaded document.
pub const REMINDER_FILE_NAME: &str = "talent-wharf-reminder.ics";

const DEFAULT_TITLE: &str = "Follow up on Talent Wharf referral";
const DEFAULT_DESCRIPTION: &str = "Check if anyone has used your Talent Wharf referral link";
const PRODID: &str = "-//Talent Wharf//Reminder//EN";
const UID_DOMAIN: &str = "talentwharf.com";

/// A reminder event, rendered with [`ReminderEvent::to_ics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEvent {
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub starts_at: DateTime<Utc>,
}

impl ReminderEvent {
    /// The referral follow-up reminder, starting `hours` after `now`.
    pub fn referral_follow_up(now: DateTime<Utc>, hours: i64) -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_DESCRIPTION, now, hours)
    }

    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
        hours: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            created_at: now,
            starts_at: now + Duration::hours(hours),
        }
    }

    /// Render as an iCalendar document with CRLF line endings.
    pub fn to_ics(&self) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODID}"),
            "BEGIN:VEVENT".to_string(),
            format!(
                "UID:tw-reminder-{}@{UID_DOMAIN}",
                self.created_at.timestamp_millis()
            ),
            format!("DTSTAMP:{}", ics_timestamp(self.created_at)),
            format!("DTSTART:{}", ics_timestamp(self.starts_at)),
            format!("SUMMARY:{}", escape_text(&self.title)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            "STATUS:CONFIRMED".to_string(),
            "SEQUENCE:0".to_string(),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];
        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }
}

fn ics_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value (backslash, semicolon, comma, newline).
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
