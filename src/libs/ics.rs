//! Calendar invite generation.
//!
//! Builds the minimal all-day VCALENDAR payload attached to approval
//! emails. Pure text assembly, no side effects.

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

/// Creates a basic all-day ICS event covering `start_date..=end_date`.
/// The end date is inclusive here; the ICS `DTEND` field is exclusive, so
/// one day is added on the way out.
pub fn generate_ics_content(start_date: NaiveDate, end_date: NaiveDate, summary: &str, description: Option<&str>) -> String {
    let dtend = end_date + Duration::days(1);
    let uid = format!("{}@leavedesk", Uuid::new_v4());
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Leavedesk//EN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("DTSTAMP:{}", dtstamp),
        format!("DTSTART;VALUE=DATE:{}", start_date.format("%Y%m%d")),
        format!("DTEND;VALUE=DATE:{}", dtend.format("%Y%m%d")),
        format!("SUMMARY:{}", summary),
    ];

    if let Some(description) = description {
        lines.push(format!("DESCRIPTION:{}", description));
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    lines.join("\r\n")
}
