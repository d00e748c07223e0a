//! iCalendar events (`BEGIN:VEVENT`, bare or inside `VCALENDAR`).

use super::grammar::{component_lines, ContentLine};
use crate::payload::{CalendarEvent, EventTime, Field, ParsedPayload, PayloadData};
use chrono::{NaiveDate, NaiveDateTime};

/// Parses the first `VEVENT` block, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let lines = component_lines(text, "VEVENT")?;

    let text_of = |name: &str| -> Option<String> {
        lines
            .iter()
            .filter(|l| l.is(name))
            .map(ContentLine::text)
            .find(|v| !v.is_empty())
    };

    let event = CalendarEvent {
        summary: text_of("SUMMARY"),
        location: text_of("LOCATION"),
        start: text_of("DTSTART").map(|raw| parse_time(&raw)),
        end: text_of("DTEND").map(|raw| parse_time(&raw)),
        description: text_of("DESCRIPTION"),
    };

    let mut fields = Vec::new();
    if let Some(summary) = &event.summary {
        fields.push(Field::new("Event", summary.clone()));
    }
    if let Some(start) = &event.start {
        fields.push(Field::new("Starts", display_time(start)));
    }
    if let Some(end) = &event.end {
        fields.push(Field::new("Ends", display_time(end)));
    }
    if let Some(location) = &event.location {
        fields.push(Field::new("Location", location.clone()));
    }
    if let Some(description) = &event.description {
        fields.push(Field::new("Description", description.clone()));
    }

    let summary = match (&event.summary, &event.start) {
        (Some(title), Some(start)) => format!("{} ({})", title, display_time(start)),
        (Some(title), None) => title.clone(),
        (None, Some(start)) => format!("Event on {}", display_time(start)),
        (None, None) => "Calendar event".to_string(),
    };

    Some(ParsedPayload::new(
        text,
        "Calendar event",
        summary,
        fields,
        PayloadData::CalendarEvent(event),
    ))
}

/// Parses basic-format `DATE` and `DATE-TIME` values; anything else is
/// kept raw only.
fn parse_time(raw: &str) -> EventTime {
    let value = raw.trim();
    let (value, utc) = match value.strip_suffix(['Z', 'z']) {
        Some(stripped) => (stripped, true),
        None => (value, false),
    };

    let parsed = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y%m%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    EventTime {
        raw: raw.trim().to_string(),
        parsed,
        utc: utc && parsed.is_some(),
    }
}

fn display_time(time: &EventTime) -> String {
    match time.parsed {
        Some(dt) if time.utc => format!("{} UTC", dt.format("%Y-%m-%d %H:%M")),
        Some(dt) if time.raw.len() == 8 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => time.raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> CalendarEvent {
        match parse(text).unwrap().data() {
            PayloadData::CalendarEvent(event) => event.clone(),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_event_inside_calendar() {
        let text = "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nSUMMARY:Team sync\nLOCATION:Room 4\\, 2nd floor\nDTSTART:20240315T090000Z\nDTEND;TZID=Europe/Berlin:20240315T100000\nDESCRIPTION:Weekly\\nstatus\nEND:VEVENT\nEND:VCALENDAR";
        let e = event(text);
        assert_eq!(e.summary.as_deref(), Some("Team sync"));
        assert_eq!(e.location.as_deref(), Some("Room 4, 2nd floor"));
        assert_eq!(e.description.as_deref(), Some("Weekly\nstatus"));

        let start = e.start.unwrap();
        assert!(start.utc);
        assert_eq!(
            start.parsed.unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2024-03-15 09:00"
        );
        let end = e.end.unwrap();
        assert!(!end.utc);
        assert_eq!(end.raw, "20240315T100000");
    }

    #[test]
    fn test_bare_event_with_folded_summary() {
        let e = event("BEGIN:VEVENT\nSUMMARY:Launch\n  party\nDTSTART;VALUE=DATE:20241231\nEND:VEVENT");
        assert_eq!(e.summary.as_deref(), Some("Launchparty"));
        assert!(e.start.unwrap().parsed.is_some());
    }

    #[test]
    fn test_unparsable_time_kept_raw() {
        let e = event("BEGIN:VEVENT\nDTSTART:next tuesday\nEND:VEVENT");
        let start = e.start.unwrap();
        assert_eq!(start.raw, "next tuesday");
        assert!(start.parsed.is_none());
    }

    #[test]
    fn test_summary_line() {
        let payload =
            parse("BEGIN:VEVENT\nSUMMARY:Demo\nDTSTART:20240101T120000Z\nEND:VEVENT").unwrap();
        assert_eq!(payload.summary(), "Demo (2024-01-01 12:00 UTC)");
    }

    #[test]
    fn test_declines_calendar_without_event() {
        assert!(parse("BEGIN:VCALENDAR\nEND:VCALENDAR").is_none());
    }
}
