//! The RFC 5545 iCalendar serializer. No `icalendar` crate appears
//! anywhere in the retrieval pack, so this is hand-rolled fixed-format text
//! assembly, in the spirit of `rhorizons::major_bodies::MajorBody::try_from`
//! and `rhorizons::ephemeris`'s own hand-written parsers/formatters;
//! `chrono`/`chrono-tz` supply the timestamp formatting and the one
//! authoritative `America/New_York` VTIMEZONE's DST rule.

use crate::event::Event;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const PRODID: &str = "-//caelundas//astronomical event engine//EN";

/// `YYYYMMDDTHHmmss`, no separators.
fn format_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%S").to_string()
}

fn format_local_stamp(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y%m%dT%H%M%S").to_string()
}

/// `<summary>::<description>::<start>[::<end> if end != start]`, a
/// deterministic function of the event's identity fields plus its span,
/// so re-serializing the same event always yields the same UID.
fn uid(event: &Event) -> String {
    if event.start == event.end {
        format!("{}::{}::{}", event.summary, event.description, format_stamp(event.start))
    } else {
        format!(
            "{}::{}::{}::{}",
            event.summary,
            event.description,
            format_stamp(event.start),
            format_stamp(event.end)
        )
    }
}

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

fn write_event(out: &mut String, event: &Event, tz: Tz, tzid: &str, generated_at: DateTime<Utc>) {
    out.push_str("BEGIN:VEVENT\r\n");
    out.push_str(&format!("UID:{}\r\n", uid(event)));
    out.push_str(&format!("DTSTAMP:{}Z\r\n", format_stamp(generated_at)));
    out.push_str(&format!("DTSTART;TZID={}:{}\r\n", tzid, format_local_stamp(event.start, tz)));
    out.push_str(&format!("DTEND;TZID={}:{}\r\n", tzid, format_local_stamp(event.end, tz)));
    out.push_str(&format!("SUMMARY:{}\r\n", escape_text(&event.summary)));
    out.push_str(&format!("DESCRIPTION:{}\r\n", escape_text(&event.description)));
    out.push_str("STATUS:CONFIRMED\r\n");
    out.push_str("CLASS:PUBLIC\r\n");
    out.push_str("TRANSP:TRANSPARENT\r\n");
    out.push_str(&format!("CATEGORIES:{}\r\n", event.categories.join(",")));
    out.push_str("SEQUENCE:0\r\n");
    out.push_str(&format!("LAST-MODIFIED:{}Z\r\n", format_stamp(generated_at)));
    out.push_str(&format!("CREATED:{}Z\r\n", format_stamp(generated_at)));
    out.push_str("END:VEVENT\r\n");
}

/// `America/New_York` is the one zone with a full `VTIMEZONE` including
/// EST/EDT standard/daylight `RRULE`s. Every other
/// zone gets a bare stub carrying only its `TZID`.
fn write_vtimezone(out: &mut String, tz: Tz, tzid: &str) {
    out.push_str("BEGIN:VTIMEZONE\r\n");
    out.push_str(&format!("TZID:{}\r\n", tzid));
    if tz == chrono_tz::America::New_York {
        out.push_str("BEGIN:STANDARD\r\n");
        out.push_str("DTSTART:19701101T020000\r\n");
        out.push_str("RRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=1SU\r\n");
        out.push_str("TZOFFSETFROM:-0400\r\n");
        out.push_str("TZOFFSETTO:-0500\r\n");
        out.push_str("TZNAME:EST\r\n");
        out.push_str("END:STANDARD\r\n");
        out.push_str("BEGIN:DAYLIGHT\r\n");
        out.push_str("DTSTART:19700308T020000\r\n");
        out.push_str("RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=2SU\r\n");
        out.push_str("TZOFFSETFROM:-0500\r\n");
        out.push_str("TZOFFSETTO:-0400\r\n");
        out.push_str("TZNAME:EDT\r\n");
        out.push_str("END:DAYLIGHT\r\n");
    }
    out.push_str("END:VTIMEZONE\r\n");
}

pub struct CalendarMeta {
    pub calname: String,
    pub caldesc: Option<String>,
    pub tz: Tz,
}

/// Emits a full `VCALENDAR` document for `events`, generated at
/// `generated_at` (the run's wall-clock time, used for every `DTSTAMP`/
/// `LAST-MODIFIED`/`CREATED`).
pub fn serialize(events: &[Event], meta: &CalendarMeta, generated_at: DateTime<Utc>) -> String {
    let tzid = meta.tz.name();
    let mut out = String::new();
    out.push_str("BEGIN:VCALENDAR\r\n");
    out.push_str("VERSION:2.0\r\n");
    out.push_str(&format!("PRODID:{}\r\n", PRODID));
    out.push_str("CALSCALE:GREGORIAN\r\n");
    out.push_str("METHOD:PUBLISH\r\n");
    out.push_str(&format!("X-WR-CALNAME:{}\r\n", escape_text(&meta.calname)));
    if let Some(desc) = &meta.caldesc {
        out.push_str(&format!("X-WR-CALDESC:{}\r\n", escape_text(desc)));
    }
    out.push_str(&format!("X-WR-TIMEZONE:{}\r\n", tzid));
    write_vtimezone(&mut out, meta.tz, tzid);

    for event in events {
        write_event(&mut out, event, meta.tz, tzid, generated_at);
    }

    out.push_str("END:VCALENDAR\r\n");
    out
}
