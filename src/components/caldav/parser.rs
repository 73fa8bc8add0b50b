//! Best-effort scanner for the VEVENT text returned by a CalDAV `calendar-query`.
//!
//! This is not an iCalendar parser. It understands exactly the narrow shape the
//! REPORT response carries: `BEGIN:VEVENT`-delimited blocks of `NAME:VALUE` or
//! `NAME;PARAMS:VALUE` lines. Folded lines are not recognised.

use super::models::Event;
use crate::error::EventParseError;
use chrono::NaiveDate;
use std::iter::Skip;
use std::str::Split;
use tracing::{debug, warn};

/// Marker that starts every event block in the response
pub const EVENT_BOUNDARY: &str = "BEGIN:VEVENT";

const DATE_FORMAT: &str = "%Y%m%d";

/// Outcome of looking up one property in an event block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// Found and terminated by a newline; the value may be empty
    Present(&'a str),
    /// No line starts with the property name
    Absent,
    /// Found on the last line with no newline after it
    Unterminated,
}

impl<'a> Field<'a> {
    /// The value, or an empty string when the field is absent or unterminated
    pub fn as_str(&self) -> &'a str {
        match *self {
            Field::Present(value) => value,
            Field::Absent | Field::Unterminated => "",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }
}

/// Find the first line of `block` that starts with `property` followed by `:` or `;`
///
/// The value is everything after that one delimiter, so parameters stay in it:
/// `DTSTART;VALUE=DATE:20240115` yields `VALUE=DATE:20240115`.
pub fn extract_field<'a>(block: &'a str, property: &str) -> Field<'a> {
    let mut rest = block;

    loop {
        let (line, next) = match rest.find('\n') {
            Some(end) => (&rest[..end], Some(&rest[end + 1..])),
            None => (rest, None),
        };

        let value = line
            .strip_prefix(property)
            .and_then(|tail| tail.strip_prefix(|c: char| c == ':' || c == ';'));

        if let Some(value) = value {
            return match next {
                Some(_) => Field::Present(value.strip_suffix('\r').unwrap_or(value)),
                None => Field::Unterminated,
            };
        }

        match next {
            Some(next) => rest = next,
            None => return Field::Absent,
        }
    }
}

/// Split a raw response into event blocks, dropping the preamble before the first marker
pub fn split_event_blocks(response: &str) -> Skip<Split<'_, &'static str>> {
    response.split(EVENT_BOUNDARY).skip(1)
}

/// Interpret a DTSTART value of the form `[PARAMS:]YYYYMMDD...`
///
/// With parameters the date is the second `:` segment, otherwise the only one.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, EventParseError> {
    let mut segments = raw.split(':');
    let first = segments.next();
    let date_part = segments
        .next()
        .or(first)
        .and_then(|segment| segment.get(..8))
        .ok_or_else(|| EventParseError::MalformedStart {
            raw: raw.to_string(),
        })?;

    NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|source| {
        EventParseError::InvalidDate {
            raw: raw.to_string(),
            source,
        }
    })
}

/// Build an [`Event`] from one block
pub fn parse_event(block: &str) -> Result<Event, EventParseError> {
    let summary = extract_field(block, "SUMMARY");
    let raw_start = match extract_field(block, "DTSTART") {
        Field::Present(value) => value,
        Field::Absent => return Err(EventParseError::MissingStart),
        Field::Unterminated => return Err(EventParseError::UnterminatedStart),
    };

    let start_date = parse_start_date(raw_start)?;

    Ok(Event {
        summary: summary.as_str().to_string(),
        start_date,
        raw_start: raw_start.to_string(),
    })
}

/// Lazy sequence of the well-formed events in a response, see [`parse_events`]
#[derive(Debug, Clone)]
pub struct Events<'a> {
    blocks: Skip<Split<'a, &'static str>>,
    skipped: usize,
}

impl Events<'_> {
    /// Non-empty blocks dropped so far because they did not parse
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Events<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        for block in self.blocks.by_ref() {
            if block.trim().is_empty() {
                debug!("Skipping empty event block");
                continue;
            }

            match parse_event(block) {
                Ok(event) => return Some(event),
                Err(e) => {
                    warn!(
                        "Skipping event '{}': {}",
                        extract_field(block, "SUMMARY").as_str(),
                        e
                    );
                    self.skipped += 1;
                }
            }
        }
        None
    }
}

/// Lazily parse every well-formed event in `response`, in response order
///
/// Empty blocks are dropped silently; malformed ones are logged and counted.
pub fn parse_events(response: &str) -> Events<'_> {
    Events {
        blocks: split_event_blocks(response),
        skipped: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "<?xml version=\"1.0\"?>\r\n<d:multistatus>\r\n\
        BEGIN:VCALENDAR\r\n\
        BEGIN:VEVENT\r\n\
        UID:1\r\n\
        SUMMARY:Dentist\r\n\
        DTSTART;TZID=Europe/Helsinki:20240115T100000\r\n\
        END:VEVENT\r\n\
        BEGIN:VEVENT\r\n\
        SUMMARY:Broken\r\n\
        DTEND;VALUE=DATE:20240116\r\n\
        END:VEVENT\r\n\
        BEGIN:VEVENT\r\n\
        SUMMARY:Birthday\r\n\
        DTSTART;VALUE=DATE:20240122\r\n\
        END:VEVENT\r\n\
        BEGIN:VEVENT\r\n\
        SUMMARY:Standup\r\n\
        DTSTART:20240129T070000Z\r\n\
        END:VEVENT\r\n\
        END:VCALENDAR\r\n";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_field_present() {
        let block = "SUMMARY:Team lunch\nDTSTART:20240115T120000Z\n";
        assert_eq!(extract_field(block, "SUMMARY"), Field::Present("Team lunch"));
        assert_eq!(extract_field(block, "SUMMARY").as_str(), "Team lunch");
        assert_eq!(extract_field(block, "DTSTART").as_str(), "20240115T120000Z");
    }

    #[test]
    fn test_extract_field_parameterised_name() {
        let block = "DTSTART;TZID=Europe/Helsinki:20240115T100000\nDTEND;VALUE=DATE:20240116\n";
        assert_eq!(
            extract_field(block, "DTSTART"),
            Field::Present("TZID=Europe/Helsinki:20240115T100000")
        );
        assert_eq!(extract_field(block, "DTEND").as_str(), "VALUE=DATE:20240116");
    }

    #[test]
    fn test_extract_field_empty_value_is_present() {
        let field = extract_field("SUMMARY:\nUID:1\n", "SUMMARY");
        assert_eq!(field, Field::Present(""));
        assert!(field.is_present());
    }

    #[test]
    fn test_extract_field_absent() {
        let block = "UID:1\nDTSTART;VALUE=DATE:20240115\n";
        assert_eq!(extract_field(block, "SUMMARY"), Field::Absent);
        assert_eq!(extract_field(block, "SUMMARY").as_str(), "");
    }

    #[test]
    fn test_extract_field_unterminated_last_line() {
        let block = "UID:1\nSUMMARY:Cut off";
        assert_eq!(extract_field(block, "SUMMARY"), Field::Unterminated);
        assert_eq!(extract_field(block, "SUMMARY").as_str(), "");
    }

    #[test]
    fn test_extract_field_ignores_prefix_and_inline_matches() {
        let block = "DESCRIPTION:see SUMMARY:nothing\nSUMMARYX:wrong\nX-SUMMARY:also wrong\n";
        assert_eq!(extract_field(block, "SUMMARY"), Field::Absent);
    }

    #[test]
    fn test_extract_field_first_occurrence_wins() {
        let block = "SUMMARY:first\nSUMMARY:second\n";
        assert_eq!(extract_field(block, "SUMMARY").as_str(), "first");
    }

    #[test]
    fn test_extract_field_strips_carriage_return() {
        let block = "SUMMARY:Standup\r\nUID:1\r\n";
        assert_eq!(extract_field(block, "SUMMARY").as_str(), "Standup");
    }

    #[test]
    fn test_parse_start_date() {
        assert_eq!(parse_start_date("TZID=Europe/Helsinki:20240115T100000"), Ok(date(2024, 1, 15)));
        assert_eq!(parse_start_date("VALUE=DATE:20240122"), Ok(date(2024, 1, 22)));
        assert_eq!(parse_start_date("20240129T070000Z"), Ok(date(2024, 1, 29)));
        assert_eq!(parse_start_date("20240201"), Ok(date(2024, 2, 1)));
    }

    #[test]
    fn test_parse_start_date_rejects_bad_shapes() {
        assert!(matches!(
            parse_start_date(""),
            Err(EventParseError::MalformedStart { .. })
        ));
        assert!(matches!(
            parse_start_date("VALUE=DATE:2024"),
            Err(EventParseError::MalformedStart { .. })
        ));
        assert!(matches!(
            parse_start_date("VALUE=DATE:20241301"),
            Err(EventParseError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_start_date("VALUE=DATE:2024011X"),
            Err(EventParseError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_parse_event_rfc5545_start_forms() {
        let all_day = parse_event("\nSUMMARY:Holiday\nDTSTART;VALUE=DATE:20240115\n").unwrap();
        assert_eq!(all_day.start_date, date(2024, 1, 15));
        assert_eq!(all_day.raw_start, "VALUE=DATE:20240115");

        let zoned =
            parse_event("\nSUMMARY:Call\nDTSTART;TZID=Europe/Helsinki:20240115T100000\n").unwrap();
        assert_eq!(zoned.start_date, date(2024, 1, 15));

        let utc = parse_event("\nSUMMARY:Sync\nDTSTART:20240115T100000Z\n").unwrap();
        assert_eq!(utc.start_date, date(2024, 1, 15));
        assert_eq!(utc.raw_start, "20240115T100000Z");
    }

    #[test]
    fn test_parse_event_errors() {
        assert_eq!(
            parse_event("\nSUMMARY:No start\n"),
            Err(EventParseError::MissingStart)
        );
        assert_eq!(
            parse_event("\nSUMMARY:Cut\nDTSTART;VALUE=DATE:20240115"),
            Err(EventParseError::UnterminatedStart)
        );
    }

    #[test]
    fn test_parse_event_without_summary() {
        let event = parse_event("\nDTSTART;VALUE=DATE:20240115\n").unwrap();
        assert_eq!(event.summary, "");
        assert_eq!(event.raw_start, "VALUE=DATE:20240115");
    }

    #[test]
    fn test_split_event_blocks_drops_preamble() {
        assert_eq!(split_event_blocks("no events here").count(), 0);
        assert_eq!(split_event_blocks("").count(), 0);
        assert_eq!(split_event_blocks(RESPONSE).count(), 4);
    }

    #[test]
    fn test_parse_events_keeps_well_formed_in_order() {
        let mut parsed = parse_events(RESPONSE);
        let events: Vec<Event> = parsed.by_ref().collect();

        assert_eq!(events.len(), 3);
        assert_eq!(parsed.skipped(), 1);
        assert_eq!(events[0].summary, "Dentist");
        assert_eq!(events[0].start_date, date(2024, 1, 15));
        assert_eq!(events[0].raw_start, "TZID=Europe/Helsinki:20240115T100000");
        assert_eq!(events[1].summary, "Birthday");
        assert_eq!(events[1].start_date, date(2024, 1, 22));
        assert_eq!(events[2].summary, "Standup");
        assert_eq!(events[2].start_date, date(2024, 1, 29));
    }

    #[test]
    fn test_parse_events_skips_empty_blocks_without_counting() {
        let response = "BEGIN:VEVENTBEGIN:VEVENT\n\nBEGIN:VEVENT\nSUMMARY:A\nDTSTART;VALUE=DATE:20240101\n";
        let mut parsed = parse_events(response);
        let events: Vec<Event> = parsed.by_ref().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "A");
        assert_eq!(parsed.skipped(), 0);
    }

    #[test]
    fn test_parse_events_is_repeatable() {
        let first: Vec<Event> = parse_events(RESPONSE).collect();
        let second: Vec<Event> = parse_events(RESPONSE).collect();
        assert_eq!(first, second);
    }
}
