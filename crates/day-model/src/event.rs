//! Event records fed into the density aggregator.
//!
//! Events are loaded from either a JSON array or JSONL (one object per
//! line). Only the timestamp is interpreted; every other field is carried
//! through untouched so hosts can show it next to a selected day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Raw ISO-8601 timestamp as supplied by the host.
    ///
    /// Missing or non-string values load as unparsable text rather than
    /// failing the whole file.
    #[serde(alias = "created_at", default, deserialize_with = "lenient_timestamp")]
    pub timestamp: String,

    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Optional display rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Any other fields, passed through unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(raw) => raw,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A timestamp after parsing, before it is pinned to a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// An absolute instant carrying its own UTC offset.
    Instant(DateTime<FixedOffset>),
    /// A wall-clock time with no offset; read in the local reference zone.
    Local(NaiveDateTime),
    /// A bare date; already a calendar day.
    Date(NaiveDate),
}

impl Event {
    /// Create an event with only a timestamp.
    pub fn at(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            name: None,
            rating: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse the raw timestamp. Returns `None` if no supported form matches.
    pub fn parse_timestamp(&self) -> Option<ParsedTimestamp> {
        parse_timestamp(&self.timestamp)
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp in any of the supported shapes.
///
/// Accepted: RFC 3339 with offset or `Z`, naive date-times (`T` or space
/// separated, optional seconds and fraction), and bare `YYYY-MM-DD` dates.
pub fn parse_timestamp(raw: &str) -> Option<ParsedTimestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedTimestamp::Instant(instant));
    }
    // RFC 3339 demands a `T`; hosts often write a space instead.
    if let Ok(instant) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ParsedTimestamp::Instant(instant));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ParsedTimestamp::Local(naive));
        }
    }

    if raw.len() == 10 {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(ParsedTimestamp::Date(date));
        }
    }

    None
}

/// Parse events from a JSON array or from JSONL content.
///
/// JSONL input skips blank lines and lines starting with `#`.
pub fn parse_events(content: &str) -> Result<Vec<Event>, serde_json::Error> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed);
    }

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[Event]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        match parse_timestamp("2024-03-01T23:30:00-05:00") {
            Some(ParsedTimestamp::Instant(dt)) => {
                assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
        assert!(matches!(
            parse_timestamp("2024-03-01T10:00:00.123Z"),
            Some(ParsedTimestamp::Instant(_))
        ));
    }

    #[test]
    fn test_parse_naive_and_date_forms() {
        assert!(matches!(
            parse_timestamp("2024-03-01T10:00:00"),
            Some(ParsedTimestamp::Local(_))
        ));
        assert!(matches!(
            parse_timestamp("2024-03-01 10:00"),
            Some(ParsedTimestamp::Local(_))
        ));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(ParsedTimestamp::Date(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
            ))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
        assert_eq!(parse_timestamp("2024-13-01T00:00:00Z"), None);
    }

    #[test]
    fn test_passthrough_fields_survive() {
        let raw = r#"{"created_at":"2024-03-01T10:00:00Z","name":"Espresso","rating":4.5,"venue":"Corner"}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.timestamp, "2024-03-01T10:00:00Z");
        assert_eq!(event.name.as_deref(), Some("Espresso"));
        assert_eq!(event.rating, Some(4.5));
        assert_eq!(event.extra.get("venue").and_then(|v| v.as_str()), Some("Corner"));
    }

    #[test]
    fn test_parse_events_jsonl_and_array() {
        let jsonl = "# exported\n{\"timestamp\":\"2024-01-01\"}\n\n{\"timestamp\":\"bad\"}\n";
        let events = parse_events(jsonl).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].timestamp, "bad");

        let array = r#"[{"timestamp":"2024-01-01"},{"timestamp":"2024-01-02","name":"x"}]"#;
        let events = parse_events(array).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].name.as_deref(), Some("x"));
    }

    #[test]
    fn test_non_string_timestamps_do_not_abort_loading() {
        let jsonl = concat!(
            "{\"timestamp\":\"2024-03-01\"}\n",
            "{\"timestamp\":null,\"name\":\"null\"}\n",
            "{\"timestamp\":1709251200}\n",
            "{\"name\":\"no timestamp\"}\n",
            "{\"timestamp\":{\"at\":\"2024-03-01\"}}\n",
        );
        let events = parse_events(jsonl).unwrap();
        assert_eq!(events.len(), 5);
        assert!(events[0].parse_timestamp().is_some());
        assert_eq!(events[1].timestamp, "");
        assert_eq!(events[1].name.as_deref(), Some("null"));
        assert_eq!(events[2].timestamp, "1709251200");
        assert_eq!(events[3].timestamp, "");
        assert_eq!(events[3].name.as_deref(), Some("no timestamp"));
        for event in &events[1..] {
            assert_eq!(event.parse_timestamp(), None);
        }

        let array = r#"[{"timestamp":null},{"created_at":42.5}]"#;
        let events = parse_events(array).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.parse_timestamp().is_none()));
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let events = vec![
            Event::at("2024-01-01T08:00:00Z").with_name("a"),
            Event::at("2024-01-02"),
        ];
        let jsonl = serialize_events(&events).unwrap();
        assert_eq!(parse_events(&jsonl).unwrap(), events);
    }
}
