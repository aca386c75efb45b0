//! Normalization of raw provider payloads into canonical lyric lines.
//!
//! Providers disagree on field names and on whether timestamps arrive as
//! strings or numbers. Everything here is tolerant: malformed input yields
//! fewer lines (or none), never an error.

use crate::engine::document::LyricLine;
use serde_json::Value;

/// Alternate field names for the line text, in lookup order.
const TEXT_FIELDS: [&str; 3] = ["words", "text", "lyrics"];
/// Alternate field names for the line timestamp, in lookup order.
const TIME_FIELDS: [&str; 5] = ["startTimeMs", "startTime", "time", "t", "offset"];

/// Convert an untyped payload into an ordered sequence of lyric lines.
///
/// Non-array input yields an empty sequence. Records with blank text are
/// dropped entirely; records with unusable timestamps keep their text and
/// lose only the timing.
pub fn normalize(raw: &Value) -> Vec<LyricLine> {
    let Some(records) = raw.as_array() else {
        return Vec::new();
    };
    records.iter().filter_map(normalize_record).collect()
}

fn normalize_record(record: &Value) -> Option<LyricLine> {
    let text = first_present(record, &TEXT_FIELDS).and_then(text_value)?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let time_ms = first_present(record, &TIME_FIELDS).and_then(time_value);
    Some(LyricLine::new(text, time_ms))
}

fn first_present<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .find_map(|f| record.get(f))
        .filter(|v| !v.is_null())
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Timestamps must end up as non-negative integer milliseconds; strings are
/// parsed base-10, numbers truncated. Anything else loses its timing.
fn time_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
    .and_then(|ms| u64::try_from(ms).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_array_payloads_yield_nothing() {
        assert!(normalize(&Value::Null).is_empty());
        assert!(normalize(&json!(42)).is_empty());
        assert!(normalize(&json!("lyrics")).is_empty());
        assert!(normalize(&json!({ "lines": [] })).is_empty());
    }

    #[test]
    fn blank_records_are_dropped_without_gaps() {
        let raw = json!([
            { "words": "first", "startTimeMs": "0" },
            { "words": "   " },
            { "text": "" },
            { "words": "second", "startTimeMs": "1200" },
        ]);
        let lines = normalize(&raw);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
    }

    #[test]
    fn alternate_field_names_resolve_in_order() {
        let raw = json!([
            { "lyrics": "from lyrics", "offset": 500 },
            { "text": "from text", "t": "700" },
            { "words": "from words", "time": 900.0 },
        ]);
        let lines = normalize(&raw);
        assert_eq!(lines[0], LyricLine::new("from lyrics", Some(500)));
        assert_eq!(lines[1], LyricLine::new("from text", Some(700)));
        assert_eq!(lines[2], LyricLine::new("from words", Some(900)));
    }

    #[test]
    fn unusable_timestamps_degrade_to_untimed() {
        let raw = json!([
            { "words": "bad string", "time": "12s" },
            { "words": "wrong type", "time": [1, 2] },
            { "words": "negative", "time": -30 },
            { "words": "missing" },
        ]);
        let lines = normalize(&raw);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.time_ms.is_none()));
    }

    #[test]
    fn numeric_text_is_stringified() {
        let lines = normalize(&json!([{ "words": 99, "time": 100 }]));
        assert_eq!(lines[0], LyricLine::new("99", Some(100)));
    }

    #[test]
    fn null_fields_fall_through_to_the_next_name() {
        let lines = normalize(&json!([
            { "words": null, "text": "fallback", "startTimeMs": null, "time": 250 }
        ]));
        assert_eq!(lines[0], LyricLine::new("fallback", Some(250)));
    }

    #[test]
    fn input_order_is_preserved() {
        let raw = json!([
            { "words": "c", "time": 3000 },
            { "words": "a", "time": 1000 },
            { "words": "b", "time": 2000 },
        ]);
        let texts: Vec<_> = normalize(&raw).into_iter().map(|l| l.text).collect();
        assert_eq!(texts, ["c", "a", "b"]);
    }
}
