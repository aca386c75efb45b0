//! Conversion of provider lyric text into raw record arrays.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};

static LRC_TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d{1,2}):(\d{2})[.](\d{1,2})\]").unwrap());

/// Convert LRC-formatted text into the raw record shape the engine's
/// normalizer ingests: `[{"time": <ms>, "words": <text>}, …]`. Lines without
/// a timestamp tag or with empty text contribute nothing; a line with
/// several tags contributes one record per tag.
pub fn lrc_to_records(synced: &str) -> Vec<Value> {
    let re = &LRC_TIMESTAMP_RE;
    let mut records = Vec::new();
    for line in synced.lines() {
        let captures: Vec<_> = re.captures_iter(line).collect();
        if captures.is_empty() {
            continue;
        }
        let text = re.replace_all(line, "");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        for cap in captures {
            let minutes: u64 = cap.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
            let seconds: u64 = cap.get(2).and_then(|s| s.as_str().parse().ok()).unwrap_or(0);
            let centis: u64 = cap.get(3).and_then(|c| c.as_str().parse().ok()).unwrap_or(0);
            let time_ms = minutes * 60_000 + seconds * 1_000 + centis * 10;
            records.push(json!({ "time": time_ms, "words": text }));
        }
    }
    records
}

/// Convert plain (untimed) lyric text into raw records with no timing.
pub fn plain_to_records(plain: &str) -> Vec<Value> {
    plain
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| json!({ "words": l }))
        .collect()
}
