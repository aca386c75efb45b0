//! Track metadata extraction from MPRIS property maps.

use std::collections::HashMap;
use zvariant::OwnedValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub length_ms: Option<u64>,
    /// Opaque host track identifier (`mpris:trackid`), used to key loads.
    pub track_id: Option<String>,
    /// Lyrics the player itself publishes (`xesam:asText`), if any.
    pub lyrics_text: Option<String>,
}

impl TrackMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.artist.is_empty()
    }
}

/// Extract metadata fields from an MPRIS a{sv} property map.
///
/// The MPRIS spec says artist/album are arrays of strings, but some players
/// send a single string; both shapes are accepted.
pub fn extract_metadata(map: &HashMap<String, OwnedValue>) -> TrackMetadata {
    let title = get_string(map, "xesam:title").unwrap_or_default();
    let artist = get_string_or_first(map, "xesam:artist").unwrap_or_default();
    let album = get_string_or_first(map, "xesam:album").unwrap_or_default();
    let length_ms = map.get("mpris:length").and_then(|v| {
        if let Ok(i) = i64::try_from(v.clone()) {
            return u64::try_from(i / 1_000).ok();
        }
        if let Ok(u) = u64::try_from(v.clone()) {
            return Some(u / 1_000);
        }
        None
    });
    let track_id = get_string(map, "mpris:trackid").filter(|s| !s.is_empty());
    let lyrics_text = get_string(map, "xesam:asText").filter(|s| !s.trim().is_empty());
    TrackMetadata {
        title,
        artist,
        album,
        length_ms,
        track_id,
        lyrics_text,
    }
}

fn get_string(map: &HashMap<String, OwnedValue>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(|v| String::try_from(v.clone()).ok())
}

fn get_string_or_first(map: &HashMap<String, OwnedValue>, key: &str) -> Option<String> {
    let value = map.get(key)?;
    if let Ok(s) = String::try_from(value.clone()) {
        return Some(s);
    }
    Vec::<String>::try_from(value.clone())
        .ok()
        .and_then(|v| v.into_iter().next())
}
