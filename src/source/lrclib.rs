use serde::Deserialize;
use serde_json::Value;

use crate::source::parse::{lrc_to_records, plain_to_records};
use crate::source::{SourceError, http_client};

#[derive(Deserialize)]
#[allow(non_snake_case)]
struct LrcLibResponse {
    syncedLyrics: Option<String>,
    plainLyrics: Option<String>,
}

/// Fetch lyrics for a track from the lrclib.net API.
///
/// Returns the raw record payload for the engine's normalizer: timed records
/// when synced lyrics exist, untimed ones when only plain lyrics do, and
/// `Ok(None)` when the provider has nothing for this track (404 is an
/// answer, not an error).
pub async fn fetch_raw_lyrics(
    artist: &str,
    title: &str,
    album: &str,
    duration_ms: Option<u64>,
) -> Result<Option<Value>, SourceError> {
    let url = build_lrclib_url(artist, title, album, duration_ms);

    let resp = http_client().get(&url).send().await?;

    if resp.status().as_u16() == 404 {
        return Ok(None);
    }
    if !resp.status().is_success() {
        return Err(SourceError::Api(format!("lrclib: HTTP {}", resp.status())));
    }

    let response: LrcLibResponse = resp.json().await?;

    let records = match response.syncedLyrics {
        Some(synced) if !synced.is_empty() => lrc_to_records(&synced),
        _ => match response.plainLyrics {
            Some(plain) if !plain.is_empty() => plain_to_records(&plain),
            _ => Vec::new(),
        },
    };

    if records.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Array(records)))
    }
}

/// Build the lrclib API URL with query parameters.
fn build_lrclib_url(artist: &str, title: &str, album: &str, duration_ms: Option<u64>) -> String {
    let mut params = vec![
        format!("artist_name={}", urlencoding::encode(artist)),
        format!("track_name={}", urlencoding::encode(title)),
    ];

    if !album.is_empty() {
        params.push(format!("album_name={}", urlencoding::encode(album)));
    }

    if let Some(ms) = duration_ms {
        // API expects duration in whole seconds
        params.push(format!("duration={}", ms / 1000));
    }

    format!("https://lrclib.net/api/get?{}", params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_optional_parameters() {
        let url = build_lrclib_url("Artist & Co", "Song", "Album", Some(215_000));
        assert!(url.starts_with("https://lrclib.net/api/get?"));
        assert!(url.contains("artist_name=Artist%20%26%20Co"));
        assert!(url.contains("album_name=Album"));
        assert!(url.contains("duration=215"));
    }

    #[test]
    fn url_omits_empty_album_and_duration() {
        let url = build_lrclib_url("a", "t", "", None);
        assert!(!url.contains("album_name"));
        assert!(!url.contains("duration"));
    }
}
