//! Lyric provider collaborators.
//!
//! Providers hand back *raw* payloads (untyped JSON record arrays); all
//! canonicalization happens in the engine's normalizer. Fetch failures are
//! errors here, but the engine maps every one of them to `Unavailable`;
//! nothing provider-shaped ever reaches the display layer.

pub mod lrclib;
pub mod parse;

use once_cell::sync::Lazy;
use reqwest::Client;
use thiserror::Error;

pub use lrclib::fetch_raw_lyrics;

// Shared HTTP client with reasonable defaults for timeouts
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("lyricscreen/0.1")
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("provider error: {0}")]
    Api(String),
}

pub(crate) fn http_client() -> &'static Client {
    &HTTP_CLIENT
}
